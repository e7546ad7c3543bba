//! Merge behaviour: additive, idempotent, never deleting.

use pretty_assertions::assert_eq;

use odata_reverse::merge::merge_into;
use odata_reverse::model::{DataModel, ProjectionStyle};
use odata_reverse::translate_document;

use crate::common::translate_fixture;

#[test]
fn test_merge_into_empty_model_adds_everything() {
    let fresh = translate_fixture("friends_v4.xml", ProjectionStyle::View);
    let mut target = DataModel::new("Target");

    let report = merge_into(&mut target, &fresh);

    assert!(report.success);
    // 1 namespace + 1 table + 1 view + 1 reference + 1 view reference.
    assert_eq!(report.added, 5);
    assert_eq!(report.updated, 0);
    assert_eq!(target.tables.len(), 1);
    assert_eq!(target.views.len(), 1);
    assert_eq!(target.references.len(), 1);
    assert_eq!(target.view_references.len(), 1);
}

#[test]
fn test_merge_is_idempotent() {
    let fresh = translate_fixture("catalog_v4.xml", ProjectionStyle::View);
    let mut target = DataModel::new("Target");

    let first = merge_into(&mut target, &fresh);
    assert!(first.success);
    let snapshot = target.clone();

    let second = merge_into(&mut target, &fresh);
    assert!(second.success);
    assert_eq!(second.added, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(target, snapshot);
}

#[test]
fn test_merge_updates_changed_elements_in_place() {
    let before = r#"
<Edmx Version="4.0">
  <DataServices>
    <Schema Namespace="Sample">
      <EntityType Name="Person">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <Property Name="Name" Type="Edm.String"/>
      </EntityType>
      <EntityContainer Name="Container">
        <EntitySet Name="People" EntityType="Sample.Person"/>
      </EntityContainer>
    </Schema>
  </DataServices>
</Edmx>"#;
    // Same service, one facet changed upstream.
    let after = before.replace(
        r#"<Property Name="Name" Type="Edm.String"/>"#,
        r#"<Property Name="Name" Type="Edm.String" MaxLength="80"/>"#,
    );

    let mut target = DataModel::new("Target");
    let fresh = translate_document(before, "Target", ProjectionStyle::View).unwrap();
    assert!(merge_into(&mut target, &fresh).success);
    let person_id = target.tables.iter().position(|t| t.name == "Person").unwrap();

    let fresh = translate_document(&after, "Target", ProjectionStyle::View).unwrap();
    let report = merge_into(&mut target, &fresh);

    assert!(report.success);
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 1);
    // Updated in place, not re-added.
    assert_eq!(target.tables.len(), 1);
    let name = &target.tables[person_id].columns[1];
    assert_eq!(name.length, Some(80));
}

#[test]
fn test_merge_keeps_same_named_references_from_different_namespaces() {
    // Reference names carry only bare table names, so two namespaces with
    // identically named tables and navigations collide on the name; both
    // references must survive the merge as distinct endpoint pairs.
    let document = r#"
<Edmx Version="4.0">
  <DataServices>
    <Schema Namespace="First">
      <EntityType Name="T1">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <NavigationProperty Name="R" Type="Collection(First.T2)"/>
      </EntityType>
      <EntityType Name="T2">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
      </EntityType>
    </Schema>
    <Schema Namespace="Second">
      <EntityType Name="T1">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <NavigationProperty Name="R" Type="Collection(Second.T2)"/>
      </EntityType>
      <EntityType Name="T2">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
      </EntityType>
    </Schema>
  </DataServices>
</Edmx>"#;

    let fresh = translate_document(document, "Target", ProjectionStyle::View).unwrap();
    assert_eq!(fresh.references.len(), 2);
    assert_eq!(fresh.references[0].name, fresh.references[1].name);

    let mut target = DataModel::new("Target");
    let report = merge_into(&mut target, &fresh);

    assert!(report.success);
    assert_eq!(target.references.len(), 2);
    assert_ne!(
        (target.references[0].child, target.references[0].parent),
        (target.references[1].child, target.references[1].parent)
    );

    // A second merge matches each reference to its own counterpart.
    let report = merge_into(&mut target, &fresh);
    assert!(report.success);
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(target.references.len(), 2);
}

#[test]
fn test_merge_never_deletes() {
    let mut target = translate_fixture("catalog_v4.xml", ProjectionStyle::View);
    let table_count = target.tables.len();
    let domain_count = target.domains.len();

    let fresh = translate_fixture("person_v4.xml", ProjectionStyle::View);
    let report = merge_into(&mut target, &fresh);

    assert!(report.success);
    // Everything from the catalog survives alongside the new person table.
    assert_eq!(target.tables.len(), table_count + 1);
    assert_eq!(target.domains.len(), domain_count);
    assert!(target.tables.iter().any(|t| t.name == "Product"));
    assert!(target.tables.iter().any(|t| t.name == "Person"));
}

#[test]
fn test_merge_refuses_a_fresh_graph_without_tables() {
    let mut target = translate_fixture("person_v4.xml", ProjectionStyle::View);
    let snapshot = target.clone();

    let report = merge_into(&mut target, &DataModel::new("Empty"));

    assert!(!report.success);
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(target, snapshot);
}
