//! End-to-end translation tests: metadata document in, data model out.

use pretty_assertions::assert_eq;

use odata_reverse::error::OdataReverseError;
use odata_reverse::model::{ProjectionBody, ProjectionStyle, TableKind};
use odata_reverse::translate_document;

use crate::common::{load_fixture, translate_fixture};

#[test]
fn test_person_end_to_end() {
    let model = translate_fixture("person_v4.xml", ProjectionStyle::View);

    assert_eq!(model.namespaces.len(), 1);
    assert_eq!(model.namespaces[0].name, "Sample");
    assert_eq!(model.domains.len(), 0);

    assert_eq!(model.tables.len(), 1);
    let person = &model.tables[0];
    assert_eq!(person.name, "Person");
    assert_eq!(person.kind, TableKind::Entity);
    assert_eq!(person.columns.len(), 2);

    let id = &person.columns[0];
    assert_eq!(id.name, "Id");
    assert_eq!(id.data_type.as_deref(), Some("int"));
    assert!(id.primary);
    assert!(id.mandatory);

    let name = &person.columns[1];
    assert_eq!(name.name, "Name");
    assert_eq!(name.data_type.as_deref(), Some("nvarchar"));
    assert!(!name.primary);
    assert!(!name.mandatory);

    assert_eq!(model.views.len(), 1);
    let people = &model.views[0];
    assert_eq!(people.name, "People");
    assert_eq!(model.table(people.source_table).name, "Person");
    match &people.body {
        ProjectionBody::View { sql_query } => {
            assert_eq!(sql_query, r#"SELECT "Id","Name" FROM "Person""#);
        }
        other => panic!("expected a view body, got {:?}", other),
    }

    assert_eq!(model.references.len(), 0);
    assert_eq!(model.view_references.len(), 0);
}

#[test]
fn test_replica_projection_copies_columns() {
    let model = translate_fixture("person_v4.xml", ProjectionStyle::Replica);

    let people = &model.views[0];
    let person = model.table(people.source_table);
    match &people.body {
        ProjectionBody::Replica { columns } => assert_eq!(columns, &person.columns),
        other => panic!("expected a replica body, got {:?}", other),
    }
}

#[test]
fn test_self_navigation_produces_table_and_view_references() {
    let model = translate_fixture("friends_v4.xml", ProjectionStyle::View);

    assert_eq!(model.references.len(), 1);
    let friends = &model.references[0];
    assert_eq!(friends.name, "Person > Person : Friends");
    assert_eq!(friends.parent_role, "Friends");
    assert_eq!(friends.child, friends.parent);
    assert!(friends.joins.is_empty());

    assert_eq!(model.view_references.len(), 1);
    let binding = &model.view_references[0];
    assert_eq!(binding.name, "People > People : Friends");
    assert_eq!(binding.parent_role, "Friends");
    assert_eq!(binding.child, binding.parent);
}

#[test]
fn test_inherited_columns_come_first_in_declaration_order() {
    let model = translate_fixture("inheritance_v4.xml", ProjectionStyle::View);

    // The abstract root produces no table of its own.
    assert!(model.tables.iter().all(|t| t.name != "Resource"));
    assert_eq!(model.tables.len(), 2);

    let employee = model
        .tables
        .iter()
        .find(|t| t.name == "Employee")
        .expect("Employee table");
    let names: Vec<&str> = employee.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Id", "CreatedAt", "DisplayName", "HireDate", "Salary"]
    );

    // The key is declared on the abstract root and inherited down the chain.
    let id = &employee.columns[0];
    assert!(id.primary);
    assert_eq!(id.data_type.as_deref(), Some("uniqueidentifier"));

    let display_name = &employee.columns[2];
    assert_eq!(display_name.data_type.as_deref(), Some("nvarchar"));
    assert_eq!(display_name.length, Some(256));

    let salary = &employee.columns[4];
    assert_eq!(salary.data_type.as_deref(), Some("decimal"));
    assert_eq!(salary.precision, Some(18));
    assert_eq!(salary.scale, Some(2));

    let person = model
        .tables
        .iter()
        .find(|t| t.name == "Person")
        .expect("Person table");
    let names: Vec<&str> = person.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Id", "CreatedAt", "DisplayName"]);
}

#[test]
fn test_enum_complex_and_unmapped_columns() {
    let model = translate_fixture("catalog_v4.xml", ProjectionStyle::View);

    assert_eq!(model.domains.len(), 1);
    let availability = &model.domains[0];
    assert_eq!(availability.name, "Catalog.Availability");
    assert_eq!(availability.data_type, "int");
    assert_eq!(
        availability.values(),
        vec![
            (0, "OutOfStock".to_string()),
            (1, "InStock".to_string()),
            (2, "BackOrdered".to_string()),
        ]
    );

    let product = model
        .tables
        .iter()
        .find(|t| t.name == "Product")
        .expect("Product table");
    assert_eq!(product.kind, TableKind::Entity);

    let column = |name: &str| {
        product
            .columns
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("column '{}'", name))
    };

    let availability_col = column("Availability");
    assert_eq!(availability_col.data_type, None);
    assert!(availability_col.domain.is_some());
    assert!(availability_col.mandatory);

    let price = column("Price");
    assert_eq!(price.data_type.as_deref(), Some("decimal"));
    assert_eq!(price.precision, Some(10));
    assert_eq!(price.scale, Some(4));

    // Complex-typed, stream-typed and collection-valued properties all
    // produce untyped columns rather than being dropped.
    for name in ["Box", "Photo", "Tags"] {
        let col = column(name);
        assert_eq!(col.data_type, None);
        assert_eq!(col.domain, None);
    }

    let dimensions = model
        .tables
        .iter()
        .find(|t| t.name == "Dimensions")
        .expect("Dimensions table");
    assert_eq!(dimensions.kind, TableKind::Complex);
    assert!(dimensions
        .columns
        .iter()
        .all(|c| c.data_type.as_deref() == Some("float") && c.mandatory));
}

#[test]
fn test_missing_navigation_target_aborts_translation() {
    let document = load_fixture("missing_target_v4.xml");
    match translate_document(&document, "Test model", ProjectionStyle::View) {
        Err(OdataReverseError::NotFound { object_kind, name }) => {
            assert_eq!(object_kind, "table");
            assert_eq!(name, "Pet");
        }
        other => panic!("expected a not-found error, got {:?}", other),
    }
}

#[test]
fn test_v3_associations_become_references() {
    let model = translate_fixture("northwind_v3.xml", ProjectionStyle::View);

    let customer = model
        .tables
        .iter()
        .find(|t| t.name == "Customer")
        .expect("Customer table");
    let customer_id = &customer.columns[0];
    assert_eq!(customer_id.data_type.as_deref(), Some("nvarchar"));
    assert_eq!(customer_id.length, Some(5));
    assert!(customer_id.primary);

    let order = model
        .tables
        .iter()
        .find(|t| t.name == "Order")
        .expect("Order table");
    // Edm.DateTime from the older dialect maps like DateTimeOffset.
    assert_eq!(order.columns[1].data_type.as_deref(), Some("datetimeoffset"));

    let reference_names: Vec<&str> = model.references.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        reference_names,
        vec![
            "Customer > Order : Orders",
            "Order > Customer : Customer",
        ]
    );

    // V1-3 entity sets carry no navigation bindings.
    assert_eq!(model.views.len(), 2);
    assert_eq!(model.view_references.len(), 0);
}

#[test]
fn test_translation_is_deterministic() {
    let first = translate_fixture("catalog_v4.xml", ProjectionStyle::View);
    let second = translate_fixture("catalog_v4.xml", ProjectionStyle::View);
    assert_eq!(first, second);
}
