//! The in-memory relational model graph.

use super::elements::{
    DomainId, EntitySetProjection, EnumDomain, NamespaceId, Reference, SchemaNamespace, Table,
    TableId, ViewId, ViewReference,
};
use super::sink::ModelSink;
use crate::fetch::AuthMode;

/// Provenance of a reversed model: where the metadata came from and how the
/// fetch authenticated. Credentials are never part of this record.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub metadata_uri: String,
    pub auth_mode: AuthMode,
}

/// A complete relational data model.
///
/// Serves both as the transient scratch graph a translation run builds into
/// and as the persistent target model the merge adapter updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataModel {
    pub name: String,
    pub namespaces: Vec<SchemaNamespace>,
    pub domains: Vec<EnumDomain>,
    pub tables: Vec<Table>,
    pub views: Vec<EntitySetProjection>,
    pub references: Vec<Reference>,
    pub view_references: Vec<ViewReference>,
    /// Recorded after a successful reverse so a later update can replay the
    /// same fetch without re-asking for the URI.
    pub source: Option<ModelSource>,
}

impl DataModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn namespace(&self, id: NamespaceId) -> &SchemaNamespace {
        &self.namespaces[id.0]
    }

    pub fn domain(&self, id: DomainId) -> &EnumDomain {
        &self.domains[id.0]
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn view(&self, id: ViewId) -> &EntitySetProjection {
        &self.views[id.0]
    }
}

impl ModelSink for DataModel {
    fn ensure_namespace(&mut self, name: &str) -> NamespaceId {
        if let Some(id) = self.find_namespace(name) {
            return id;
        }
        self.namespaces.push(SchemaNamespace {
            name: name.to_string(),
        });
        NamespaceId(self.namespaces.len() - 1)
    }

    fn find_namespace(&self, name: &str) -> Option<NamespaceId> {
        self.namespaces
            .iter()
            .position(|ns| ns.name == name)
            .map(NamespaceId)
    }

    fn add_domain(&mut self, domain: EnumDomain) -> DomainId {
        self.domains.push(domain);
        DomainId(self.domains.len() - 1)
    }

    fn find_domain(&self, name: &str) -> Option<DomainId> {
        self.domains
            .iter()
            .position(|d| d.name == name)
            .map(DomainId)
    }

    fn add_table(&mut self, table: Table) -> TableId {
        self.tables.push(table);
        TableId(self.tables.len() - 1)
    }

    fn find_table(&self, namespace: NamespaceId, name: &str) -> Option<TableId> {
        self.tables
            .iter()
            .position(|t| t.namespace == namespace && t.name == name)
            .map(TableId)
    }

    fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    fn add_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    fn add_view(&mut self, view: EntitySetProjection) -> ViewId {
        self.views.push(view);
        ViewId(self.views.len() - 1)
    }

    fn find_view(&self, namespace: NamespaceId, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .position(|v| v.namespace == namespace && v.name == name)
            .map(ViewId)
    }

    fn view_name(&self, id: ViewId) -> &str {
        &self.views[id.0].name
    }

    fn add_view_reference(&mut self, reference: ViewReference) {
        self.view_references.push(reference);
    }
}
