//! The model sink capability the translation engine builds against.
//!
//! The engine never reaches into ambient host state: everything it creates
//! or looks up goes through this trait, so it can target the in-memory
//! [`DataModel`](super::DataModel) in tests and a host-backed adapter in a
//! modeling application alike.

use super::elements::{
    DomainId, EntitySetProjection, EnumDomain, NamespaceId, Reference, Table, TableId, ViewId,
    ViewReference,
};

pub trait ModelSink {
    /// Get the namespace with this exact name, creating it when absent.
    fn ensure_namespace(&mut self, name: &str) -> NamespaceId;
    fn find_namespace(&self, name: &str) -> Option<NamespaceId>;

    fn add_domain(&mut self, domain: EnumDomain) -> DomainId;
    /// Exact lookup by fully-qualified enum type name.
    fn find_domain(&self, name: &str) -> Option<DomainId>;

    fn add_table(&mut self, table: Table) -> TableId;
    fn find_table(&self, namespace: NamespaceId, name: &str) -> Option<TableId>;
    fn table(&self, id: TableId) -> &Table;

    fn add_reference(&mut self, reference: Reference);

    fn add_view(&mut self, view: EntitySetProjection) -> ViewId;
    fn find_view(&self, namespace: NamespaceId, name: &str) -> Option<ViewId>;
    fn view_name(&self, id: ViewId) -> &str;

    fn add_view_reference(&mut self, reference: ViewReference);
}
