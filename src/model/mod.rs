//! The target relational model and the translation engine that fills it.

mod builder;
mod data_model;
mod elements;
mod sink;
mod type_map;

pub use builder::{build_model, ProjectionStyle};
pub use data_model::{DataModel, ModelSource};
pub use elements::{
    Column, DomainId, EntitySetProjection, EnumDomain, JoinPair, NamespaceId, ProjectionBody,
    Reference, SchemaNamespace, Table, TableId, TableKind, ViewId, ViewReference,
};
pub use sink::ModelSink;
pub use type_map::{map_primitive, MappedType};
