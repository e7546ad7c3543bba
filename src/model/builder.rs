//! Build the relational model graph from a parsed EDM model.
//!
//! Translation runs as ordered passes over the EDM model; each pass depends
//! on state fully materialized by the previous one (columns need domains,
//! references need tables, view references need views), so the passes must
//! not be reordered or merged.

use std::collections::HashSet;

use log::{debug, error, warn};

use super::elements::{
    Column, EntitySetProjection, EnumDomain, ProjectionBody, Reference, Table, TableKind,
    ViewReference,
};
use super::sink::ModelSink;
use super::type_map::map_primitive;
use crate::edm::model::split_qualified_name;
use crate::edm::{EdmModel, EdmStructuredType, StructuredTypeKind};
use crate::error::OdataReverseError;

/// How entity sets are represented in the produced model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionStyle {
    /// A SQL view selecting all columns of the entity type's table.
    #[default]
    View,
    /// An independently named structural copy of the entity type's table,
    /// with a traceability link back to it.
    Replica,
}

impl std::str::FromStr for ProjectionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(ProjectionStyle::View),
            "replica" => Ok(ProjectionStyle::Replica),
            _ => Err(format!("Unknown projection style: {}", s)),
        }
    }
}

/// Translate a parsed EDM model into the sink.
///
/// Any lookup failure for an element a previous pass should have created is
/// an internal consistency failure: the whole translation aborts, leaving no
/// partially-resolved reference behind.
pub fn build_model<S: ModelSink>(
    edm: &EdmModel,
    sink: &mut S,
    projection: ProjectionStyle,
) -> Result<(), OdataReverseError> {
    add_domains(edm, sink);
    add_tables(edm, sink)?;
    add_references(edm, sink)?;
    add_entity_sets(edm, sink, projection)?;
    add_entity_set_references(edm, sink)?;
    Ok(())
}

/// Pass 1: one domain per schema enumeration type. Runs before any column
/// creation so enum-typed properties can resolve their domain.
fn add_domains<S: ModelSink>(edm: &EdmModel, sink: &mut S) {
    debug!("Adding domains from enums:");
    for enum_type in &edm.enum_types {
        debug!(
            " Enum[Name={}; Namespace={}]",
            enum_type.name, enum_type.namespace
        );
        let members: Vec<(i64, String)> = enum_type
            .members
            .iter()
            .map(|m| (m.value, m.name.clone()))
            .collect();
        sink.add_domain(EnumDomain::from_members(&enum_type.full_name(), &members));
    }
}

/// Pass 2: one table per non-abstract entity or complex type. Abstract types
/// exist purely to be inherited from and produce no table.
fn add_tables<S: ModelSink>(edm: &EdmModel, sink: &mut S) -> Result<(), OdataReverseError> {
    debug!("Adding tables from entity and complex types:");
    for structured in &edm.structured_types {
        if structured.is_abstract {
            debug!(
                " Skipping abstract type {}[Name={}]",
                kind_name(structured.kind),
                structured.full_name()
            );
            continue;
        }
        debug!(
            " {}[Name={}; Namespace={}]",
            kind_name(structured.kind),
            structured.name,
            structured.namespace
        );

        let namespace = sink.ensure_namespace(&structured.namespace);
        let columns = translate_columns(edm, structured, sink)?;
        sink.add_table(Table {
            namespace,
            name: structured.name.clone(),
            kind: match structured.kind {
                StructuredTypeKind::Entity => TableKind::Entity,
                StructuredTypeKind::Complex => TableKind::Complex,
            },
            columns,
        });
    }
    Ok(())
}

/// Translate a structured type's properties (and its base types',
/// recursively) into an ordered column list: all ancestors' declared columns
/// first, in root-to-derived order, then this type's own declared columns.
/// Downstream schema diffing depends on this order being stable.
fn translate_columns<S: ModelSink>(
    edm: &EdmModel,
    structured: &EdmStructuredType,
    sink: &S,
) -> Result<Vec<Column>, OdataReverseError> {
    let key = effective_key(edm, structured)?;
    let key: HashSet<&str> = key.iter().map(|k| k.as_str()).collect();
    let mut columns = Vec::new();
    collect_columns(edm, structured, &key, sink, &mut columns)?;
    Ok(columns)
}

fn collect_columns<S: ModelSink>(
    edm: &EdmModel,
    structured: &EdmStructuredType,
    key: &HashSet<&str>,
    sink: &S,
    columns: &mut Vec<Column>,
) -> Result<(), OdataReverseError> {
    if let Some(base_name) = &structured.base_type {
        debug!(" Adding properties from base type {}", base_name);
        let base = edm.find_structured_type(base_name).ok_or_else(|| {
            error!("The base type '{}' was not found!", base_name);
            OdataReverseError::NotFound {
                object_kind: "base type",
                name: base_name.clone(),
            }
        })?;
        collect_columns(edm, base, key, sink, columns)?;
    }

    // Navigation properties are relationship-holding and handled by the
    // references pass; only structural properties become columns.
    for property in &structured.properties {
        debug!(
            " -Property[Name={}; Type={}]",
            property.name, property.type_ref.name
        );

        let type_ref = &property.type_ref;
        let mut column = Column {
            name: property.name.clone(),
            data_type: None,
            mandatory: !type_ref.nullable,
            primary: key.contains(property.name.as_str()),
            length: None,
            precision: None,
            scale: None,
            domain: None,
        };

        if type_ref.is_collection {
            debug!(
                "  -Property '{}' is collection-valued, leaving the column untyped",
                property.name
            );
        } else if let Some(kind) = type_ref.primitive_kind() {
            match map_primitive(kind, type_ref) {
                Some(mapped) => {
                    column.data_type = Some(mapped.data_type.to_string());
                    column.length = mapped.length;
                    column.precision = mapped.precision;
                    column.scale = mapped.scale;
                }
                None => warn!(
                    "No relational mapping for EDM type '{}' on property '{}.{}', leaving the column untyped",
                    type_ref.name,
                    structured.full_name(),
                    property.name
                ),
            }
        } else if edm.find_enum_type(&type_ref.name).is_some() {
            debug!("  -The datatype is an Enum type, resolving the domain");
            let domain = sink.find_domain(&type_ref.name).ok_or_else(|| {
                error!("The domain for Enum '{}' was not found!", type_ref.name);
                OdataReverseError::NotFound {
                    object_kind: "enum domain",
                    name: type_ref.name.clone(),
                }
            })?;
            column.domain = Some(domain);
        } else {
            debug!(
                "  -Property '{}' has structured type '{}', leaving the column untyped",
                property.name, type_ref.name
            );
        }

        columns.push(column);
    }
    Ok(())
}

/// The entity key a structured type's properties are checked against: the
/// first declared key found walking from the type towards the root of its
/// inheritance chain.
fn effective_key<'a>(
    edm: &'a EdmModel,
    structured: &'a EdmStructuredType,
) -> Result<&'a [String], OdataReverseError> {
    let mut current = structured;
    loop {
        if !current.key.is_empty() {
            return Ok(&current.key);
        }
        let Some(base_name) = &current.base_type else {
            return Ok(&[]);
        };
        current = edm
            .find_structured_type(base_name)
            .ok_or_else(|| OdataReverseError::NotFound {
                object_kind: "base type",
                name: base_name.clone(),
            })?;
    }
}

/// Pass 3: one reference per navigation property declared directly on a
/// (non-abstract) structured type. Both endpoint tables must already exist.
fn add_references<S: ModelSink>(edm: &EdmModel, sink: &mut S) -> Result<(), OdataReverseError> {
    debug!("Adding table references:");
    for structured in &edm.structured_types {
        if structured.is_abstract || structured.navigation_properties.is_empty() {
            continue;
        }

        let child = lookup_table(sink, &structured.namespace, &structured.name)?;
        let child_name = sink.table(child).name.clone();

        for nav in &structured.navigation_properties {
            debug!(
                " -NavigationProperty[Name={}; Target={}; Collection={}]",
                nav.name, nav.target_type, nav.is_collection
            );

            let (target_namespace, target_name) = split_qualified_name(&nav.target_type);
            let parent = lookup_table(sink, target_namespace, target_name)?;
            let parent_name = sink.table(parent).name.clone();

            debug!("  -Creating table reference");
            sink.add_reference(Reference {
                name: reference_name(&child_name, &parent_name, &nav.name),
                child,
                parent,
                parent_role: nav.name.clone(),
                // The navigation gives role and target but no physical FK
                // column mapping; joins stay unresolved.
                joins: Vec::new(),
            });
        }
    }
    Ok(())
}

/// Pass 4a: one projection per entity set, scoped to its container's
/// namespace and pointing at the entity type's table.
fn add_entity_sets<S: ModelSink>(
    edm: &EdmModel,
    sink: &mut S,
    projection: ProjectionStyle,
) -> Result<(), OdataReverseError> {
    debug!("Adding entity set projections:");
    for entity_set in &edm.entity_sets {
        debug!(
            " EntitySet[Name={}; Namespace={}; EntityType={}]",
            entity_set.name, entity_set.container_namespace, entity_set.entity_type
        );

        let namespace = sink.ensure_namespace(&entity_set.container_namespace);
        let (type_namespace, type_name) = split_qualified_name(&entity_set.entity_type);
        let source_table = lookup_table(sink, type_namespace, type_name)?;
        let table = sink.table(source_table);

        let body = match projection {
            ProjectionStyle::View => {
                let column_list: Vec<String> = table
                    .columns
                    .iter()
                    .map(|c| format!("\"{}\"", c.name))
                    .collect();
                ProjectionBody::View {
                    sql_query: format!(
                        "SELECT {} FROM \"{}\"",
                        column_list.join(","),
                        table.name
                    ),
                }
            }
            ProjectionStyle::Replica => ProjectionBody::Replica {
                columns: table.columns.clone(),
            },
        };

        sink.add_view(EntitySetProjection {
            namespace,
            name: entity_set.name.clone(),
            source_table,
            body,
        });
    }
    Ok(())
}

/// Pass 4b: once all projections exist, mirror each entity set's
/// collection-targeting navigation bindings as view-to-view references.
fn add_entity_set_references<S: ModelSink>(
    edm: &EdmModel,
    sink: &mut S,
) -> Result<(), OdataReverseError> {
    debug!("Adding entity set references:");
    for entity_set in &edm.entity_sets {
        if entity_set.bindings.is_empty() {
            continue;
        }

        let namespace = sink
            .find_namespace(&entity_set.container_namespace)
            .ok_or_else(|| {
                error!(
                    "The container namespace '{}' was not found!",
                    entity_set.container_namespace
                );
                OdataReverseError::NotFound {
                    object_kind: "namespace",
                    name: entity_set.container_namespace.clone(),
                }
            })?;
        let child = lookup_view(sink, namespace, &entity_set.name)?;
        let child_name = sink.view_name(child).to_string();

        for binding in &entity_set.bindings {
            debug!(
                " -NavigationPropertyBinding[Property={}; Target={}; Collection={}]",
                binding.navigation_property, binding.target, binding.targets_collection
            );
            // Singleton-targeting bindings have no projection to point at.
            if !binding.targets_collection {
                continue;
            }

            let parent = lookup_view(sink, namespace, &binding.target)?;
            let parent_name = sink.view_name(parent).to_string();

            debug!("  -Creating view reference");
            sink.add_view_reference(ViewReference {
                name: reference_name(&child_name, &parent_name, &binding.navigation_property),
                child,
                parent,
                parent_role: binding.navigation_property.clone(),
                joins: Vec::new(),
            });
        }
    }
    Ok(())
}

/// Deterministic reference name: `"{child} > {parent} : {role}"`.
fn reference_name(child: &str, parent: &str, role: &str) -> String {
    format!("{} > {} : {}", child, parent, role)
}

fn lookup_table<S: ModelSink>(
    sink: &S,
    namespace: &str,
    name: &str,
) -> Result<super::elements::TableId, OdataReverseError> {
    let namespace_id = sink.find_namespace(namespace).ok_or_else(|| {
        error!("The type namespace '{}' was not found!", namespace);
        OdataReverseError::NotFound {
            object_kind: "namespace",
            name: namespace.to_string(),
        }
    })?;
    sink.find_table(namespace_id, name).ok_or_else(|| {
        error!("The type table '{}' was not found!", name);
        OdataReverseError::NotFound {
            object_kind: "table",
            name: name.to_string(),
        }
    })
}

fn lookup_view<S: ModelSink>(
    sink: &S,
    namespace: super::elements::NamespaceId,
    name: &str,
) -> Result<super::elements::ViewId, OdataReverseError> {
    sink.find_view(namespace, name).ok_or_else(|| {
        error!("The view '{}' was not found!", name);
        OdataReverseError::NotFound {
            object_kind: "view",
            name: name.to_string(),
        }
    })
}

fn kind_name(kind: StructuredTypeKind) -> &'static str {
    match kind {
        StructuredTypeKind::Entity => "Entity",
        StructuredTypeKind::Complex => "Complex",
    }
}
