//! Reader for V1-3 CSDL metadata documents.
//!
//! The older dialect differs from V4 in two ways that matter here: navigation
//! properties reference an `Association` by name instead of naming a target
//! type, and entity sets carry no navigation property bindings (so the
//! entity-set reference pass has nothing to walk for V3 input).

use std::collections::HashMap;

use roxmltree::{Document, Node};

use super::model::{
    EdmEntitySet, EdmModel, EdmNavigationProperty, EdmParseError, EdmProperty, EdmStructuredType,
    StructuredTypeKind,
};
use super::{csdl_v4, node_location, parse_type_ref};
use crate::error::OdataReverseError;

/// One end of a V3 `Association` element.
struct AssociationEnd {
    role: String,
    entity_type: String,
    is_collection: bool,
}

/// Parse a V1-3 EDMX document into an [`EdmModel`].
pub fn parse(document: &str) -> Result<EdmModel, OdataReverseError> {
    let doc = Document::parse(document)?;
    let mut model = EdmModel::default();
    let mut errors: Vec<EdmParseError> = Vec::new();

    // Associations are resolved after all schemas are read, since a
    // navigation property may reference an association in another schema.
    let mut associations: HashMap<String, Vec<AssociationEnd>> = HashMap::new();
    // (declaring type index, nav name, relationship, to-role, location)
    let mut pending_navigations: Vec<(usize, String, String, String, String)> = Vec::new();

    for schema in doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Schema")
    {
        let Some(namespace) = schema.attribute("Namespace") else {
            errors.push(EdmParseError {
                code: "MissingNamespace",
                message: "Schema element has no 'Namespace' attribute".to_string(),
                location: node_location(&doc, &schema),
            });
            continue;
        };

        for child in schema.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                // CSDL 3.0 declares enums the same way V4 does.
                "EnumType" => {
                    if let Some(enum_type) =
                        csdl_v4::parse_enum_type_node(&doc, &child, namespace, &mut errors)
                    {
                        model.enum_types.push(enum_type);
                    }
                }
                "EntityType" => {
                    if let Some(entity) = parse_structured_type(
                        &doc,
                        &child,
                        namespace,
                        StructuredTypeKind::Entity,
                        &mut model,
                        &mut pending_navigations,
                        &mut errors,
                    ) {
                        model.structured_types.push(entity);
                    }
                }
                "ComplexType" => {
                    if let Some(complex) = parse_structured_type(
                        &doc,
                        &child,
                        namespace,
                        StructuredTypeKind::Complex,
                        &mut model,
                        &mut pending_navigations,
                        &mut errors,
                    ) {
                        model.structured_types.push(complex);
                    }
                }
                "Association" => {
                    if let Some((name, ends)) =
                        parse_association(&doc, &child, namespace, &mut errors)
                    {
                        associations.insert(name, ends);
                    }
                }
                "EntityContainer" => {
                    for set_node in child
                        .children()
                        .filter(|n| n.tag_name().name() == "EntitySet")
                    {
                        if let Some(set) = parse_entity_set(&doc, &set_node, namespace, &mut errors)
                        {
                            model.entity_sets.push(set);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    resolve_navigations(&mut model, &associations, pending_navigations, &mut errors);

    if errors.is_empty() {
        Ok(model)
    } else {
        Err(OdataReverseError::EdmParseErrors { errors })
    }
}

#[allow(clippy::too_many_arguments)]
fn parse_structured_type(
    doc: &Document,
    node: &Node,
    namespace: &str,
    kind: StructuredTypeKind,
    model: &mut EdmModel,
    pending_navigations: &mut Vec<(usize, String, String, String, String)>,
    errors: &mut Vec<EdmParseError>,
) -> Option<EdmStructuredType> {
    let Some(name) = node.attribute("Name") else {
        errors.push(EdmParseError {
            code: "MissingAttribute",
            message: format!("{} element has no 'Name' attribute", node.tag_name().name()),
            location: node_location(doc, node),
        });
        return None;
    };

    let key = node
        .children()
        .find(|n| n.tag_name().name() == "Key")
        .map(|key_node| {
            key_node
                .children()
                .filter(|n| n.tag_name().name() == "PropertyRef")
                .filter_map(|n| n.attribute("Name").map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let mut properties = Vec::new();
    // Index this type will occupy once pushed onto the model.
    let type_index = model.structured_types.len();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "Property" => {
                let (Some(prop_name), Some(raw_type)) =
                    (child.attribute("Name"), child.attribute("Type"))
                else {
                    errors.push(EdmParseError {
                        code: "MissingAttribute",
                        message: "Property element is missing 'Name' or 'Type'".to_string(),
                        location: node_location(doc, &child),
                    });
                    continue;
                };
                properties.push(EdmProperty {
                    name: prop_name.to_string(),
                    type_ref: parse_type_ref(&child, raw_type),
                });
            }
            "NavigationProperty" => {
                let (Some(nav_name), Some(relationship), Some(to_role)) = (
                    child.attribute("Name"),
                    child.attribute("Relationship"),
                    child.attribute("ToRole"),
                ) else {
                    errors.push(EdmParseError {
                        code: "MissingAttribute",
                        message: "NavigationProperty element is missing 'Name', 'Relationship' or 'ToRole'"
                            .to_string(),
                        location: node_location(doc, &child),
                    });
                    continue;
                };
                pending_navigations.push((
                    type_index,
                    nav_name.to_string(),
                    relationship.to_string(),
                    to_role.to_string(),
                    node_location(doc, &child),
                ));
            }
            _ => {}
        }
    }

    Some(EdmStructuredType {
        namespace: namespace.to_string(),
        name: name.to_string(),
        kind,
        base_type: node.attribute("BaseType").map(|s| s.to_string()),
        is_abstract: node.attribute("Abstract") == Some("true"),
        key,
        properties,
        navigation_properties: Vec::new(),
    })
}

fn parse_association(
    doc: &Document,
    node: &Node,
    namespace: &str,
    errors: &mut Vec<EdmParseError>,
) -> Option<(String, Vec<AssociationEnd>)> {
    let Some(name) = node.attribute("Name") else {
        errors.push(EdmParseError {
            code: "MissingAttribute",
            message: "Association element has no 'Name' attribute".to_string(),
            location: node_location(doc, node),
        });
        return None;
    };

    let ends = node
        .children()
        .filter(|n| n.tag_name().name() == "End")
        .filter_map(|end| {
            let role = end.attribute("Role")?;
            let entity_type = end.attribute("Type")?;
            Some(AssociationEnd {
                role: role.to_string(),
                entity_type: entity_type.to_string(),
                is_collection: end.attribute("Multiplicity") == Some("*"),
            })
        })
        .collect();

    Some((format!("{}.{}", namespace, name), ends))
}

fn parse_entity_set(
    doc: &Document,
    node: &Node,
    container_namespace: &str,
    errors: &mut Vec<EdmParseError>,
) -> Option<EdmEntitySet> {
    let (Some(name), Some(entity_type)) = (node.attribute("Name"), node.attribute("EntityType"))
    else {
        errors.push(EdmParseError {
            code: "MissingAttribute",
            message: "EntitySet element is missing 'Name' or 'EntityType'".to_string(),
            location: node_location(doc, node),
        });
        return None;
    };

    Some(EdmEntitySet {
        name: name.to_string(),
        container_namespace: container_namespace.to_string(),
        entity_type: entity_type.to_string(),
        // V1-3 has no navigation property bindings.
        bindings: Vec::new(),
    })
}

/// Turn the collected (relationship, to-role) pairs into navigation
/// properties by looking up the association end they point at.
fn resolve_navigations(
    model: &mut EdmModel,
    associations: &HashMap<String, Vec<AssociationEnd>>,
    pending: Vec<(usize, String, String, String, String)>,
    errors: &mut Vec<EdmParseError>,
) {
    for (type_index, nav_name, relationship, to_role, location) in pending {
        let Some(ends) = associations.get(&relationship) else {
            errors.push(EdmParseError {
                code: "UnresolvedAssociation",
                message: format!(
                    "NavigationProperty '{}' references unknown association '{}'",
                    nav_name, relationship
                ),
                location,
            });
            continue;
        };
        let Some(end) = ends.iter().find(|e| e.role == to_role) else {
            errors.push(EdmParseError {
                code: "UnresolvedAssociationEnd",
                message: format!(
                    "Association '{}' has no end with role '{}'",
                    relationship, to_role
                ),
                location,
            });
            continue;
        };
        model.structured_types[type_index]
            .navigation_properties
            .push(EdmNavigationProperty {
                name: nav_name,
                target_type: end.entity_type.clone(),
                is_collection: end.is_collection,
            });
    }
}
