//! Reader for V4 CSDL metadata documents (OData 4.0).

use std::collections::HashSet;

use roxmltree::{Document, Node};

use super::model::{
    EdmEntitySet, EdmEnumMember, EdmEnumType, EdmModel, EdmNavigationBinding,
    EdmNavigationProperty, EdmParseError, EdmProperty, EdmStructuredType, StructuredTypeKind,
};
use super::{node_location, parse_type_attribute, parse_type_ref};
use crate::error::OdataReverseError;

/// Parse a V4 EDMX document into an [`EdmModel`].
///
/// Structural problems are collected as a list of reader errors; any error
/// aborts the translation, matching the all-or-nothing parse contract.
pub fn parse(document: &str) -> Result<EdmModel, OdataReverseError> {
    let doc = Document::parse(document)?;
    let mut model = EdmModel::default();
    let mut errors: Vec<EdmParseError> = Vec::new();

    // Entity container contents need the full list of entity set names before
    // navigation bindings can be classified, so container nodes are parsed in
    // a second sweep.
    let mut containers: Vec<(String, Node)> = Vec::new();

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
                "EnumType" => {
                    if let Some(enum_type) =
                        parse_enum_type_node(&doc, &child, namespace, &mut errors)
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
                        &mut errors,
                    ) {
                        model.structured_types.push(complex);
                    }
                }
                "EntityContainer" => containers.push((namespace.to_string(), child)),
                _ => {}
            }
        }
    }

    let entity_set_names: HashSet<String> = containers
        .iter()
        .flat_map(|(_, container)| {
            container
                .children()
                .filter(|n| n.tag_name().name() == "EntitySet")
                .filter_map(|n| n.attribute("Name").map(|s| s.to_string()))
        })
        .collect();

    for (namespace, container) in &containers {
        for set_node in container
            .children()
            .filter(|n| n.tag_name().name() == "EntitySet")
        {
            if let Some(set) =
                parse_entity_set(&doc, set_node, namespace, &entity_set_names, &mut errors)
            {
                model.entity_sets.push(set);
            }
        }
    }

    if errors.is_empty() {
        Ok(model)
    } else {
        Err(OdataReverseError::EdmParseErrors { errors })
    }
}

/// Parse an `EnumType` element. CSDL 3.0 declares enums identically, so the
/// V1-3 reader shares this.
pub(crate) fn parse_enum_type_node(
    doc: &Document,
    node: &Node,
    namespace: &str,
    errors: &mut Vec<EdmParseError>,
) -> Option<EdmEnumType> {
    let Some(name) = node.attribute("Name") else {
        errors.push(missing_attribute(doc, node, "EnumType", "Name"));
        return None;
    };

    // Members without an explicit Value get sequential values starting at 0,
    // per the CSDL rules.
    let mut members = Vec::new();
    let mut next_value: i64 = 0;
    for member in node.children().filter(|n| n.tag_name().name() == "Member") {
        let Some(member_name) = member.attribute("Name") else {
            errors.push(missing_attribute(doc, &member, "Member", "Name"));
            continue;
        };
        let value = match member.attribute("Value") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    errors.push(EdmParseError {
                        code: "InvalidEnumMemberValue",
                        message: format!(
                            "Member '{}' of enum '{}' has non-integer value '{}'",
                            member_name, name, raw
                        ),
                        location: node_location(doc, &member),
                    });
                    continue;
                }
            },
            None => next_value,
        };
        next_value = value + 1;
        members.push(EdmEnumMember {
            name: member_name.to_string(),
            value,
        });
    }

    Some(EdmEnumType {
        namespace: namespace.to_string(),
        name: name.to_string(),
        members,
    })
}

fn parse_structured_type(
    doc: &Document,
    node: &Node,
    namespace: &str,
    kind: StructuredTypeKind,
    errors: &mut Vec<EdmParseError>,
) -> Option<EdmStructuredType> {
    let Some(name) = node.attribute("Name") else {
        errors.push(missing_attribute(doc, node, node.tag_name().name(), "Name"));
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
    let mut navigation_properties = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "Property" => {
                let Some(prop_name) = child.attribute("Name") else {
                    errors.push(missing_attribute(doc, &child, "Property", "Name"));
                    continue;
                };
                let Some(raw_type) = child.attribute("Type") else {
                    errors.push(missing_attribute(doc, &child, "Property", "Type"));
                    continue;
                };
                properties.push(EdmProperty {
                    name: prop_name.to_string(),
                    type_ref: parse_type_ref(&child, raw_type),
                });
            }
            "NavigationProperty" => {
                let Some(nav_name) = child.attribute("Name") else {
                    errors.push(missing_attribute(doc, &child, "NavigationProperty", "Name"));
                    continue;
                };
                let Some(raw_type) = child.attribute("Type") else {
                    errors.push(missing_attribute(doc, &child, "NavigationProperty", "Type"));
                    continue;
                };
                let (target_type, is_collection) = parse_type_attribute(raw_type);
                navigation_properties.push(EdmNavigationProperty {
                    name: nav_name.to_string(),
                    target_type,
                    is_collection,
                });
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
        navigation_properties,
    })
}

fn parse_entity_set(
    doc: &Document,
    node: Node,
    container_namespace: &str,
    entity_set_names: &HashSet<String>,
    errors: &mut Vec<EdmParseError>,
) -> Option<EdmEntitySet> {
    let Some(name) = node.attribute("Name") else {
        errors.push(missing_attribute(doc, &node, "EntitySet", "Name"));
        return None;
    };
    let Some(entity_type) = node.attribute("EntityType") else {
        errors.push(missing_attribute(doc, &node, "EntitySet", "EntityType"));
        return None;
    };

    let mut bindings = Vec::new();
    for binding in node
        .children()
        .filter(|n| n.tag_name().name() == "NavigationPropertyBinding")
    {
        let Some(path) = binding.attribute("Path") else {
            errors.push(missing_attribute(
                doc,
                &binding,
                "NavigationPropertyBinding",
                "Path",
            ));
            continue;
        };
        let Some(target) = binding.attribute("Target") else {
            errors.push(missing_attribute(
                doc,
                &binding,
                "NavigationPropertyBinding",
                "Target",
            ));
            continue;
        };

        // Path and Target may carry type-cast or container-qualified prefixes;
        // the last segment names the navigation property / target set.
        let navigation_property = path.rsplit('/').next().unwrap_or(path).to_string();
        let target = target.rsplit('/').next().unwrap_or(target).to_string();
        let targets_collection = entity_set_names.contains(&target);

        bindings.push(EdmNavigationBinding {
            navigation_property,
            target,
            targets_collection,
        });
    }

    Some(EdmEntitySet {
        name: name.to_string(),
        container_namespace: container_namespace.to_string(),
        entity_type: entity_type.to_string(),
        bindings,
    })
}

fn missing_attribute(
    doc: &Document,
    node: &Node,
    element: &str,
    attribute: &str,
) -> EdmParseError {
    EdmParseError {
        code: "MissingAttribute",
        message: format!("{} element has no '{}' attribute", element, attribute),
        location: node_location(doc, node),
    }
}
