//! EDM metadata parsing layer.
//!
//! `detect_version` picks the dialect from the document root, and
//! `parse_document` runs the matching CSDL reader. Both readers emit the same
//! [`EdmModel`] shape, so everything downstream is dialect-agnostic. The only
//! capability difference that survives parsing is that V1-3 documents expose
//! no navigation property bindings on their entity sets.

pub mod csdl_v3;
pub mod csdl_v4;
pub mod model;
pub mod version;

use log::error;
use roxmltree::{Document, Node};

pub use model::{
    EdmEntitySet, EdmEnumMember, EdmEnumType, EdmModel, EdmNavigationBinding,
    EdmNavigationProperty, EdmParseError, EdmPrimitiveKind, EdmProperty, EdmStructuredType,
    EdmTypeRef, StructuredTypeKind,
};
pub use version::{detect_version, EdmVersion};

use crate::error::OdataReverseError;

/// Parse a metadata document with the reader matching its detected version.
///
/// Structured reader errors are logged exhaustively (code, message, location)
/// before the translation is aborted.
pub fn parse_document(
    version: EdmVersion,
    document: &str,
) -> Result<EdmModel, OdataReverseError> {
    let result = match version {
        EdmVersion::V4 => csdl_v4::parse(document),
        EdmVersion::V3 => csdl_v3::parse(document),
    };

    if let Err(OdataReverseError::EdmParseErrors { errors }) = &result {
        error!("Errors occurred while parsing the OData metadata:");
        for edm_error in errors {
            error!(" {}", edm_error);
        }
    }

    result
}

/// Format a node's source position as `line:column` for reader error reports.
pub(crate) fn node_location(doc: &Document, node: &Node) -> String {
    let pos = doc.text_pos_at(node.range().start);
    format!("{}:{}", pos.row, pos.col)
}

/// Split a `Type` attribute value into the referenced type name and a flag
/// telling whether it was wrapped in `Collection(...)`.
pub(crate) fn parse_type_attribute(raw: &str) -> (String, bool) {
    match raw
        .strip_prefix("Collection(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (inner.to_string(), true),
        None => (raw.to_string(), false),
    }
}

/// Read the type facets shared by both CSDL dialects from a `Property` node.
pub(crate) fn parse_type_ref(node: &Node, raw_type: &str) -> model::EdmTypeRef {
    let (name, is_collection) = parse_type_attribute(raw_type);

    // Nullable defaults to true when not declared.
    let nullable = node.attribute("Nullable") != Some("false");

    // MaxLength="Max" means unbounded, which maps to "no length" downstream.
    let max_length = node
        .attribute("MaxLength")
        .filter(|v| !v.eq_ignore_ascii_case("max"))
        .and_then(|v| v.parse().ok());
    let precision = node.attribute("Precision").and_then(|v| v.parse().ok());
    let scale = node.attribute("Scale").and_then(|v| v.parse().ok());

    model::EdmTypeRef {
        name,
        is_collection,
        nullable,
        max_length,
        precision,
        scale,
    }
}
