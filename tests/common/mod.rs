//! Common test utilities for odata-reverse tests

use std::fs;
use std::path::PathBuf;

use odata_reverse::model::{DataModel, ProjectionStyle};

/// Read a metadata document from tests/fixtures.
pub fn load_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Translate a fixture document into a fresh data model, panicking on failure.
pub fn translate_fixture(name: &str, projection: ProjectionStyle) -> DataModel {
    let document = load_fixture(name);
    odata_reverse::translate_document(&document, "Test model", projection)
        .unwrap_or_else(|e| panic!("Translation of fixture '{}' failed: {}", name, e))
}
