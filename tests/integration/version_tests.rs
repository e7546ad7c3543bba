//! Version detection against real fixture documents.

use odata_reverse::edm::{detect_version, EdmVersion};
use odata_reverse::error::OdataReverseError;

use crate::common::load_fixture;

#[test]
fn test_v4_fixture_detects_v4() {
    let document = load_fixture("person_v4.xml");
    assert_eq!(detect_version(&document).unwrap(), EdmVersion::V4);
}

#[test]
fn test_v3_fixture_detects_v3() {
    let document = load_fixture("northwind_v3.xml");
    assert_eq!(detect_version(&document).unwrap(), EdmVersion::V3);
}

#[test]
fn test_future_version_is_rejected() {
    let document = r#"<Edmx Version="5.0" xmlns="http://docs.oasis-open.org/odata/ns/edmx"/>"#;
    match detect_version(document) {
        Err(OdataReverseError::UnsupportedVersion { version }) => assert_eq!(version, 5.0),
        other => panic!("expected an unsupported version error, got {:?}", other),
    }
}
