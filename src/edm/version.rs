//! EDMX version detection.
//!
//! The two EDM metadata generations (V1-3 and V4) use incompatible CSDL
//! shapes, so the declared version on the document root decides which reader
//! runs. Detection happens before any structural parsing.

use roxmltree::Document;

use crate::error::OdataReverseError;

/// The metadata dialect generation declared by an EDMX document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdmVersion {
    /// EDMX versions 1.0 through 3.0.
    V3,
    /// EDMX version 4.0.
    V4,
}

/// Inspect a metadata document and extract the declared schema version.
///
/// The root element's local name must be `Edmx` (case-insensitive) and must
/// carry a numeric `Version` attribute; anything else is a fatal format error.
pub fn detect_version(document: &str) -> Result<EdmVersion, OdataReverseError> {
    let doc = Document::parse(document)?;
    let root = doc.root_element();

    if !root.tag_name().name().eq_ignore_ascii_case("Edmx") {
        return Err(OdataReverseError::InvalidFormat {
            message: format!(
                "expected an 'Edmx' root element, found '{}'",
                root.tag_name().name()
            ),
        });
    }

    let raw_version = root
        .attribute("Version")
        .ok_or_else(|| OdataReverseError::InvalidFormat {
            message: "the Edmx root element has no 'Version' attribute".to_string(),
        })?;

    let version: f64 = raw_version
        .parse()
        .map_err(|_| OdataReverseError::InvalidFormat {
            message: format!("the Edmx 'Version' attribute '{}' is not numeric", raw_version),
        })?;

    if version == 4.0 {
        Ok(EdmVersion::V4)
    } else if (1.0..=3.0).contains(&version) {
        Ok(EdmVersion::V3)
    } else {
        Err(OdataReverseError::UnsupportedVersion { version })
    }
}
