//! Error types for odata-reverse

use thiserror::Error;

use crate::edm::EdmParseError;

/// Errors that can occur while reverse-engineering an OData metadata document
#[derive(Error, Debug)]
pub enum OdataReverseError {
    #[error("Invalid metadata document: {message}")]
    InvalidFormat { message: String },

    #[error("Unsupported EDMX version: {version}")]
    UnsupportedVersion { version: f64 },

    #[error("Failed to parse metadata XML")]
    XmlError {
        #[from]
        source: roxmltree::Error,
    },

    #[error("{} error(s) reported while parsing the EDM model", errors.len())]
    EdmParseErrors { errors: Vec<EdmParseError> },

    #[error("The {object_kind} '{name}' was not found")]
    NotFound {
        object_kind: &'static str,
        name: String,
    },

    #[error("Failed to fetch metadata from {uri}")]
    FetchError {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Metadata request to {uri} returned HTTP status {status}")]
    HttpStatus { uri: String, status: u16 },

    #[error("Model merge failed: {message}")]
    MergeError { message: String },
}
