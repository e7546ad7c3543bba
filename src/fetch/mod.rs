//! Metadata document fetch and authentication.

pub mod prompt;

use anyhow::Result;
use log::{debug, info};

use crate::error::OdataReverseError;

pub use prompt::ConsolePrompt;

/// How the metadata request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    None,
    Basic,
}

impl std::str::FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "anonymous" => Ok(AuthMode::None),
            "basic" => Ok(AuthMode::Basic),
            _ => Err(format!("Unknown authentication mode: {}", s)),
        }
    }
}

/// Basic credentials for one request. Held only for the duration of the
/// fetch and never persisted.
#[derive(Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Supplies Basic credentials when a fetch needs them. `Ok(None)` means the
/// user cancelled, which abandons the fetch without raising an error.
pub trait CredentialSource {
    fn basic_credentials(&self, uri: &str) -> Result<Option<BasicCredentials>>;
}

/// Fetch the metadata document at `uri`.
///
/// Returns `Ok(None)` when credential entry was cancelled. Transport and
/// HTTP-status failures are fatal; there is no retry.
pub fn fetch_metadata(
    uri: &str,
    auth: AuthMode,
    credentials: &dyn CredentialSource,
) -> Result<Option<String>> {
    let basic = match auth {
        AuthMode::None => None,
        AuthMode::Basic => match credentials.basic_credentials(uri)? {
            Some(creds) => Some(creds),
            None => {
                info!("Credential entry cancelled, abandoning metadata fetch");
                return Ok(None);
            }
        },
    };

    debug!("Fetching metadata from {}", uri);

    // Older platform defaults may negotiate a TLS version the service
    // rejects; pin the minimum to 1.2.
    let client = reqwest::blocking::Client::builder()
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .build()
        .map_err(|e| OdataReverseError::FetchError {
            uri: uri.to_string(),
            source: e,
        })?;

    let mut request = client.get(uri);
    if let Some(creds) = &basic {
        request = request.basic_auth(&creds.username, Some(&creds.password));
    }

    let response = request.send().map_err(|e| OdataReverseError::FetchError {
        uri: uri.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(OdataReverseError::HttpStatus {
            uri: uri.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let body = response
        .text()
        .map_err(|e| OdataReverseError::FetchError {
            uri: uri.to_string(),
            source: e,
        })?;
    debug!("Fetched {} bytes of metadata", body.len());
    Ok(Some(body))
}
