//! Reverse-engineer an OData `$metadata` document into a relational data
//! model: tables from entity and complex types, enum domains, references from
//! navigation properties, and one view per entity set.

pub mod edm;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod model;

use anyhow::Result;
use log::{debug, info};

use crate::edm::{detect_version, parse_document};
use crate::error::OdataReverseError;
use crate::fetch::{fetch_metadata, AuthMode, CredentialSource};
use crate::merge::{merge_into, MergeReport};
use crate::model::{build_model, DataModel, ModelSource, ProjectionStyle};

/// Options for one reverse-engineering run.
#[derive(Debug, Clone)]
pub struct ReverseOptions {
    pub metadata_uri: String,
    pub model_name: String,
    pub auth_mode: AuthMode,
    pub projection: ProjectionStyle,
}

/// How a reverse or update run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseOutcome {
    Completed(MergeReport),
    /// Credential entry was cancelled; nothing was fetched and the target
    /// model is unchanged.
    Cancelled,
}

/// Translate a metadata document into a standalone data model.
///
/// This is the pure core of a run: no network, no merging. The version is
/// detected from the document root and the matching CSDL reader runs.
pub fn translate_document(
    document: &str,
    model_name: &str,
    projection: ProjectionStyle,
) -> Result<DataModel, OdataReverseError> {
    let version = detect_version(document)?;
    debug!("Detected EDM version: {:?}", version);

    let edm = parse_document(version, document)?;
    debug!(
        "Parsed {} structured type(s), {} enum type(s), {} entity set(s)",
        edm.structured_types.len(),
        edm.enum_types.len(),
        edm.entity_sets.len()
    );

    let mut scratch = DataModel::new(model_name);
    build_model(&edm, &mut scratch, projection)?;
    Ok(scratch)
}

/// Fetch, translate and merge metadata into the target model.
///
/// The translation builds into a scratch graph which is merged additively
/// into `target` and then discarded; on a merge refusal the target is left
/// untouched and the refusal is surfaced as an error. After a successful
/// merge the fetch provenance (URI and auth mode, never credentials) is
/// recorded on the target so [`update_model`] can replay it.
pub fn reverse_metadata(
    options: &ReverseOptions,
    target: &mut DataModel,
    credentials: &dyn CredentialSource,
) -> Result<ReverseOutcome> {
    info!(
        "Reverse-engineering OData metadata from {}",
        options.metadata_uri
    );

    let Some(document) = fetch_metadata(&options.metadata_uri, options.auth_mode, credentials)?
    else {
        return Ok(ReverseOutcome::Cancelled);
    };

    let scratch = translate_document(&document, &options.model_name, options.projection)?;

    let report = merge_into(target, &scratch);
    if !report.success {
        return Err(OdataReverseError::MergeError {
            message: "the metadata produced no tables".to_string(),
        }
        .into());
    }

    target.source = Some(ModelSource {
        metadata_uri: options.metadata_uri.clone(),
        auth_mode: options.auth_mode,
    });
    Ok(ReverseOutcome::Completed(report))
}

/// Re-fetch the metadata a model was reversed from and merge the changes in.
///
/// Uses the provenance recorded by [`reverse_metadata`]; a model without one
/// cannot be updated.
pub fn update_model(
    target: &mut DataModel,
    projection: ProjectionStyle,
    credentials: &dyn CredentialSource,
) -> Result<ReverseOutcome> {
    let Some(source) = target.source.clone() else {
        return Err(OdataReverseError::MergeError {
            message: format!(
                "model '{}' has no recorded metadata source to update from",
                target.name
            ),
        }
        .into());
    };

    let options = ReverseOptions {
        metadata_uri: source.metadata_uri,
        model_name: target.name.clone(),
        auth_mode: source.auth_mode,
        projection,
    };
    reverse_metadata(&options, target, credentials)
}
