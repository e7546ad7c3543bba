//! Pipeline entry points: cancellation and provenance handling.

use anyhow::Result;
use pretty_assertions::assert_eq;

use odata_reverse::error::OdataReverseError;
use odata_reverse::fetch::{AuthMode, BasicCredentials, CredentialSource};
use odata_reverse::model::{DataModel, ProjectionStyle};
use odata_reverse::{reverse_metadata, update_model, ReverseOptions, ReverseOutcome};

use crate::common::translate_fixture;

/// Declines every credential prompt, so Basic-auth runs cancel before any
/// network traffic.
struct Declining;

impl CredentialSource for Declining {
    fn basic_credentials(&self, _uri: &str) -> Result<Option<BasicCredentials>> {
        Ok(None)
    }
}

#[test]
fn test_cancelled_reverse_leaves_the_target_untouched() {
    let mut target = translate_fixture("person_v4.xml", ProjectionStyle::View);
    let snapshot = target.clone();

    let options = ReverseOptions {
        metadata_uri: "https://example.invalid/odata/$metadata".to_string(),
        model_name: "Target".to_string(),
        auth_mode: AuthMode::Basic,
        projection: ProjectionStyle::View,
    };
    let outcome = reverse_metadata(&options, &mut target, &Declining).unwrap();

    assert_eq!(outcome, ReverseOutcome::Cancelled);
    assert_eq!(target, snapshot);
    // No provenance is recorded for a run that never fetched.
    assert_eq!(target.source, None);
}

#[test]
fn test_update_without_a_recorded_source_is_refused() {
    let mut model = DataModel::new("Standalone");

    let err = update_model(&mut model, ProjectionStyle::View, &Declining).unwrap_err();

    match err.downcast_ref::<OdataReverseError>() {
        Some(OdataReverseError::MergeError { message }) => {
            assert!(
                message.contains("no recorded metadata source"),
                "unexpected message: {}",
                message
            );
        }
        other => panic!("expected a merge refusal, got {:?}", other),
    }
    assert_eq!(model, DataModel::new("Standalone"));
}
