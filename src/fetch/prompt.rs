//! Interactive console credential entry.

use anyhow::Result;
use dialoguer::Input;

use super::{BasicCredentials, CredentialSource};

/// Collects Basic credentials on the terminal. An empty username is treated
/// as cancellation.
pub struct ConsolePrompt;

impl CredentialSource for ConsolePrompt {
    fn basic_credentials(&self, uri: &str) -> Result<Option<BasicCredentials>> {
        let username: String = Input::new()
            .with_prompt(format!("Username for {} (empty to cancel)", uri))
            .allow_empty(true)
            .interact_text()?;
        if username.is_empty() {
            return Ok(None);
        }

        let password = rpassword::prompt_password("Password: ")?;

        Ok(Some(BasicCredentials { username, password }))
    }
}
