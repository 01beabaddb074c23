//! API credential loading and persistence
//!
//! Credentials are resolved once at startup and handed to the transport;
//! nothing else reads them. Sources, in order:
//!
//! 1. `ONSHAPE_ACCESS_KEY` / `ONSHAPE_SECRET_KEY` environment variables
//! 2. The JSON credential file (`{"access_key": ..., "secret_key": ...}`)
//! 3. An interactive prompt, whose answers are saved to the credential file.
//!    The secret key is read with terminal echo off.

use super::secret::{secret_string, SecretString};
use crate::domain::{ExporterError, Result};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the access key
pub const ACCESS_KEY_ENV: &str = "ONSHAPE_ACCESS_KEY";

/// Environment variable holding the secret key
pub const SECRET_KEY_ENV: &str = "ONSHAPE_SECRET_KEY";

/// API key pair used for HTTP basic authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Public access key
    pub access_key: String,

    /// Secret key, zeroized on drop
    pub secret_key: SecretString,
}

impl Credentials {
    /// Creates credentials, rejecting blank keys
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            access_key: access_key.into().trim().to_string(),
            secret_key: secret_string(secret_key.into().trim().to_string()),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        if self.access_key.is_empty() {
            return Err(ExporterError::Credentials(
                "access key cannot be empty".to_string(),
            ));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ExporterError::Credentials(
                "secret key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads credentials from the environment, if both keys are set
    pub fn from_env() -> Option<Result<Self>> {
        let access_key = std::env::var(ACCESS_KEY_ENV).ok()?;
        let secret_key = std::env::var(SECRET_KEY_ENV).ok()?;
        Some(Self::new(access_key, secret_key))
    }

    /// Reads a credential file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds
    /// blank keys.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExporterError::Credentials(format!(
                "Failed to read credential file {}: {e}",
                path.display()
            ))
        })?;
        let credentials: Credentials = serde_json::from_str(&contents).map_err(|e| {
            ExporterError::Credentials(format!(
                "Failed to parse credential file {}: {e}",
                path.display()
            ))
        })?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Writes the credential file, creating parent directories
    ///
    /// On unix the file is created with mode `0600`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(path = %path.display(), "Saved API credentials");
        Ok(())
    }
}

/// Source of interactively entered keys
pub trait CredentialPrompt {
    /// Asks for the access key
    fn access_key(&self) -> Result<String>;

    /// Asks for the secret key
    fn secret_key(&self) -> Result<String>;
}

/// Terminal prompt; the secret key is read without echo
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn access_key(&self) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt("Enter Onshape Access Key")
            .interact_text()
            .map_err(|e| ExporterError::Credentials(format!("Input error: {e}")))
    }

    fn secret_key(&self) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt("Enter Onshape Secret Key")
            .interact()
            .map_err(|e| ExporterError::Credentials(format!("Input error: {e}")))
    }
}

/// Resolves credentials from the environment, the file, or the terminal
///
/// Prompted credentials are persisted to `path` for the next run.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    load_credentials_with(path, &TerminalPrompt)
}

/// [`load_credentials`] with a caller-supplied prompt
pub fn load_credentials_with(path: &Path, prompt: &dyn CredentialPrompt) -> Result<Credentials> {
    if let Some(credentials) = Credentials::from_env() {
        tracing::debug!("Using API credentials from environment");
        return credentials;
    }

    if path.exists() {
        tracing::debug!(path = %path.display(), "Using API credentials from file");
        return Credentials::from_file(path);
    }

    let access_key = prompt.access_key()?;
    let secret_key = prompt.secret_key()?;
    let credentials = Credentials::new(access_key, secret_key)?;
    credentials.save(path)?;
    Ok(credentials)
}
