//! Configuration management for the exporter.
//!
//! Configuration is optional: every setting has a default, and a TOML file
//! only needs the values it changes.
//!
//! # Overview
//!
//! - Environment variable substitution (`${VAR_NAME}`) inside the TOML file
//! - `ONSHAPE_EXPORTER_*` environment overrides
//! - Validation on load
//! - Credential resolution kept separate from the rest of the configuration
//!
//! # Configuration Structure
//!
//! - [`ApiConfig`] - API host and request timeout
//! - [`PollingConfig`] - Translation job poll budget
//! - [`ExportConfig`] - Default resolution and STL protocol
//! - [`CredentialsConfig`] - Credential file location
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://cad.onshape.com"
//! timeout_seconds = 60
//!
//! [polling]
//! max_attempts = 30
//! interval_ms = 2000
//!
//! [export]
//! default_resolution = "medium"
//! stl_protocol = "sync"
//!
//! [credentials]
//! path = "${HOME}/.config/onshape-exporter.json"
//! ```

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use credentials::{
    load_credentials, load_credentials_with, CredentialPrompt, Credentials, TerminalPrompt,
};
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApiConfig, CredentialsConfig, ExportConfig, ExporterConfig, LoggingConfig, PollingConfig,
    StlProtocol,
};
pub use secret::{secret_string, SecretString, SecretValue};
