//! Configuration schema types
//!
//! Every section has defaults, so an empty file (or no file at all) is a
//! valid configuration.

use crate::domain::{ExporterError, Result as DomainResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://cad.onshape.com";

/// Credential file location relative to the home directory
pub const DEFAULT_CREDENTIALS_FILE: &str = ".config/onshape-exporter.json";

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExporterConfig {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Translation job polling
    #[serde(default)]
    pub polling: PollingConfig,

    /// Export behavior
    #[serde(default)]
    pub export: ExportConfig,

    /// Credential file location
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.api.validate()?;
        self.polling.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the CAD service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Translation job polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Maximum number of status polls before a job times out
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before each poll in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("polling.max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Which protocol STL exports use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StlProtocol {
    /// Dedicated mesh endpoint with redirect to the content
    #[default]
    Sync,
    /// Translation job, like every other format
    Async,
}

impl std::str::FromStr for StlProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sync" => Ok(StlProtocol::Sync),
            "async" => Ok(StlProtocol::Async),
            other => Err(format!(
                "Invalid stl_protocol '{other}'. Must be one of: sync, async"
            )),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Resolution used when `--resolution` is not given
    #[serde(default)]
    pub default_resolution: Option<String>,

    /// STL export protocol
    #[serde(default)]
    pub stl_protocol: StlProtocol,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        // Unknown tiers fall back to fine at export time, but an empty
        // string is almost certainly a templating mistake.
        if let Some(res) = &self.default_resolution {
            if res.trim().is_empty() {
                return Err("export.default_resolution cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Credential file configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Path of the JSON credential file
    #[serde(default)]
    pub path: Option<String>,
}

impl CredentialsConfig {
    /// Configured path, or `~/.config/onshape-exporter.json`
    ///
    /// # Errors
    ///
    /// Returns a credentials error when no path is configured and the home
    /// directory cannot be determined.
    pub fn resolved_path(&self) -> DomainResult<PathBuf> {
        self.resolve_against(dirs::home_dir())
    }

    fn resolve_against(&self, home: Option<PathBuf>) -> DomainResult<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(PathBuf::from(path));
        }
        home.map(|home| home.join(DEFAULT_CREDENTIALS_FILE))
            .ok_or_else(|| {
                ExporterError::Credentials(
                    "Could not determine home directory; set credentials.path".to_string(),
                )
            })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rotating file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    30
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
