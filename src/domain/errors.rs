//! Domain error types
//!
//! This module defines the error hierarchy for the exporter.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credential loading or persistence errors
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Translation job errors
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ExporterError {
    /// HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ExporterError::Api(ApiError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Remote API errors
///
/// Errors that occur while talking to the CAD service. These errors don't
/// expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection dropped
    #[error("Failed to connect to API: {0}")]
    ConnectionFailed(String),

    /// Server answered with a non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Redirect status without a usable `Location` header
    #[error("Redirect ({0}) without a Location header")]
    MissingRedirectLocation(u16),
}

/// Translation job outcomes that end an export unit without artifacts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// The remote service reported the job as failed
    #[error("Translation failed: {reason}")]
    Failed { reason: String },

    /// The job was still active after the last poll attempt
    #[error("Translation timed out after {attempts} poll attempts")]
    TimedOut { attempts: u32 },

    /// The job finished but produced nothing to download
    #[error("No result files available for download")]
    NoResults,

    /// The remote service reported a state we do not know
    #[error("Translation ended in unexpected state: {0}")]
    UnexpectedState(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}
