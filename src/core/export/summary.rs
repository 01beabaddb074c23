//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting the results of
//! one sweep over variants and formats.

use crate::domain::{ApiError, ExporterError};
use std::path::PathBuf;
use std::time::Duration;

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of configuration variants resolved
    pub total_variants: usize,

    /// Number of (variant, format) units attempted
    pub units_attempted: usize,

    /// Units that wrote at least one file
    pub units_succeeded: usize,

    /// Units abandoned without output
    pub units_failed: usize,

    /// Files written to the output directory
    pub files_written: Vec<PathBuf>,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            total_variants: 0,
            units_attempted: 0,
            units_succeeded: 0,
            units_failed: 0,
            files_written: Vec::new(),
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Record a file written to disk
    pub fn add_written_file(&mut self, path: PathBuf) {
        self.files_written.push(path);
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.units_failed == 0 && self.errors.is_empty()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.units_attempted == 0 {
            return 100.0;
        }
        (self.units_succeeded as f64 / self.units_attempted as f64) * 100.0
    }

    /// Process exit code for this run: 0 when clean, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_successful() && self.units_attempted > 0 {
            0
        } else {
            1
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            variants = self.total_variants,
            units_attempted = self.units_attempted,
            succeeded = self.units_succeeded,
            failed = self.units_failed,
            files_written = self.files_written.len(),
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Network failure or non-success status
    Connection,
    /// Translation job failed remotely
    TranslationFailed,
    /// Translation job still active after the last poll
    Timeout,
    /// Translation job finished without result files
    NoResults,
    /// Request could not be built from the inputs
    Validation,
    /// Writing an artifact to disk failed
    Storage,
    /// Unknown error
    Unknown,
}

impl From<&ExporterError> for ExportErrorType {
    fn from(error: &ExporterError) -> Self {
        use crate::domain::TranslationError;

        match error {
            ExporterError::Api(ApiError::ConnectionFailed(_))
            | ExporterError::Api(ApiError::Status { .. })
            | ExporterError::Api(ApiError::MissingRedirectLocation(_))
            | ExporterError::Api(ApiError::InvalidResponse(_)) => ExportErrorType::Connection,
            ExporterError::Translation(TranslationError::Failed { .. }) => {
                ExportErrorType::TranslationFailed
            }
            ExporterError::Translation(TranslationError::TimedOut { .. }) => {
                ExportErrorType::Timeout
            }
            ExporterError::Translation(TranslationError::NoResults) => ExportErrorType::NoResults,
            ExporterError::Translation(TranslationError::UnexpectedState(_)) => {
                ExportErrorType::Unknown
            }
            ExporterError::Validation(_) => ExportErrorType::Validation,
            ExporterError::Io(_) => ExportErrorType::Storage,
            _ => ExportErrorType::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., format and variant)
    pub context: Option<String>,

    /// HTTP status, when the failure came from the service
    pub status: Option<u16>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
            status: None,
        }
    }

    /// Classify an exporter error, keeping its status code
    pub fn from_exporter_error(error: &ExporterError) -> Self {
        Self {
            error_type: ExportErrorType::from(error),
            message: error.to_string(),
            context: None,
            status: error.status(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TranslationError;

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new();

        assert_eq!(summary.total_variants, 0);
        assert_eq!(summary.units_attempted, 0);
        assert_eq!(summary.units_succeeded, 0);
        assert_eq!(summary.units_failed, 0);
        assert!(summary.files_written.is_empty());
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new().with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_export_summary_is_successful() {
        let mut summary = ExportSummary::new();
        summary.units_attempted = 4;
        summary.units_succeeded = 4;

        assert!(summary.is_successful());
        assert_eq!(summary.exit_code(), 0);

        summary.units_failed = 1;
        assert!(!summary.is_successful());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_when_nothing_attempted() {
        let summary = ExportSummary::new();
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_export_summary_success_rate() {
        let mut summary = ExportSummary::new();
        summary.units_attempted = 4;
        summary.units_succeeded = 3;

        assert_eq!(summary.success_rate(), 75.0);

        summary.units_attempted = 0;
        assert_eq!(summary.success_rate(), 100.0);
    }

    #[test]
    fn test_export_error_with_context() {
        let error = ExportError::new(ExportErrorType::Storage, "Failed to write".to_string())
            .with_context("format=STL, variant=Default".to_string());

        assert_eq!(error.error_type, ExportErrorType::Storage);
        assert_eq!(
            error.context,
            Some("format=STL, variant=Default".to_string())
        );
        assert!(error.status.is_none());
    }

    #[test]
    fn test_export_error_classification() {
        let status = ExporterError::Api(ApiError::Status {
            status: 404,
            message: "missing".to_string(),
        });
        let error = ExportError::from_exporter_error(&status);
        assert_eq!(error.error_type, ExportErrorType::Connection);
        assert_eq!(error.status, Some(404));

        let timeout = ExporterError::Translation(TranslationError::TimedOut { attempts: 30 });
        assert_eq!(ExportErrorType::from(&timeout), ExportErrorType::Timeout);

        let empty = ExporterError::Translation(TranslationError::NoResults);
        assert_eq!(ExportErrorType::from(&empty), ExportErrorType::NoResults);

        let failed = ExporterError::Translation(TranslationError::Failed {
            reason: "bad geometry".to_string(),
        });
        assert_eq!(
            ExportErrorType::from(&failed),
            ExportErrorType::TranslationFailed
        );
    }

    #[test]
    fn test_export_summary_add_error() {
        let mut summary = ExportSummary::new();

        summary.add_error(ExportError::new(
            ExportErrorType::Storage,
            "Failed to write".to_string(),
        ));
        summary.add_written_file(PathBuf::from("out/part.stl"));

        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].error_type, ExportErrorType::Storage);
        assert_eq!(summary.files_written, vec![PathBuf::from("out/part.stl")]);
    }
}
