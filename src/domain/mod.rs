//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DocumentReference`], [`DocumentId`], [`ElementId`])
//! - **Configuration model** ([`ConfigurationParameter`], [`ConfigurationVariant`], [`ParameterValue`])
//! - **Export model** ([`ExportFormat`], [`Resolution`], [`ExportRequest`], [`Artifact`])
//! - **Translation job state machine** ([`TranslationJob`], [`JobState`])
//! - **Error types** ([`ExporterError`], [`ApiError`], [`TranslationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExporterError>`]:
//!
//! ```rust
//! use onshape_exporter::domain::{DocumentReference, ExporterError, Result};
//!
//! fn parse(url: &str) -> Result<DocumentReference> {
//!     DocumentReference::from_url(url).map_err(ExporterError::Validation)
//! }
//! ```

pub mod artifact;
pub mod configuration;
pub mod errors;
pub mod format;
pub mod ids;
pub mod job;
pub mod result;

// Re-export commonly used types for convenience
pub use artifact::Artifact;
pub use configuration::{
    ConfigurationOption, ConfigurationParameter, ConfigurationVariant, ParameterOverride,
    ParameterValue,
};
pub use errors::{ApiError, ExporterError, TranslationError};
pub use format::{ExportFormat, Resolution, Tessellation};
pub use ids::{DocumentId, DocumentReference, ElementId, WorkspaceId, WorkspaceKind};
pub use job::{JobState, RemoteState, TranslationJob};
pub use result::Result;

/// One unit of export work: a format for a resolved variant
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Target format
    pub format: ExportFormat,

    /// STL resolution tier, if one was requested
    pub resolution: Option<Resolution>,

    /// Variant to export
    pub variant: ConfigurationVariant,
}

impl ExportRequest {
    /// Creates an export request
    pub fn new(
        format: ExportFormat,
        resolution: Option<Resolution>,
        variant: ConfigurationVariant,
    ) -> Self {
        Self {
            format,
            resolution,
            variant,
        }
    }
}
