//! Downloaded export artifacts

use super::format::ExportFormat;

/// One downloaded output file, not yet named or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Raw file content
    pub bytes: Vec<u8>,

    /// Slugified stem derived from the part studio and variant
    pub suggested_base_name: String,

    /// Lower-case extension (`stl`, `step`, ...)
    pub format_extension: String,

    /// Zero-based position among the job's results
    pub index_within_job: usize,

    /// Number of results the job reported, including failed downloads
    pub job_size: usize,
}

impl Artifact {
    /// Creates an artifact from downloaded bytes
    pub fn new(
        bytes: Vec<u8>,
        suggested_base_name: impl Into<String>,
        format: &ExportFormat,
        index_within_job: usize,
        job_size: usize,
    ) -> Self {
        Self {
            bytes,
            suggested_base_name: suggested_base_name.into(),
            format_extension: format.extension(),
            index_within_job,
            job_size,
        }
    }

    /// A single-result artifact, as produced by the synchronous path
    pub fn single(bytes: Vec<u8>, suggested_base_name: impl Into<String>, format: &ExportFormat) -> Self {
        Self::new(bytes, suggested_base_name, format, 0, 1)
    }
}
