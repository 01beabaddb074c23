//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by level or `RUST_LOG`
//! - JSON-formatted local log files with rotation
//! - Per-unit export events through the `log_export_*` macros
//!
//! # Example
//!
//! ```no_run
//! use onshape_exporter::logging::init_logging;
//! use onshape_exporter::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of one (format, variant) export unit
///
/// # Example
///
/// ```no_run
/// use onshape_exporter::log_export_start;
///
/// log_export_start!("STEP", "Default", "async");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($format:expr, $variant:expr, $protocol:expr) => {
        tracing::info!(
            format = %$format,
            variant = %$variant,
            protocol = $protocol,
            "Starting export"
        );
    };
}

/// Log the completion of one export unit
///
/// # Example
///
/// ```no_run
/// use onshape_exporter::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("STL", "Default", 1, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($format:expr, $variant:expr, $files:expr, $duration:expr) => {
        tracing::info!(
            format = %$format,
            variant = %$variant,
            files = $files,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an abandoned export unit
///
/// # Example
///
/// ```no_run
/// use onshape_exporter::log_export_failure;
/// use onshape_exporter::domain::ExporterError;
///
/// let error = ExporterError::Validation("bad tier".to_string());
/// log_export_failure!("STL", "Default", &error);
/// ```
#[macro_export]
macro_rules! log_export_failure {
    ($format:expr, $variant:expr, $error:expr) => {
        tracing::error!(
            format = %$format,
            variant = %$variant,
            status = ?$error.status(),
            error = %$error,
            "Export failed"
        );
    };
}

/// Log one translation status poll
///
/// # Example
///
/// ```no_run
/// use onshape_exporter::log_poll_attempt;
///
/// log_poll_attempt!("job-1", 2, 30, "ACTIVE");
/// ```
#[macro_export]
macro_rules! log_poll_attempt {
    ($job_id:expr, $attempt:expr, $max_attempts:expr, $state:expr) => {
        tracing::debug!(
            job_id = %$job_id,
            attempt = $attempt,
            max_attempts = $max_attempts,
            state = %$state,
            "Polled translation status"
        );
    };
}
