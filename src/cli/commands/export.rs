//! Export command implementation
//!
//! Exports the requested formats for every configuration variant of one
//! part studio into a local directory.

use crate::adapters::onshape::{OnshapeClient, ReqwestTransport};
use crate::config::{load_credentials, ExporterConfig};
use crate::core::export::{ExportOrchestrator, ExportPlan, ExportSummary, TokioSleeper};
use crate::domain::{DocumentReference, ExportFormat, Resolution};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the export
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Onshape part studio URL
    pub url: String,

    /// Directory to save exported files
    pub output_dir: PathBuf,

    /// Export format (e.g. STL, STEP). Can be given multiple times
    #[arg(short = 'f', long = "format", required = true)]
    pub formats: Vec<String>,

    /// Configuration override as parameterId=value. Can be given multiple times
    #[arg(short = 'c', long = "config")]
    pub configs: Vec<String>,

    /// STL mesh resolution
    #[arg(long, value_parser = ["coarse", "medium", "fine"])]
    pub resolution: Option<String>,
}

impl ExportArgs {
    /// Execute the export
    pub async fn execute(&self, config: ExporterConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let formats = match self.parse_formats() {
            Ok(formats) => formats,
            Err(e) => {
                tracing::error!(error = %e, "Invalid export format");
                eprintln!("Invalid export format: {e}");
                return Ok(2);
            }
        };

        let reference = match DocumentReference::from_url(&self.url) {
            Ok(reference) => reference,
            Err(e) => {
                tracing::error!(url = %self.url, error = %e, "Invalid model URL");
                eprintln!("Invalid Onshape URL: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let credentials = match config
            .credentials
            .resolved_path()
            .and_then(|path| load_credentials(&path))
        {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load credentials");
                eprintln!("Failed to load credentials: {e}");
                return Ok(3);
            }
        };

        let transport = ReqwestTransport::new(&config.api, credentials)?;
        let client = OnshapeClient::new(Arc::new(transport), reference);

        let resolution = Resolution::resolve(
            self.resolution
                .as_deref()
                .or(config.export.default_resolution.as_deref()),
        );

        let plan = ExportPlan {
            formats,
            overrides: self.configs.clone(),
            resolution,
            output_dir: self.output_dir.clone(),
        };

        let orchestrator = ExportOrchestrator::new(client, Arc::new(TokioSleeper), &config, plan);

        println!("🚀 Starting export...");
        println!();

        let summary = match orchestrator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        print_summary(&summary);
        Ok(summary.exit_code())
    }

    fn parse_formats(&self) -> Result<Vec<ExportFormat>, String> {
        self.formats.iter().map(ExportFormat::new).collect()
    }
}

fn print_summary(summary: &ExportSummary) {
    for line in summary_lines(summary) {
        println!("{line}");
    }
}

/// Console report for a finished run
fn summary_lines(summary: &ExportSummary) -> Vec<String> {
    let mut lines = vec![String::new()];
    for path in &summary.files_written {
        lines.push(format!("✅ Saved {}", path.display()));
    }
    if !summary.files_written.is_empty() {
        lines.push(String::new());
    }

    lines.push("📊 Export Summary:".to_string());
    lines.push(format!("  Variants: {}", summary.total_variants));
    lines.push(format!("  Exports Attempted: {}", summary.units_attempted));
    lines.push(format!("  Successful: {}", summary.units_succeeded));
    lines.push(format!("  Failed: {}", summary.units_failed));
    lines.push(format!("  Files Written: {}", summary.files_written.len()));
    lines.push(format!("  Duration: {:.2}s", summary.duration.as_secs_f64()));
    lines.push(String::new());

    if !summary.errors.is_empty() {
        lines.push("⚠️  Errors encountered:".to_string());
        for error in &summary.errors {
            match error.status {
                Some(status) => lines.push(format!(
                    "  ❌ {:?} ({status}): {}",
                    error.error_type, error.message
                )),
                None => lines.push(format!("  ❌ {:?}: {}", error.error_type, error.message)),
            }
            if let Some(context) = &error.context {
                lines.push(format!("    Context: {context}"));
            }
        }
        lines.push(String::new());
    }

    let verdict = if summary.units_attempted == 0 {
        "⚠️  Nothing was exported"
    } else if summary.is_successful() {
        "✅ Export completed successfully!"
    } else {
        "⚠️  Export completed with failures"
    };
    lines.push(verdict.to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::{ExportError, ExportErrorType};
    use std::path::Path;

    fn args(formats: &[&str]) -> ExportArgs {
        ExportArgs {
            url: "https://cad.onshape.com/documents/D/w/W/e/E".to_string(),
            output_dir: PathBuf::from("out"),
            formats: formats.iter().map(|f| f.to_string()).collect(),
            configs: Vec::new(),
            resolution: None,
        }
    }

    #[test]
    fn test_parse_formats_uppercases() {
        let formats = args(&["stl", "Step"]).parse_formats().unwrap();
        let names: Vec<&str> = formats.iter().map(ExportFormat::name).collect();
        assert_eq!(names, vec!["STL", "STEP"]);
    }

    #[test]
    fn test_parse_formats_rejects_blank() {
        assert!(args(&["STL", " "]).parse_formats().is_err());
    }

    #[test]
    fn test_summary_lists_saved_files_and_failed_units() {
        let mut summary = ExportSummary::new();
        summary.total_variants = 1;
        summary.units_attempted = 2;
        summary.units_succeeded = 1;
        summary.units_failed = 1;
        summary.add_written_file(PathBuf::from("out/bracket.step"));
        let mut error = ExportError::new(ExportErrorType::Connection, "forbidden".to_string())
            .with_context("format=STL, variant=Default".to_string());
        error.status = Some(403);
        summary.add_error(error);

        let lines = summary_lines(&summary);

        assert!(lines.contains(&format!("✅ Saved {}", Path::new("out/bracket.step").display())));
        assert!(lines.contains(&"  ❌ Connection (403): forbidden".to_string()));
        assert!(lines.contains(&"    Context: format=STL, variant=Default".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("⚠️  Export completed with failures"));
    }

    #[test]
    fn test_summary_when_nothing_attempted() {
        let lines = summary_lines(&ExportSummary::new());
        assert!(!lines.iter().any(|l| l.contains("Saved")));
        assert_eq!(lines.last().map(String::as_str), Some("⚠️  Nothing was exported"));
    }

    #[tokio::test]
    async fn test_invalid_url_exits_with_configuration_code() {
        let mut args = args(&["STL"]);
        args.url = "https://cad.onshape.com/not-a-document".to_string();

        let code = args.execute(ExporterConfig::default()).await.unwrap();
        assert_eq!(code, 2);
    }
}
