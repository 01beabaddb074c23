//! Export orchestrator - drives the sweep over variants and formats
//!
//! Resolves the configuration variants, then exports every requested format
//! for every variant in order. STL goes through the synchronous mesh
//! endpoint unless configured otherwise; everything else is a translation
//! job. A failing unit is recorded and the sweep moves on.

use crate::adapters::onshape::{OnshapeClient, TranslationRequest};
use crate::config::{ExporterConfig, StlProtocol};
use crate::core::configuration::ConfigResolver;
use crate::core::export::poller::{JobPoller, Sleeper};
use crate::core::export::query::{extract_configuration, translation_configuration};
use crate::core::export::stl::export_stl_sync;
use crate::core::export::summary::{ExportError, ExportErrorType, ExportSummary};
use crate::core::naming::ArtifactNamer;
use crate::domain::{Artifact, ExportFormat, ExportRequest, ExporterError, Resolution, Result};
use crate::{log_export_complete, log_export_failure, log_export_start};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// What one run should export and where
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Formats in the order they were requested
    pub formats: Vec<ExportFormat>,

    /// Raw `parameterId=value` overrides; empty means discovery
    pub overrides: Vec<String>,

    /// STL resolution tier
    pub resolution: Resolution,

    /// Directory the files are written to, created if absent
    pub output_dir: PathBuf,
}

/// Export orchestrator
pub struct ExportOrchestrator {
    client: OnshapeClient,
    poller: JobPoller,
    stl_protocol: StlProtocol,
    plan: ExportPlan,
}

impl ExportOrchestrator {
    /// Create a new export orchestrator
    pub fn new(
        client: OnshapeClient,
        sleeper: Arc<dyn Sleeper>,
        config: &ExporterConfig,
        plan: ExportPlan,
    ) -> Self {
        let poller = JobPoller::new(client.clone(), sleeper, &config.polling);
        Self {
            client,
            poller,
            stl_protocol: config.export.stl_protocol,
            plan,
        }
    }

    /// Execute the export
    ///
    /// 1. Creates the output directory
    /// 2. Looks up the part studio name
    /// 3. Resolves the configuration variants
    /// 4. Exports every format for every variant
    ///
    /// Only a failure to create the output directory is returned as an
    /// error; everything after that ends up in the summary.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        tokio::fs::create_dir_all(&self.plan.output_dir)
            .await
            .map_err(|e| {
                ExporterError::Io(format!(
                    "Failed to create output directory {}: {e}",
                    self.plan.output_dir.display()
                ))
            })?;

        let reference = self.client.reference();
        tracing::info!(
            document_id = %reference.document_id,
            element_id = %reference.element_id,
            formats = ?self.plan.formats.iter().map(ExportFormat::name).collect::<Vec<_>>(),
            output_dir = %self.plan.output_dir.display(),
            "Starting export process"
        );

        let part_studio_name = self.client.part_studio_name().await;
        tracing::info!(part_studio = %part_studio_name, "Resolved part studio name");

        let variants = ConfigResolver::new(&self.client)
            .resolve(&self.plan.overrides)
            .await;
        summary.total_variants = variants.len();

        if variants.is_empty() {
            tracing::warn!("No configuration variants to export");
        }

        let mut namer = ArtifactNamer::new();
        for variant in &variants {
            for format in &self.plan.formats {
                let resolution = format.is_stl().then_some(self.plan.resolution);
                let request = ExportRequest::new(format.clone(), resolution, variant.clone());
                self.process_unit(&request, &part_studio_name, &mut namer, &mut summary)
                    .await;
            }
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    /// Export, name and write one (variant, format) unit
    async fn process_unit(
        &self,
        request: &ExportRequest,
        part_studio_name: &str,
        namer: &mut ArtifactNamer,
        summary: &mut ExportSummary,
    ) {
        let unit_start = Instant::now();
        let format = &request.format;
        let variant = &request.variant;
        let context = format!("format={}, variant={}", format, variant.display_name);
        summary.units_attempted += 1;

        let base_name = ArtifactNamer::base_name(Some(part_studio_name), &variant.display_name);
        let artifacts = match self.export_unit(request, &base_name).await {
            Ok(artifacts) => artifacts,
            Err(e) => {
                log_export_failure!(format, variant, e);
                summary.units_failed += 1;
                summary.add_error(ExportError::from_exporter_error(&e).with_context(context));
                return;
            }
        };

        if let Some(expected) = artifacts.first().map(|a| a.job_size) {
            if artifacts.len() < expected {
                summary.add_error(
                    ExportError::new(
                        ExportErrorType::Connection,
                        format!(
                            "{} of {} results could not be downloaded",
                            expected - artifacts.len(),
                            expected
                        ),
                    )
                    .with_context(context.clone()),
                );
            }
        }

        let mut written = 0;
        for artifact in &artifacts {
            let file_name = namer.file_name(artifact);
            match write_artifact(&self.plan.output_dir, &file_name, artifact).await {
                Ok(path) => {
                    summary.add_written_file(path);
                    written += 1;
                }
                Err(e) => {
                    tracing::error!(file_name = %file_name, error = %e, "Failed to write artifact");
                    summary.add_error(
                        ExportError::new(ExportErrorType::Storage, e.to_string())
                            .with_context(context.clone()),
                    );
                }
            }
        }

        if written > 0 {
            summary.units_succeeded += 1;
            log_export_complete!(format, variant, written, unit_start.elapsed());
        } else {
            summary.units_failed += 1;
            if artifacts.is_empty() {
                tracing::warn!(format = %format, variant = %variant, "Export produced no files");
                summary.add_error(
                    ExportError::new(
                        ExportErrorType::Connection,
                        "No result could be downloaded".to_string(),
                    )
                    .with_context(context),
                );
            }
        }
    }

    /// Runs the protocol that fits the request
    async fn export_unit(&self, request: &ExportRequest, base_name: &str) -> Result<Vec<Artifact>> {
        let configuration = extract_configuration(&request.variant.encoded_query);

        if request.format.is_stl() && self.stl_protocol == StlProtocol::Sync {
            log_export_start!(request.format, request.variant, "sync");
            let resolution = request.resolution.unwrap_or_default();
            let bytes = export_stl_sync(&self.client, resolution, configuration.as_deref()).await?;
            return Ok(vec![Artifact::single(bytes, base_name, &request.format)]);
        }

        log_export_start!(request.format, request.variant, "async");
        let translation = translation_request(request, configuration.as_deref());
        self.poller
            .export(&translation, base_name, &request.format)
            .await
    }
}

/// Translation job body for a request
///
/// `resolution` is only sent for STL.
pub fn translation_request(request: &ExportRequest, configuration: Option<&str>) -> TranslationRequest {
    let mut body = TranslationRequest::new(request.format.name());
    if request.format.is_stl() {
        body.resolution = Some(request.resolution.unwrap_or_default().as_str().to_string());
    }
    body.configuration = configuration.map(translation_configuration);
    body
}

async fn write_artifact(output_dir: &Path, file_name: &str, artifact: &Artifact) -> Result<PathBuf> {
    let path = output_dir.join(file_name);
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .map_err(|e| ExporterError::Io(format!("Failed to write {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "Saved artifact");
    Ok(path)
}
