//! Core export logic.
//!
//! # Modules
//!
//! - [`configuration`] - Resolving configuration variants from overrides or discovery
//! - [`export`] - Export orchestration, job polling and reporting
//! - [`naming`] - Slugs and collision-aware output filenames
//!
//! # Export Workflow
//!
//! 1. **Name**: Look up the part studio name
//! 2. **Resolve**: Encode overrides, or discover every configuration option
//! 3. **Export**: For every variant and format, run the synchronous STL
//!    export or a translation job
//! 4. **Write**: Name each artifact and write it to the output directory
//! 5. **Report**: Produce an export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use onshape_exporter::adapters::onshape::{OnshapeClient, ReqwestTransport};
//! use onshape_exporter::config::{load_config_or_default, Credentials};
//! use onshape_exporter::core::export::{ExportOrchestrator, ExportPlan, TokioSleeper};
//! use onshape_exporter::domain::{DocumentReference, ExportFormat, Resolution};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("onshape-exporter.toml")?;
//! let credentials = Credentials::new("access", "secret")?;
//! let transport = ReqwestTransport::new(&config.api, credentials)?;
//! let reference = DocumentReference::from_url(
//!     "https://cad.onshape.com/documents/abc/w/def/e/ghi",
//! )?;
//! let client = OnshapeClient::new(Arc::new(transport), reference);
//!
//! let plan = ExportPlan {
//!     formats: vec![ExportFormat::new("STEP")?, ExportFormat::new("STL")?],
//!     overrides: Vec::new(),
//!     resolution: Resolution::Fine,
//!     output_dir: "exports".into(),
//! };
//! let orchestrator = ExportOrchestrator::new(client, Arc::new(TokioSleeper), &config, plan);
//! let summary = orchestrator.execute_export().await?;
//!
//! println!("Succeeded: {}", summary.units_succeeded);
//! println!("Failed: {}", summary.units_failed);
//! # Ok(())
//! # }
//! ```

pub mod configuration;
pub mod export;
pub mod naming;
