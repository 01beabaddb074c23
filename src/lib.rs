// Onshape Exporter - export every configuration of an Onshape part studio
// Copyright (c) 2025 Onshape Exporter Contributors
// Licensed under the MIT License

//! # Onshape Exporter
//!
//! Exports mesh and exchange-format files (STL, STEP, IGES, ...) from an
//! Onshape part studio, once for every configuration variant, into uniquely
//! named files on disk.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** configuration variants, either from explicit
//!   `parameterId=value` overrides or by discovering every option
//! - **Exporting** STL through the synchronous mesh endpoint and every other
//!   format through polled translation jobs
//! - **Naming** artifacts deterministically so a run never overwrites itself
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Variant resolution, export orchestration, naming
//! - [`adapters`] - Onshape REST API integration
//! - [`domain`] - Core domain types and models
//! - [`config`] - Settings and credentials
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use onshape_exporter::adapters::onshape::{OnshapeClient, ReqwestTransport};
//! use onshape_exporter::config::{load_config_or_default, load_credentials};
//! use onshape_exporter::core::export::{ExportOrchestrator, ExportPlan, TokioSleeper};
//! use onshape_exporter::domain::{DocumentReference, ExportFormat, Resolution};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("onshape-exporter.toml")?;
//!     let credentials = load_credentials(&config.credentials.resolved_path()?)?;
//!
//!     let transport = ReqwestTransport::new(&config.api, credentials)?;
//!     let reference = DocumentReference::from_url(
//!         "https://cad.onshape.com/documents/abc/w/def/e/ghi",
//!     )?;
//!     let client = OnshapeClient::new(Arc::new(transport), reference);
//!
//!     let plan = ExportPlan {
//!         formats: vec![ExportFormat::new("STEP")?],
//!         overrides: vec!["List_size=_large".to_string()],
//!         resolution: Resolution::Fine,
//!         output_dir: "exports".into(),
//!     };
//!     let summary = ExportOrchestrator::new(client, Arc::new(TokioSleeper), &config, plan)
//!         .execute_export()
//!         .await?;
//!
//!     println!("Wrote {} files", summary.files_written.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], an alias over
//! [`domain::ExporterError`]. A failing export unit never aborts the sweep;
//! it is recorded in the [`core::export::ExportSummary`] instead.
//!
//! ## Logging
//!
//! Logging goes through `tracing`. `--verbose` raises the level to debug,
//! which also logs every API request and response.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
