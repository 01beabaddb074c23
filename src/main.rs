// Onshape Exporter - export every configuration of an Onshape part studio
// Copyright (c) 2025 Onshape Exporter Contributors
// Licensed under the MIT License

use clap::Parser;
use onshape_exporter::cli::Cli;
use onshape_exporter::config::{load_config, load_config_or_default, ExporterConfig};
use onshape_exporter::domain::Result;
use onshape_exporter::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(2);
        }
    };

    let guard = match init_logging(cli.effective_log_level(), &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        settings = %cli.settings,
        "Onshape Exporter"
    );

    let exit_code = match cli.export.execute(config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors, so flush the log file first
    drop(guard);
    process::exit(exit_code);
}

/// A missing settings file is only an error when it was named explicitly
fn load_settings(cli: &Cli) -> Result<ExporterConfig> {
    if cli.settings_explicit() {
        load_config(&cli.settings)
    } else {
        load_config_or_default(&cli.settings)
    }
}
