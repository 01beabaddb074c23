//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::Parser;

/// Settings file read when `--settings` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "onshape-exporter.toml";

/// Onshape Exporter - export every configuration of a part studio
#[derive(Parser, Debug)]
#[command(name = "onshape-exporter")]
#[command(version, about, long_about = None)]
#[command(author = "Onshape Exporter Contributors")]
pub struct Cli {
    /// Path to the settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE, env = "ONSHAPE_EXPORTER_CONFIG")]
    pub settings: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ONSHAPE_EXPORTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log every API request and response
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub export: commands::export::ExportArgs,
}

impl Cli {
    /// Effective log level; `--verbose` wins over `--log-level`
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or("info")
        }
    }

    /// True when the settings path was chosen by the user
    pub fn settings_explicit(&self) -> bool {
        self.settings != DEFAULT_SETTINGS_FILE
    }
}
