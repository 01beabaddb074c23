//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid placeholder regex"));

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (ONSHAPE_EXPORTER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, if parsing or
/// substitution fails, or if validation fails.
///
/// # Examples
///
/// ```no_run
/// use onshape_exporter::config::loader::load_config;
///
/// let config = load_config("onshape-exporter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads the configuration file if it exists, otherwise uses defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file found, using defaults");
    finish(ExporterConfig::default())
}

fn finish(mut config: ExporterConfig) -> Result<ExporterConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in ENV_PLACEHOLDER.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ONSHAPE_EXPORTER_* prefix
///
/// Environment variables follow the pattern: ONSHAPE_EXPORTER_<SECTION>_<KEY>
/// For example: ONSHAPE_EXPORTER_API_BASE_URL, ONSHAPE_EXPORTER_POLLING_MAX_ATTEMPTS
fn apply_env_overrides(config: &mut ExporterConfig) -> Result<()> {
    // API overrides
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }

    // Polling overrides
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_POLLING_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.polling.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_POLLING_INTERVAL_MS") {
        if let Ok(interval) = val.parse() {
            config.polling.interval_ms = interval;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_EXPORT_DEFAULT_RESOLUTION") {
        config.export.default_resolution = Some(val);
    }
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_EXPORT_STL_PROTOCOL") {
        config.export.stl_protocol = val.parse().map_err(ExporterError::Configuration)?;
    }

    // Credential overrides
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_CREDENTIALS_PATH") {
        config.credentials.path = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ONSHAPE_EXPORTER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
