//! Configuration variant resolution
//!
//! Turns either explicit `parameterId=value` overrides or the parameters the
//! service reports into request-ready [`ConfigurationVariant`]s.

use crate::adapters::onshape::{EncodingParameter, OnshapeClient};
use crate::domain::configuration::CUSTOM_VARIANT_NAME;
use crate::domain::{ConfigurationParameter, ConfigurationVariant, ParameterOverride, ParameterValue};

/// Resolves the variants to export for one part studio
pub struct ConfigResolver<'a> {
    client: &'a OnshapeClient,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver backed by the given client
    pub fn new(client: &'a OnshapeClient) -> Self {
        Self { client }
    }

    /// Resolves variants for a run
    ///
    /// With overrides, a single combined variant is produced. When no
    /// override is usable, or encoding them fails, this falls back to
    /// discovery.
    pub async fn resolve(&self, overrides: &[String]) -> Vec<ConfigurationVariant> {
        if overrides.is_empty() {
            return self.discover().await;
        }

        match self.resolve_overrides(overrides).await {
            Some(variant) => vec![variant],
            None => self.discover().await,
        }
    }

    /// Variants for every option of every configuration parameter
    ///
    /// The default variant always comes first. An option whose encoding
    /// fails is skipped. If the parameter list itself cannot be read the
    /// result is empty.
    pub async fn discover(&self) -> Vec<ConfigurationVariant> {
        let configuration = match self.client.get_configuration().await {
            Ok(configuration) => configuration,
            Err(e) => {
                tracing::error!(error = %e, status = ?e.status(), "Failed to get configurations");
                return Vec::new();
            }
        };

        let parameters = configuration.parameters();
        let mut variants = vec![ConfigurationVariant::default_variant()];
        if parameters.is_empty() {
            tracing::debug!("Part studio has no configuration parameters");
            return variants;
        }

        let single_parameter = parameters.len() == 1;
        for parameter in &parameters {
            for option in &parameter.options {
                let display_name = display_name(parameter, &option.option_name, single_parameter);
                if display_name.is_empty() {
                    tracing::debug!(
                        parameter_id = %parameter.parameter_id,
                        "Skipping configuration option without a name"
                    );
                    continue;
                }

                let encoding = EncodingParameter::new(
                    parameter.parameter_id.clone(),
                    ParameterValue::Text(option.option_value.clone()),
                );
                match self.client.encode_configuration(vec![encoding]).await {
                    Ok(encoded_query) => {
                        tracing::debug!(
                            variant = %display_name,
                            query = %encoded_query,
                            "Encoded configuration option"
                        );
                        variants.push(ConfigurationVariant::new(encoded_query, display_name));
                    }
                    Err(e) => {
                        tracing::warn!(
                            option = %option.option_name,
                            status = ?e.status(),
                            error = %e,
                            "Failed to encode configuration option, skipping"
                        );
                    }
                }
            }
        }

        tracing::info!(variants = variants.len(), "Discovered configuration variants");
        variants
    }

    /// One variant for all usable overrides, encoded in a single request
    ///
    /// Returns `None` when there is nothing usable to encode or the encoding
    /// request fails.
    pub async fn resolve_overrides(&self, overrides: &[String]) -> Option<ConfigurationVariant> {
        let parsed = parse_overrides(overrides);
        if parsed.is_empty() {
            tracing::warn!("No valid configuration overrides, falling back to discovered configurations");
            return None;
        }

        let parameters = parsed
            .iter()
            .map(|o| EncodingParameter::new(o.parameter_id.clone(), o.value.clone()))
            .collect();

        match self.client.encode_configuration(parameters).await {
            Ok(encoded_query) => {
                let display_name = override_display_name(&parsed);
                tracing::info!(variant = %display_name, "Using configuration overrides");
                Some(ConfigurationVariant::new(encoded_query, display_name))
            }
            Err(e) => {
                tracing::warn!(
                    status = ?e.status(),
                    error = %e,
                    "Failed to encode configuration overrides, falling back to discovered configurations"
                );
                None
            }
        }
    }
}

/// Parses `-c` values, dropping the ones without `=`
pub fn parse_overrides(values: &[String]) -> Vec<ParameterOverride> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = ParameterOverride::parse(value);
            if parsed.is_none() {
                tracing::warn!(
                    value = %value,
                    "Ignoring invalid configuration override (expected parameterId=value)"
                );
            }
            parsed
        })
        .collect()
}

/// `id=value, id=value`, or `Custom` for an empty list
pub fn override_display_name(overrides: &[ParameterOverride]) -> String {
    if overrides.is_empty() {
        return CUSTOM_VARIANT_NAME.to_string();
    }
    overrides
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_name(
    parameter: &ConfigurationParameter,
    option_name: &str,
    single_parameter: bool,
) -> String {
    if single_parameter {
        option_name.to_string()
    } else {
        format!("{} - {}", parameter.parameter_name, option_name)
    }
}
