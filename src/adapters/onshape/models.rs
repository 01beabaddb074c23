//! Wire types for the CAD service endpoints
//!
//! These mirror the JSON shapes of the service and convert into domain
//! types where one exists.

use crate::domain::{ConfigurationOption, ConfigurationParameter, ParameterValue};
use serde::{Deserialize, Serialize};

/// Response of the element configuration endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationResponse {
    #[serde(default)]
    pub configuration_parameters: Vec<WireConfigurationParameter>,

    #[serde(default)]
    pub element_name: Option<String>,
}

impl ConfigurationResponse {
    /// Parameters as domain types, in server order
    pub fn parameters(&self) -> Vec<ConfigurationParameter> {
        self.configuration_parameters
            .iter()
            .cloned()
            .map(ConfigurationParameter::from)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfigurationParameter {
    #[serde(default)]
    pub parameter_id: String,

    #[serde(default)]
    pub parameter_name: String,

    /// Only enum parameters carry options
    #[serde(default)]
    pub options: Vec<WireConfigurationOption>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfigurationOption {
    #[serde(default)]
    pub option: String,

    #[serde(default)]
    pub option_name: String,
}

impl From<WireConfigurationParameter> for ConfigurationParameter {
    fn from(wire: WireConfigurationParameter) -> Self {
        Self {
            parameter_id: wire.parameter_id,
            parameter_name: wire.parameter_name,
            options: wire
                .options
                .into_iter()
                .map(|o| ConfigurationOption {
                    option_value: o.option,
                    option_name: o.option_name,
                })
                .collect(),
        }
    }
}

/// Body of the configuration encoding endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EncodingRequest {
    pub parameters: Vec<EncodingParameter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingParameter {
    pub parameter_id: String,
    pub parameter_value: ParameterValue,
}

impl EncodingParameter {
    pub fn new(parameter_id: impl Into<String>, parameter_value: ParameterValue) -> Self {
        Self {
            parameter_id: parameter_id.into(),
            parameter_value,
        }
    }
}

/// Response of the configuration encoding endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingResponse {
    #[serde(default)]
    pub query_param: String,
}

/// Body of the translation creation endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub format_name: String,
    pub store_in_document: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

impl TranslationRequest {
    /// A request that keeps results out of the document
    pub fn new(format_name: impl Into<String>) -> Self {
        Self {
            format_name: format_name.into(),
            store_in_document: false,
            resolution: None,
            configuration: None,
        }
    }
}

/// Translation job as reported by creation and status endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationStatus {
    #[serde(default)]
    pub id: Option<String>,

    pub request_state: String,

    #[serde(default)]
    pub result_external_data_ids: Option<Vec<String>>,

    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Entry of the document elements list
#[derive(Debug, Clone, Deserialize)]
pub struct ElementInfo {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Part studio metadata, reduced to the name
#[derive(Debug, Clone, Deserialize)]
pub struct PartStudioMetadata {
    #[serde(default)]
    pub name: Option<String>,
}
