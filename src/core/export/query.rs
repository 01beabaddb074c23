//! Configuration strings for export requests
//!
//! Variants carry the encoding endpoint's `queryParam` verbatim (for example
//! `configuration=List_abc%3D_large`). Export requests need just the
//! decoded `configuration` value.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

static CONFIGURATION_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"configuration=([^&]+)").expect("valid configuration regex"));

/// Percent-decoded `configuration` value of an encoded query
///
/// Returns `None` for the default variant or a query without a
/// `configuration` parameter.
///
/// # Examples
///
/// ```
/// use onshape_exporter::core::export::query::extract_configuration;
///
/// assert_eq!(
///     extract_configuration("configuration=List_a%3D_b").as_deref(),
///     Some("List_a=_b")
/// );
/// assert_eq!(extract_configuration(""), None);
/// ```
pub fn extract_configuration(encoded_query: &str) -> Option<String> {
    let raw = CONFIGURATION_PARAM.captures(encoded_query)?.get(1)?.as_str();
    Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

/// Configuration value for a translation job body
///
/// A single `key=value` pair is recomposed as such. Anything else is passed
/// through unchanged with a warning.
pub fn translation_configuration(decoded: &str) -> String {
    let parts: Vec<&str> = decoded.split('=').collect();
    match parts.as_slice() {
        [key, value] => format!("{key}={value}"),
        _ => {
            tracing::warn!(
                configuration = %decoded,
                "Configuration format unexpected, passing it through as-is"
            );
            decoded.to_string()
        }
    }
}
