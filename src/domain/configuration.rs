//! Configuration parameters and resolved variants
//!
//! A part studio exposes zero or more [`ConfigurationParameter`]s. Resolving
//! them (or a set of explicit overrides) yields request-ready
//! [`ConfigurationVariant`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of the variant with no configuration applied
pub const DEFAULT_VARIANT_NAME: &str = "Default";

/// Display name used when overrides were requested but none were usable
pub const CUSTOM_VARIANT_NAME: &str = "Custom";

/// One selectable value of a configuration parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationOption {
    /// Value sent to the encoding endpoint
    pub option_value: String,

    /// Human-readable option name
    pub option_name: String,
}

/// A discoverable axis of variation of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationParameter {
    /// Parameter identifier
    pub parameter_id: String,

    /// Human-readable parameter name
    pub parameter_name: String,

    /// Options in server order
    pub options: Vec<ConfigurationOption>,
}

/// A resolved selection of configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationVariant {
    /// Encoded query string, empty for the default configuration
    pub encoded_query: String,

    /// Name used in logs and output filenames
    pub display_name: String,
}

impl ConfigurationVariant {
    /// Creates a variant from an encoded query and display name
    pub fn new(encoded_query: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            encoded_query: encoded_query.into(),
            display_name: display_name.into(),
        }
    }

    /// The variant with no configuration applied
    pub fn default_variant() -> Self {
        Self::new("", DEFAULT_VARIANT_NAME)
    }

    /// True for the implicit default configuration
    pub fn is_default(&self) -> bool {
        self.encoded_query.is_empty() && self.display_name == DEFAULT_VARIANT_NAME
    }
}

impl fmt::Display for ConfigurationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A user-supplied parameter value after literal coercion
///
/// Serializes as the native JSON type so the encoding endpoint receives
/// booleans and numbers rather than strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Coerces a raw command-line value
    ///
    /// `true`/`false` (any case) become booleans. Values without a `.` are
    /// tried as integers, values with one as floats. Numbers may carry
    /// surrounding whitespace and `_` digit separators. Anything that fails
    /// to parse is kept verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use onshape_exporter::domain::ParameterValue;
    ///
    /// assert_eq!(ParameterValue::coerce("TRUE"), ParameterValue::Bool(true));
    /// assert_eq!(ParameterValue::coerce(" 10"), ParameterValue::Integer(10));
    /// assert_eq!(ParameterValue::coerce("2.5"), ParameterValue::Float(2.5));
    /// assert_eq!(ParameterValue::coerce("M6"), ParameterValue::Text("M6".into()));
    /// ```
    pub fn coerce(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "true" => return ParameterValue::Bool(true),
            "false" => return ParameterValue::Bool(false),
            _ => {}
        }

        let parsed = numeric_literal(raw).and_then(|literal| {
            if raw.contains('.') {
                literal.parse::<f64>().ok().map(ParameterValue::Float)
            } else {
                literal.parse::<i64>().ok().map(ParameterValue::Integer)
            }
        });
        parsed.unwrap_or_else(|| ParameterValue::Text(raw.to_string()))
    }
}

/// Trims whitespace and drops `_` separators that sit between two digits
fn numeric_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !trimmed.contains('_') {
        return Some(trimmed.to_string());
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut literal = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if !between_digits {
                return None;
            }
        } else {
            literal.push(c);
        }
    }
    Some(literal)
}

/// Renders a float the way the display names have always shown them
///
/// Shortest round-trip digits. Decimal exponents in `-4..16` print in
/// positional form with at least one fractional digit; the rest print as
/// `<mantissa>e<sign><two or more digits>`, e.g. `1e-05`, `1.5e+19`.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }

    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = unsigned.chars().filter(char::is_ascii_digit).collect();

    let mut positional = String::new();
    if negative {
        positional.push('-');
    }
    if exponent < 0 {
        positional.push_str("0.");
        positional.push_str(&"0".repeat((-exponent - 1) as usize));
        positional.push_str(&digits);
    } else {
        let int_len = exponent as usize + 1;
        if digits.len() > int_len {
            positional.push_str(&digits[..int_len]);
            positional.push('.');
            positional.push_str(&digits[int_len..]);
        } else {
            positional.push_str(&digits);
            positional.push_str(&"0".repeat(int_len - digits.len()));
            positional.push_str(".0");
        }
    }
    positional
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(true) => write!(f, "true"),
            ParameterValue::Bool(false) => write!(f, "false"),
            ParameterValue::Integer(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{}", format_float(*v)),
            ParameterValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// One `parameterId=value` override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverride {
    /// Parameter identifier
    pub parameter_id: String,

    /// Coerced value
    pub value: ParameterValue,
}

impl ParameterOverride {
    /// Parses `parameterId=value`, splitting on the first `=`
    ///
    /// Returns `None` when the input contains no `=`.
    pub fn parse(input: &str) -> Option<Self> {
        let (parameter_id, raw) = input.split_once('=')?;
        Some(Self {
            parameter_id: parameter_id.to_string(),
            value: ParameterValue::coerce(raw),
        })
    }
}

impl fmt::Display for ParameterOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.parameter_id, self.value)
    }
}
