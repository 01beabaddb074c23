//! Export formats and STL resolution tiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target export format, stored upper-case (`STL`, `STEP`, `IGES`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportFormat(String);

impl ExportFormat {
    /// Creates a format from a user-supplied name
    pub fn new(name: impl AsRef<str>) -> Result<Self, String> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err("Export format cannot be empty".to_string());
        }
        Ok(Self(name.to_uppercase()))
    }

    /// Upper-case name sent to the translation endpoint
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Lower-case file extension
    pub fn extension(&self) -> String {
        self.0.to_lowercase()
    }

    /// STL is the only format with a synchronous export endpoint
    pub fn is_stl(&self) -> bool {
        self.0 == "STL"
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// STL mesh resolution tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Coarse,
    Medium,
    #[default]
    Fine,
    VeryFine,
}

impl Resolution {
    /// Resolves an optional tier name, falling back to `fine`
    ///
    /// An unset value silently means `fine`; an unrecognized one logs a
    /// warning first.
    pub fn resolve(value: Option<&str>) -> Self {
        match value {
            None => Resolution::Fine,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(resolution = %raw, "Invalid STL resolution, defaulting to 'fine'");
                Resolution::Fine
            }),
        }
    }

    /// Name sent to the translation endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Coarse => "coarse",
            Resolution::Medium => "medium",
            Resolution::Fine => "fine",
            Resolution::VeryFine => "veryfine",
        }
    }

    /// Tessellation parameters for the synchronous STL endpoint
    ///
    /// `veryfine` has no entry; the synchronous endpoint only documents
    /// three tiers.
    pub fn tessellation(&self) -> Option<Tessellation> {
        match self {
            Resolution::Coarse => Some(Tessellation {
                chord_tolerance: 0.00024,
                min_facet_width: 0.000635,
            }),
            Resolution::Medium => Some(Tessellation {
                chord_tolerance: 0.00012,
                min_facet_width: 0.000254,
            }),
            Resolution::Fine => Some(Tessellation {
                chord_tolerance: 0.00006,
                min_facet_width: 0.0000254,
            }),
            Resolution::VeryFine => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coarse" => Ok(Resolution::Coarse),
            "medium" => Ok(Resolution::Medium),
            "fine" => Ok(Resolution::Fine),
            "veryfine" => Ok(Resolution::VeryFine),
            other => Err(format!(
                "Invalid resolution '{other}'. Must be one of: coarse, medium, fine, veryfine"
            )),
        }
    }
}

/// Mesh tolerances in meters
// angleTolerance is left out: the endpoint rejects it with 400
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tessellation {
    pub chord_tolerance: f64,
    pub min_facet_width: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_normalization() {
        let format = ExportFormat::new("step").unwrap();
        assert_eq!(format.name(), "STEP");
        assert_eq!(format.extension(), "step");
        assert!(!format.is_stl());
        assert!(ExportFormat::new("Stl").unwrap().is_stl());
        assert!(ExportFormat::new(" ").is_err());
    }

    #[test]
    fn test_resolution_resolve() {
        assert_eq!(Resolution::resolve(None), Resolution::Fine);
        assert_eq!(Resolution::resolve(Some("COARSE")), Resolution::Coarse);
        assert_eq!(Resolution::resolve(Some("bogus")), Resolution::Fine);
        assert_eq!(Resolution::resolve(Some("veryfine")), Resolution::VeryFine);
    }

    #[test]
    fn test_tessellation_table() {
        let fine = Resolution::Fine.tessellation().unwrap();
        assert_eq!(fine.chord_tolerance, 0.00006);
        assert_eq!(fine.min_facet_width, 0.0000254);

        let coarse = Resolution::Coarse.tessellation().unwrap();
        assert!(coarse.chord_tolerance > fine.chord_tolerance);

        assert!(Resolution::VeryFine.tessellation().is_none());
    }
}
