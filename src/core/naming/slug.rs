//! Filesystem-safe slugs

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug regex"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));

/// Converts a display string into a lower-case, hyphenated ASCII slug
///
/// Compatibility-decomposes the input and drops what is not ASCII, removes
/// everything except word characters, whitespace and hyphens, collapses
/// whitespace/hyphen runs into one hyphen and trims `-`/`_` from both ends.
///
/// # Examples
///
/// ```
/// use onshape_exporter::core::naming::slugify;
///
/// assert_eq!(slugify("Bracket (Left) – Rev. B"), "bracket-left-rev-b");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// ```
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = SEPARATOR_RUNS.replace_all(&cleaned, "-");
    hyphenated
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}
