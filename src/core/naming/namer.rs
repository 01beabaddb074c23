//! Output filenames for downloaded artifacts

use super::slug::slugify;
use crate::domain::configuration::DEFAULT_VARIANT_NAME;
use crate::domain::Artifact;
use std::collections::HashSet;

/// Stem used when every name component slugifies to nothing
const EMPTY_NAME_FALLBACK: &str = "export";

/// Derives filenames and remembers which ones this run already emitted
///
/// # Examples
///
/// ```
/// use onshape_exporter::core::naming::ArtifactNamer;
/// use onshape_exporter::domain::{Artifact, ExportFormat};
///
/// let base = ArtifactNamer::base_name(Some("Bracket"), "Size - Large");
/// assert_eq!(base, "bracket-size-large");
///
/// let mut namer = ArtifactNamer::new();
/// let step = ExportFormat::new("STEP").unwrap();
/// let artifact = Artifact::single(Vec::new(), base, &step);
/// assert_eq!(namer.file_name(&artifact), "bracket-size-large.step");
/// ```
#[derive(Debug, Default)]
pub struct ArtifactNamer {
    emitted: HashSet<String>,
}

impl ArtifactNamer {
    /// Creates a namer with no names emitted
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugified stem from the part studio and variant names
    ///
    /// With a part studio name, the variant is appended unless it is the
    /// default configuration. Without one, the variant name is used alone.
    pub fn base_name(part_studio_name: Option<&str>, variant_display_name: &str) -> String {
        let mut components = Vec::new();
        match part_studio_name.filter(|name| !name.is_empty()) {
            Some(part_studio) => {
                components.push(part_studio);
                if !variant_display_name.is_empty() && variant_display_name != DEFAULT_VARIANT_NAME
                {
                    components.push(variant_display_name);
                }
            }
            None => components.push(variant_display_name),
        }

        let slugs: Vec<String> = components
            .into_iter()
            .map(slugify)
            .filter(|slug| !slug.is_empty())
            .collect();

        if slugs.is_empty() {
            EMPTY_NAME_FALLBACK.to_string()
        } else {
            slugs.join("-")
        }
    }

    /// Filename for an artifact, unique within this run
    ///
    /// Multi-result jobs get a 1-based `_<n>` suffix. A name that was already
    /// emitted gets `-2`, `-3`, ... appended to its stem.
    pub fn file_name(&mut self, artifact: &Artifact) -> String {
        let stem = if artifact.job_size > 1 {
            format!(
                "{}_{}",
                artifact.suggested_base_name,
                artifact.index_within_job + 1
            )
        } else {
            artifact.suggested_base_name.clone()
        };

        let mut candidate = format!("{stem}.{}", artifact.format_extension);
        let mut counter = 2;
        while self.emitted.contains(&candidate) {
            candidate = format!("{stem}-{counter}.{}", artifact.format_extension);
            counter += 1;
        }

        if counter > 2 {
            tracing::warn!(
                file_name = %candidate,
                "Output name already used in this run, added a numeric suffix"
            );
        }

        self.emitted.insert(candidate.clone());
        candidate
    }

    /// Number of names emitted so far
    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }
}
