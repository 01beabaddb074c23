//! Synchronous STL export
//!
//! STL has a dedicated mesh endpoint that takes tessellation tolerances
//! directly and answers with (a redirect to) the file, so no translation
//! job is involved.

use crate::adapters::onshape::OnshapeClient;
use crate::domain::{ExporterError, Resolution, Result};

/// Exports one STL mesh through the synchronous endpoint
///
/// `configuration` is the decoded configuration value, if any.
///
/// # Errors
///
/// [`ExporterError::Validation`] for a tier without tessellation
/// parameters (`veryfine`); otherwise whatever the endpoint returns.
pub async fn export_stl_sync(
    client: &OnshapeClient,
    resolution: Resolution,
    configuration: Option<&str>,
) -> Result<Vec<u8>> {
    let tessellation = resolution.tessellation().ok_or_else(|| {
        ExporterError::Validation(format!(
            "Resolution '{resolution}' is not supported by the synchronous STL export; \
             use coarse, medium or fine, or set export.stl_protocol = \"async\""
        ))
    })?;

    tracing::debug!(
        resolution = %resolution,
        chord_tolerance = tessellation.chord_tolerance,
        min_facet_width = tessellation.min_facet_width,
        "Requesting synchronous STL export"
    );

    client.export_stl(tessellation, configuration).await
}
