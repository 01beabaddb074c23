//! Artifact naming
//!
//! Output files are named `<part-studio>[-<variant>][_<n>].<ext>`, with each
//! component slugified, plus a numeric suffix if the run already used that
//! name.

pub mod namer;
pub mod slug;

pub use namer::ArtifactNamer;
pub use slug::slugify;
