//! Configuration variant resolution

pub mod resolver;

pub use resolver::{override_display_name, parse_overrides, ConfigResolver};
