//! External system integrations.
//!
//! - [`onshape`] - Onshape REST API integration
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind the
//! [`onshape::Transport`] trait, so the export core is unit tested against a
//! scripted in-memory transport instead of a live service.
//!
//! ```rust,no_run
//! use onshape_exporter::adapters::onshape::{OnshapeClient, ReqwestTransport};
//! use onshape_exporter::config::{ApiConfig, Credentials};
//! use onshape_exporter::domain::DocumentReference;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("access", "secret")?;
//! let transport = ReqwestTransport::new(&ApiConfig::default(), credentials)?;
//! let reference = DocumentReference::from_url(
//!     "https://cad.onshape.com/documents/abc/w/def/e/ghi",
//! )?;
//!
//! let client = OnshapeClient::new(Arc::new(transport), reference);
//! println!("Part studio: {}", client.part_studio_name().await);
//! # Ok(())
//! # }
//! ```

pub mod onshape;
