//! Onshape adapter implementation
//!
//! This module provides the integration with the Onshape REST API: the
//! [`Transport`] contract, its reqwest implementation, wire models and a
//! typed client bound to one part studio.

pub mod client;
pub mod http;
pub mod models;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use client::{OnshapeClient, FALLBACK_PART_STUDIO_NAME};
pub use http::ReqwestTransport;
pub use models::{EncodingParameter, TranslationRequest, TranslationStatus};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
