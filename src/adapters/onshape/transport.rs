//! Uniform request/response contract for the CAD service
//!
//! Everything above this layer talks to the service through [`Transport`],
//! which takes an [`ApiRequest`] and returns an [`ApiResponse`] whatever its
//! status code. Turning statuses into errors is the caller's job.

use crate::domain::{ApiError, ExporterError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// `Accept` value for regular JSON endpoints
pub const JSON_ACCEPT: &str = "application/vnd.onshape.v1+json";

/// `Accept`/`Content-Type` value used by the translation endpoints
pub const TRANSLATION_MEDIA_TYPE: &str = "application/json;charset=UTF-8; qs=0.09";

/// `Accept` value for binary downloads
pub const BINARY_ACCEPT: &str = "application/octet-stream";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request to the CAD service
///
/// `url` is either an API path starting with `/`, resolved against the
/// configured base URL, or an absolute URL such as a redirect target.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
    pub follow_redirects: bool,
}

impl ApiRequest {
    /// A GET request that follows redirects
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            json: None,
            follow_redirects: true,
        }
    }

    /// A POST request with a JSON body
    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            json: Some(serde_json::to_value(body)?),
            follow_redirects: true,
        })
    }

    /// Adds a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Disables redirect following for this request
    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Value of the first query parameter with this name
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A response from the CAD service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Headers, keyed by lower-case name
    pub headers: HashMap<String, String>,

    /// Raw body
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response with no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// A 200 response with a JSON body
    pub fn json_body(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Adds a header, lower-casing its name
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Redirect statuses the mesh endpoint answers with
    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 302 | 303 | 307 | 308)
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ExporterError::Api(ApiError::InvalidResponse(e.to_string())))
    }

    /// First 100 characters of the body, for error messages
    pub fn body_snippet(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let mut snippet: String = text.chars().take(100).collect();
        if text.chars().count() > 100 {
            snippet.push_str("...");
        }
        snippet
    }

    /// Passes success responses through, converts the rest to [`ApiError::Status`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ExporterError::Api(ApiError::Status {
                status: self.status,
                message: self.body_snippet(),
            }))
        }
    }
}

/// Executes requests against the CAD service
///
/// Implementations own authentication. A non-success status is still an
/// `Ok` response; only failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
