//! reqwest-backed [`Transport`]

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::{ApiConfig, Credentials};
use crate::domain::{ApiError, ExporterError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// HTTP transport using basic authentication
///
/// Holds two clients because redirect policy is fixed per reqwest client:
/// one follows redirects, the other returns them to the caller.
///
/// # Example
///
/// ```no_run
/// use onshape_exporter::adapters::onshape::ReqwestTransport;
/// use onshape_exporter::config::{ApiConfig, Credentials};
///
/// # fn example() -> onshape_exporter::domain::Result<()> {
/// let credentials = Credentials::new("access", "secret")?;
/// let transport = ReqwestTransport::new(&ApiConfig::default(), credentials)?;
/// # Ok(())
/// # }
/// ```
pub struct ReqwestTransport {
    base_url: Url,
    client: Client,
    no_redirect_client: Client,
    credentials: Credentials,
}

impl ReqwestTransport {
    /// Creates a transport for the configured API host
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or a client cannot be built.
    pub fn new(config: &ApiConfig, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ExporterError::Configuration(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let build = |policy: Policy| {
            ClientBuilder::new()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(30))
                .redirect(policy)
                .build()
                .map_err(|e| {
                    ExporterError::Configuration(format!("Failed to build HTTP client: {e}"))
                })
        };

        Ok(Self {
            base_url,
            client: build(Policy::default())?,
            no_redirect_client: build(Policy::none())?,
            credentials,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn auth_header_value(&self) -> String {
        let secret: &str = self.credentials.secret_key.expose_secret().as_ref();
        let credentials = format!("{}:{}", self.credentials.access_key, secret);
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }

    fn resolve(&self, target: &str) -> Result<Url> {
        self.base_url.join(target).map_err(|e| {
            ExporterError::Api(ApiError::InvalidResponse(format!(
                "Invalid request URL '{target}': {e}"
            )))
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.resolve(&request.url)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            query = ?request.query,
            headers = ?request.headers,
            body = ?request.json,
            "Sending API request"
        );

        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };

        let mut builder = match request.method {
            Method::Get => client.get(url.clone()),
            Method::Post => client.post(url.clone()),
        };
        builder = builder.header("Authorization", self.auth_header_value());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExporterError::Api(ApiError::ConnectionFailed(e.to_string())))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ExporterError::Api(ApiError::ConnectionFailed(e.to_string())))?
            .to_vec();

        tracing::debug!(
            method = %request.method,
            url = %url,
            status = status,
            bytes = body.len(),
            "Received API response"
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
