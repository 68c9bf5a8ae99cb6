//! # API Client
//!
//! Reqwest-backed [`HttpTransport`] for backend API communication.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use super::request::{ApiRequest, ApiResponse};
use super::transport::HttpTransport;
use crate::config::ClientConfig;
use crate::core::error::{ClientError, Result};

/// HTTP client for communicating with the backend API server.
///
/// Every request goes to the configured base URL with a JSON content type,
/// the session cookies the backend set, and the configured timeout. The
/// client keeps a connection pool; clearing the session swaps in a fresh
/// client with an empty cookie jar.
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    client: RwLock<Client>,
}

impl ApiClient {
    /// Create a new API client from the configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_base_url(&config.api_url, config.timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Self::build_client(timeout)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: RwLock::new(client),
        })
    }

    fn build_client(timeout: Duration) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))
    }

    /// Get the base URL for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn map_send_error(err: reqwest::Error, request: &ApiRequest) -> ClientError {
    if err.is_timeout() {
        tracing::warn!(request = %request.describe(), error = %err, "Request timed out");
        ClientError::Timeout(format!("Request timed out: {}", request.describe()))
    } else {
        tracing::error!(request = %request.describe(), error = %err, "Network error");
        ClientError::Network(format!("Network error: {}", err))
    }
}

#[async_trait]
impl HttpTransport for ApiClient {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let start = Instant::now();
        // Client is a cheap handle; clone it out so no lock is held across the await
        let client = self.client.read().clone();

        let mut builder = client.request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_send_error(e, request))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_send_error(e, request))?
            .to_vec();

        tracing::debug!(
            request = %request.describe(),
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis(),
            "Response received"
        );

        Ok(ApiResponse::new(status, body))
    }

    fn clear_session_cookies(&self) {
        match Self::build_client(self.timeout) {
            Ok(fresh) => {
                *self.client.write() = fresh;
                tracing::info!("Session cookies cleared");
            }
            Err(e) => tracing::error!(error = %e, "Failed to reset cookie store"),
        }
    }
}
