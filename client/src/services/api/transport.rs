//! # Transport Trait
//!
//! The seam between the session layer and the network. Production code uses
//! [`ApiClient`](super::ApiClient); tests inject scripted transports so every
//! test gets its own isolated session state.

use async_trait::async_trait;

use super::request::{ApiRequest, ApiResponse};
use crate::core::error::Result;

/// Sends one request and returns the response, whatever its status.
///
/// Implementations never retry and never interpret 4xx/5xx statuses; only a
/// missing response is an error ([`ClientError::Network`] or
/// [`ClientError::Timeout`]).
///
/// [`ClientError::Network`]: crate::core::error::ClientError::Network
/// [`ClientError::Timeout`]: crate::core::error::ClientError::Timeout
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Forget the session cookies (access and refresh token).
    fn clear_session_cookies(&self);
}
