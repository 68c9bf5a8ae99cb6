//! # Common Error Types
//!
//! Consolidated error handling for the finance client.
//!
//! Every failure a caller can see is a [`ClientError`]. The categories mirror
//! what the UI needs to decide how to react:
//!
//! - **Network / Timeout**: no response from the backend
//! - **Authentication**: 401/403 that could not be recovered transparently
//! - **SessionExpired**: the session refresh failed; the user must log in again
//! - **Validation / NotFound / RateLimited / Http**: the backend answered with an error status
//! - **CsrfToken**: the CSRF token endpoint failed
//! - **Decode**: the backend answered with a body of an unexpected shape
//! - **Cancelled**: the request was aborted by its owner
//! - **Config / Storage**: local configuration or preference file problems
//!
//! Categorized variants carry a message that is shown to the user verbatim.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use finance_client::core::error::ClientError;
//! use reqwest::StatusCode;
//!
//! let err = ClientError::from_status(StatusCode::NOT_FOUND, None);
//! assert!(matches!(err, ClientError::NotFound(_)));
//! assert_eq!(err.status(), Some(404));
//! ```

use reqwest::StatusCode;
use thiserror::Error;

/// Client-wide error type.
///
/// `Clone` so one refresh outcome can be handed to every queued request,
/// and so results can travel inside `AppEvent`s.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// No response: connection refused, DNS failure, reset.
    #[error("{0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("{0}")]
    Timeout(String),

    /// 401/403 that was not recovered by the session refresh.
    #[error("{0}")]
    Authentication(String),

    /// The session could not be refreshed. Terminal until the user logs in again.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// 4xx rejection with the server-supplied (or a default) message.
    #[error("{0}")]
    Validation(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 429
    #[error("{0}")]
    RateLimited(String),

    /// Any other non-success status (mostly 5xx).
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The CSRF token could not be obtained.
    #[error("{0}")]
    CsrfToken(String),

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request was aborted before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid local configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Categorize a non-success HTTP status.
    ///
    /// `message` is the server-supplied text if there was one; otherwise a
    /// default message for the category is used.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty());
        match status.as_u16() {
            401 => ClientError::Authentication(
                message.unwrap_or_else(|| "Please log in again".to_string()),
            ),
            403 => ClientError::Authentication(
                message.unwrap_or_else(|| "Access denied".to_string()),
            ),
            404 => ClientError::NotFound(
                message.unwrap_or_else(|| "Resource not found".to_string()),
            ),
            429 => ClientError::RateLimited(
                message.unwrap_or_else(|| "Too many requests. Please try again later".to_string()),
            ),
            code @ 400..=499 => ClientError::Validation(
                message.unwrap_or_else(|| format!("Request rejected with status {}", code)),
            ),
            code => ClientError::Http {
                status: code,
                message: message.unwrap_or_else(|| format!("Request failed with status {}", code)),
            },
        }
    }

    /// The HTTP status this error was derived from, when it is implied by the category.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound(_) => Some(404),
            ClientError::RateLimited(_) => Some(429),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout(_))
    }

    /// True for failures that mean "log in again".
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::SessionExpired | ClientError::Authentication(_)
        )
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, None),
            ClientError::Authentication(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, None),
            ClientError::Authentication(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::TOO_MANY_REQUESTS, None),
            ClientError::RateLimited(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, None),
            ClientError::Validation(_)
        ));
        assert_eq!(
            ClientError::from_status(StatusCode::BAD_GATEWAY, None).status(),
            Some(502)
        );
    }

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            Some("Amount must be positive".to_string()),
        );
        assert_eq!(err.to_string(), "Amount must be positive");

        // Blank server messages fall back to the category default
        let err = ClientError::from_status(StatusCode::NOT_FOUND, Some("  ".to_string()));
        assert_eq!(err.to_string(), "Resource not found");
    }

    #[test]
    fn test_session_expired_message() {
        assert_eq!(
            ClientError::SessionExpired.to_string(),
            "Session expired. Please login again."
        );
        assert!(ClientError::SessionExpired.requires_login());
        assert!(ClientError::Timeout("slow".into()).is_network());
    }
}
