//! # Request and Response Types
//!
//! Transport-neutral request/response values passed between the domain
//! services, the session manager and an [`HttpTransport`](super::HttpTransport).

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::ErrorResponse;

use crate::core::error::{ClientError, Result};

/// Header names the backend accepts for the CSRF token. Both are sent.
pub const CSRF_HEADERS: [&str; 2] = ["X-XSRF-TOKEN", "X-CSRF-TOKEN"];

/// Error code the backend puts in the body when it rejects a CSRF token.
pub const CSRF_REJECTION_CODE: &str = "CSRF_TOKEN_INVALID";

/// An outbound API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/transactions/create`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach the CSRF token headers before sending
    pub csrf: bool,
    /// One-shot flag: set once this request has been replayed after auth recovery
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            csrf: false,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Mark the request as state-changing: CSRF headers are attached before sending.
    pub fn with_csrf(mut self) -> Self {
        self.csrf = true;
        self
    }

    /// Insert or replace a header (names compare case-insensitively).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set both CSRF headers to `token`.
    pub fn attach_csrf_token(&mut self, token: &str) {
        for header in CSRF_HEADERS {
            self.set_header(header, token);
        }
    }

    /// The CSRF token this request carries, if any.
    pub fn csrf_token(&self) -> Option<&str> {
        CSRF_HEADERS.iter().find_map(|h| self.header_value(h))
    }

    /// POST/PUT/PATCH/DELETE
    pub fn is_mutation(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }

    /// Login and refresh failures must never start a session refresh.
    pub fn is_session_endpoint(&self) -> bool {
        let path = self.path.split('?').next().unwrap_or_default();
        path.ends_with("/auth/login")
            || path.ends_with("/auth/refresh")
            || path.ends_with("/auth/refresh-token")
    }

    /// `METHOD /path`, for logs.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A response with its body already read.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Build a response from a JSON value. Mostly useful for test transports.
    pub fn from_json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string().into_bytes())
    }

    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Vec::new())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 401 or 403: candidates for transparent auth recovery
    pub fn is_auth_failure(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }

    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Structured error body, if the server sent one.
    pub fn error_body(&self) -> Option<ErrorResponse> {
        serde_json::from_slice::<ErrorResponse>(&self.body).ok()
    }

    /// The server-supplied error message (`message` or `error` field).
    pub fn error_message(&self) -> Option<String> {
        self.error_body()
            .and_then(|body| body.text().map(str::to_string))
    }

    /// A 403 the server explicitly attributes to the CSRF token.
    pub fn is_csrf_rejection(&self) -> bool {
        if self.status != StatusCode::FORBIDDEN {
            return false;
        }
        match self.error_body() {
            Some(body) => {
                body.code.as_deref() == Some(CSRF_REJECTION_CODE)
                    || body
                        .text()
                        .map(|t| t.to_ascii_lowercase().contains("csrf"))
                        .unwrap_or(false)
            }
            None => false,
        }
    }

    /// Turn a non-success response into a categorized error; pass success through.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status, self.error_message()))
        }
    }
}
