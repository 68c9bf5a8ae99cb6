//! Scripted in-memory transport for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::core::error::{ClientError, Result};
use crate::services::api::{ApiRequest, ApiResponse, HttpTransport};

/// What the mock answers for one request.
pub struct MockReply {
    pub result: Result<ApiResponse>,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn status(code: u16) -> Self {
        Self {
            result: Ok(ApiResponse::empty(status(code))),
            delay: None,
        }
    }

    pub fn json(code: u16, value: serde_json::Value) -> Self {
        Self {
            result: Ok(ApiResponse::from_json(status(code), &value)),
            delay: None,
        }
    }

    pub fn error(err: ClientError) -> Self {
        Self {
            result: Err(err),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).expect("valid status code in test")
}

/// Start/end markers, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start(ApiRequest),
    End(String),
}

type Handler = dyn Fn(&ApiRequest, usize) -> MockReply + Send + Sync;

/// Transport driven by a closure. The closure receives the request and how
/// many earlier calls were made to the same `METHOD /path`.
pub struct MockTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<Call>>,
    cleared: AtomicUsize,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&ApiRequest, usize) -> MockReply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
            cleared: AtomicUsize::new(0),
        }
    }

    /// Every request sent, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Start(r) => Some(r.clone()),
                Call::End(_) => None,
            })
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method.as_str() == method && r.path == path)
            .count()
    }

    pub fn log(&self) -> Vec<Call> {
        self.log.lock().clone()
    }

    pub fn cookies_cleared(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let previous = self.count(request.method.as_str(), &request.path);
        self.log.lock().push(Call::Start(request.clone()));

        let reply = (self.handler)(request, previous);
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        self.log.lock().push(Call::End(request.describe()));
        reply.result
    }

    fn clear_session_cookies(&self) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}
