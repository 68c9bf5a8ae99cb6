//! # CSRF Token Cache
//!
//! One cached token per session manager. The token is fetched lazily the
//! first time a state-changing request needs it and kept until the server
//! rejects it or the session ends. There is no TTL.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use crate::core::error::{ClientError, Result};

const FETCH_FAILED: &str = "Failed to fetch CSRF token";

/// Lazily fetched, process-lifetime CSRF token.
///
/// Concurrent callers that find the cache empty queue behind a single fetch:
/// the async mutex is held for the duration of the fetch, so the second
/// caller sees the token the first one stored.
#[derive(Debug, Default)]
pub struct CsrfTokenCache {
    slot: Mutex<Option<String>>,
    fetches: AtomicUsize,
}

impl CsrfTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token, or run `fetch` and cache its result.
    ///
    /// Any fetch failure, including an empty token, is reported as
    /// [`ClientError::CsrfToken`]; nothing is cached in that case.
    pub async fn token<F, Fut>(&self, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        self.fetches.fetch_add(1, Ordering::SeqCst);
        match fetch().await {
            Ok(token) if !token.trim().is_empty() => {
                tracing::debug!("CSRF token cached");
                *slot = Some(token.clone());
                Ok(token)
            }
            Ok(_) => {
                tracing::warn!("CSRF endpoint returned an empty token");
                Err(ClientError::CsrfToken(FETCH_FAILED.to_string()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "CSRF token fetch failed");
                Err(ClientError::CsrfToken(FETCH_FAILED.to_string()))
            }
        }
    }

    /// Drop the cached token unconditionally.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    /// Drop the cached token only if it is still `stale`.
    ///
    /// A request rejected with an old token must not throw away a newer
    /// token another request already fetched.
    pub async fn invalidate_stale(&self, stale: &str) -> bool {
        let mut slot = self.slot.lock().await;
        if slot.as_deref() == Some(stale) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub async fn cached(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }

    /// How many times the fetch closure has run.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}
