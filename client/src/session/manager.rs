//! # Session Manager
//!
//! Wraps an [`HttpTransport`] with the session rules every API call shares:
//! CSRF headers on state-changing requests, transparent access-token refresh
//! on 401/403 with a single replay, and session teardown when the refresh
//! fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::json;
use shared::CsrfTokenResponse;
use tracing::Instrument;
use uuid::Uuid;

use super::csrf::CsrfTokenCache;
use super::refresh::RefreshCoordinator;
use crate::core::error::{ClientError, Result};
use crate::services::api::{ApiRequest, ApiResponse, HttpTransport};

pub const REFRESH_PATH: &str = "/auth/refresh";
pub const CSRF_PATH: &str = "/auth/csrf-token";
/// Where the UI goes after the session could not be refreshed.
pub const LOGIN_EXPIRED_ROUTE: &str = "/login?expired=true";

/// Minimum gap between a failed refresh and the next attempt.
const REFRESH_COOLDOWN: Duration = Duration::from_secs(5);

/// Notifications for the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The refresh token was rejected; the user has to log in again.
    Expired { redirect: String },
}

pub struct SessionManager {
    transport: Arc<dyn HttpTransport>,
    csrf: CsrfTokenCache,
    refresh: RefreshCoordinator,
    events_tx: async_channel::Sender<SessionEvent>,
    events_rx: async_channel::Receiver<SessionEvent>,
    last_failed_refresh: Mutex<Option<Instant>>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let (events_tx, events_rx) = async_channel::unbounded();
        Self {
            transport,
            csrf: CsrfTokenCache::new(),
            refresh: RefreshCoordinator::new(),
            events_tx,
            events_rx,
            last_failed_refresh: Mutex::new(None),
        }
    }

    /// Receiver for [`SessionEvent`]s. Clones share one queue.
    pub fn events(&self) -> async_channel::Receiver<SessionEvent> {
        self.events_rx.clone()
    }

    /// The raw transport, for calls that must bypass recovery.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    pub fn csrf_cache(&self) -> &CsrfTokenCache {
        &self.csrf
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// Send a request with CSRF attachment and auth recovery.
    ///
    /// Any response other than 401/403 is returned as-is; callers decide what
    /// a 4xx/5xx means for their operation.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let span = tracing::info_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            request = %request.describe()
        );

        async move {
            if request.csrf {
                self.attach_csrf(&mut request).await?;
            }

            let response = self.transport.send(&request).await?;
            if !response.is_auth_failure() {
                return Ok(response);
            }
            self.recover(request, response).await
        }
        .instrument(span)
        .await
    }

    async fn attach_csrf(&self, request: &mut ApiRequest) -> Result<()> {
        let token = self.csrf_token_or_refresh().await?;
        request.attach_csrf_token(&token);
        Ok(())
    }

    /// A CSRF token, refreshing the session once if the fetch is refused.
    async fn csrf_token_or_refresh(&self) -> Result<String> {
        match self.csrf_token().await {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::warn!(error = %e, "CSRF token unavailable, refreshing session first");
                self.refresh_session().await?;
                self.csrf_token().await
            }
        }
    }

    async fn recover(&self, mut request: ApiRequest, response: ApiResponse) -> Result<ApiResponse> {
        if request.retried {
            tracing::warn!(status = response.status.as_u16(), "Replayed request rejected again");
            return Err(ClientError::SessionExpired);
        }
        if request.is_session_endpoint() {
            return Ok(response);
        }
        request.retried = true;

        // A mutation sent without any token is refused for that reason alone
        let csrf_rejected = response.is_csrf_rejection()
            || (response.status == reqwest::StatusCode::FORBIDDEN
                && request.is_mutation()
                && request.csrf_token().is_none());
        if csrf_rejected {
            return self.replay_with_fresh_csrf(request).await;
        }

        tracing::info!(status = response.status.as_u16(), "Access token rejected, refreshing session");
        self.refresh_session().await?;

        let replay = self.transport.send(&request).await?;
        if replay.is_auth_failure() {
            tracing::warn!(status = replay.status.as_u16(), "Replay after refresh rejected");
            return Err(ClientError::SessionExpired);
        }
        Ok(replay)
    }

    /// The stale token is dropped, a fresh one fetched, and the request sent
    /// once more. Whatever that replay returns goes back to the caller.
    async fn replay_with_fresh_csrf(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        tracing::info!("CSRF token rejected, fetching a fresh one");
        match request.csrf_token() {
            Some(stale) => {
                let stale = stale.to_string();
                self.csrf.invalidate_stale(&stale).await;
            }
            None => self.csrf.invalidate().await,
        }

        let token = self.csrf_token_or_refresh().await?;
        request.attach_csrf_token(&token);
        self.transport.send(&request).await
    }

    /// The cached CSRF token, fetched from the backend on first use.
    pub async fn csrf_token(&self) -> Result<String> {
        self.csrf
            .token(|| async {
                let response = self
                    .transport
                    .send(&ApiRequest::get(CSRF_PATH))
                    .await?
                    .error_for_status()?;
                Ok::<_, ClientError>(response.json::<CsrfTokenResponse>()?.token)
            })
            .await
    }

    /// Refresh the access token, joining a refresh already in flight.
    ///
    /// Fails with [`ClientError::SessionExpired`] when the backend rejects
    /// the refresh token, and without a network call while a previous
    /// failure is younger than the cool-down.
    pub async fn refresh_session(&self) -> Result<()> {
        self.refresh.refresh_or_join(|| self.perform_refresh()).await
    }

    async fn perform_refresh(&self) -> Result<()> {
        if let Some(failed_at) = *self.last_failed_refresh.lock() {
            if failed_at.elapsed() < REFRESH_COOLDOWN {
                tracing::debug!("Skipping refresh during cool-down");
                return Err(ClientError::SessionExpired);
            }
        }

        match self.call_refresh().await {
            Ok(()) => {
                *self.last_failed_refresh.lock() = None;
                tracing::info!("Session refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed");
                *self.last_failed_refresh.lock() = Some(Instant::now());
                self.expire_session().await;
                Err(ClientError::SessionExpired)
            }
        }
    }

    async fn call_refresh(&self) -> Result<()> {
        let request = ApiRequest::post(REFRESH_PATH).json(&json!({}))?;
        let response = self.transport.send(&request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ClientError::Authentication("Token refresh failed".to_string()))
        }
    }

    async fn expire_session(&self) {
        self.transport.clear_session_cookies();
        self.csrf.invalidate().await;
        let event = SessionEvent::Expired {
            redirect: LOGIN_EXPIRED_ROUTE.to_string(),
        };
        if self.events_tx.send(event).await.is_err() {
            tracing::debug!("No listener for session events");
        }
    }

    /// Reset per-session state after a successful login.
    pub async fn begin_session(&self) {
        *self.last_failed_refresh.lock() = None;
        self.csrf.invalidate().await;
    }

    /// Drop local session state after logout.
    pub async fn end_session(&self) {
        self.csrf.invalidate().await;
        self.transport.clear_session_cookies();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockReply, MockTransport};

    fn manager(transport: &Arc<MockTransport>) -> SessionManager {
        SessionManager::new(transport.clone())
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.method.as_str(), request.path.as_str()) {
                ("GET", "/transactions") if previous < 2 => MockReply::status(401),
                ("GET", "/transactions") => MockReply::json(200, json!([])),
                ("POST", REFRESH_PATH) => {
                    MockReply::status(200).delayed(Duration::from_millis(100))
                }
                _ => MockReply::status(404),
            }
        }));
        let session = manager(&transport);

        let (a, b) = tokio::join!(
            session.execute(ApiRequest::get("/transactions")),
            session.execute(ApiRequest::get("/transactions")),
        );

        assert!(a.unwrap().is_success());
        assert!(b.unwrap().is_success());
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(transport.count("GET", "/transactions"), 4);

        // Both replays start only after the refresh has completed
        let log = transport.log();
        let refresh_end = log
            .iter()
            .position(|c| *c == Call::End(format!("POST {}", REFRESH_PATH)))
            .expect("refresh should finish");
        let replay_starts: Vec<usize> = log
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Start(r) if r.path == "/transactions" && r.retried))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(replay_starts.len(), 2);
        assert!(replay_starts.iter().all(|&i| i > refresh_end));
    }

    #[tokio::test]
    async fn test_failed_refresh_expires_session_once() {
        let transport = Arc::new(MockTransport::new(|request, _| {
            match request.path.as_str() {
                REFRESH_PATH => MockReply::status(401).delayed(Duration::from_millis(30)),
                _ => MockReply::status(401),
            }
        }));
        let session = manager(&transport);
        let events = session.events();

        let (a, b) = tokio::join!(
            session.execute(ApiRequest::get("/auth/me")),
            session.execute(ApiRequest::get("/transactions")),
        );

        assert_eq!(a.unwrap_err(), ClientError::SessionExpired);
        assert_eq!(b.unwrap_err(), ClientError::SessionExpired);
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(transport.cookies_cleared(), 1);
        assert_eq!(
            events.try_recv(),
            Ok(SessionEvent::Expired {
                redirect: "/login?expired=true".to_string()
            })
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_replay_rejected_again_is_terminal() {
        let transport = Arc::new(MockTransport::new(|request, _| {
            match request.path.as_str() {
                REFRESH_PATH => MockReply::status(200),
                _ => MockReply::status(401),
            }
        }));
        let session = manager(&transport);

        let err = session
            .execute(ApiRequest::get("/transactions"))
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::SessionExpired);
        assert_eq!(transport.count("GET", "/transactions"), 2);
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
    }

    #[tokio::test]
    async fn test_login_failure_skips_refresh() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            MockReply::json(401, json!({"message": "Bad credentials"}))
        }));
        let session = manager(&transport);

        let response = session
            .execute(ApiRequest::post("/auth/login"))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 401);
        assert_eq!(transport.count("POST", REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn test_non_auth_errors_pass_through() {
        let transport = Arc::new(MockTransport::new(|_, _| MockReply::status(500)));
        let session = manager(&transport);

        let response = session
            .execute(ApiRequest::get("/transactions"))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 500);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_csrf_token_fetched_once() {
        let transport = Arc::new(MockTransport::new(|request, _| {
            match request.path.as_str() {
                CSRF_PATH => MockReply::json(200, json!({"token": "tok"})),
                _ => MockReply::json(201, json!({})),
            }
        }));
        let session = manager(&transport);

        for _ in 0..3 {
            session
                .execute(ApiRequest::post("/transactions/create").with_csrf())
                .await
                .unwrap();
        }

        assert_eq!(transport.count("GET", CSRF_PATH), 1);
        let creates: Vec<ApiRequest> = transport
            .requests()
            .into_iter()
            .filter(|r| r.path == "/transactions/create")
            .collect();
        assert_eq!(creates.len(), 3);
        for request in creates {
            assert_eq!(request.header_value("X-XSRF-TOKEN"), Some("tok"));
            assert_eq!(request.header_value("X-CSRF-TOKEN"), Some("tok"));
        }
    }

    #[tokio::test]
    async fn test_csrf_rejection_refetches_and_retries() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.path.as_str(), previous) {
                (CSRF_PATH, 0) => MockReply::json(200, json!({"token": "old"})),
                (CSRF_PATH, _) => MockReply::json(200, json!({"token": "new"})),
                ("/transactions/create", 0) => {
                    MockReply::json(403, json!({"code": "CSRF_TOKEN_INVALID"}))
                }
                _ => MockReply::json(201, json!({"id": "1"})),
            }
        }));
        let session = manager(&transport);

        let response = session
            .execute(ApiRequest::post("/transactions/create").with_csrf())
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 201);
        assert_eq!(transport.count("GET", CSRF_PATH), 2);
        assert_eq!(transport.count("POST", REFRESH_PATH), 0);
        let last = transport.requests().pop().unwrap();
        assert_eq!(last.csrf_token(), Some("new"));
        assert_eq!(session.csrf_cache().cached().await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_tokenless_mutation_403_fetches_csrf_once() {
        let transport = Arc::new(MockTransport::new(|request, _| {
            match (request.path.as_str(), request.csrf_token()) {
                (CSRF_PATH, _) => MockReply::json(200, json!({"token": "tok"})),
                (_, None) => MockReply::json(403, json!({"message": "Forbidden"})),
                (_, Some(_)) => MockReply::json(200, json!({"ok": true})),
            }
        }));
        let session = manager(&transport);

        let response = session
            .execute(ApiRequest::post("/gmail/sync"))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(transport.count("GET", CSRF_PATH), 1);
        assert_eq!(transport.count("POST", "/gmail/sync"), 2);
        assert_eq!(transport.count("POST", REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn test_csrf_refetch_after_rejection_refreshes_expired_session() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.path.as_str(), previous) {
                (CSRF_PATH, 0) => MockReply::json(200, json!({"token": "old"})),
                (CSRF_PATH, 1) => MockReply::status(401),
                (CSRF_PATH, _) => MockReply::json(200, json!({"token": "new"})),
                (REFRESH_PATH, _) => MockReply::status(200),
                ("/transactions/create", 0) => {
                    MockReply::json(403, json!({"code": "CSRF_TOKEN_INVALID"}))
                }
                _ => MockReply::json(201, json!({"id": "1"})),
            }
        }));
        let session = manager(&transport);
        let events = session.events();

        let response = session
            .execute(ApiRequest::post("/transactions/create").with_csrf())
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 201);
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(transport.count("GET", CSRF_PATH), 3);
        let last = transport.requests().pop().unwrap();
        assert_eq!(last.csrf_token(), Some("new"));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_csrf_refetch_with_dead_session_expires_it() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.path.as_str(), previous) {
                (CSRF_PATH, 0) => MockReply::json(200, json!({"token": "old"})),
                (CSRF_PATH, _) => MockReply::status(401),
                (REFRESH_PATH, _) => MockReply::status(401),
                _ => MockReply::json(403, json!({"code": "CSRF_TOKEN_INVALID"})),
            }
        }));
        let session = manager(&transport);
        let events = session.events();

        let err = session
            .execute(ApiRequest::post("/transactions/create").with_csrf())
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::SessionExpired);
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(transport.count("POST", "/transactions/create"), 1);
        assert_eq!(transport.cookies_cleared(), 1);
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_tokenless_read_403_refreshes_instead_of_csrf() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.path.as_str(), previous) {
                ("/auth/me", 0) => MockReply::json(403, json!({"message": "Forbidden"})),
                ("/auth/me", _) => MockReply::json(200, json!({"user": {}})),
                (REFRESH_PATH, _) => MockReply::status(200),
                _ => MockReply::json(200, json!({"token": "tok"})),
            }
        }));
        let session = manager(&transport);

        let response = session
            .execute(ApiRequest::get("/auth/me"))
            .await
            .unwrap();

        // Reads carry no CSRF token, so a plain 403 is an auth failure
        assert!(response.is_success());
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(transport.count("GET", CSRF_PATH), 0);
        assert_eq!(transport.count("GET", "/auth/me"), 2);
    }

    #[tokio::test]
    async fn test_aborted_refresh_leader_does_not_fail_waiting_mutation() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.method.as_str(), request.path.as_str()) {
                ("POST", REFRESH_PATH) => {
                    MockReply::status(200).delayed(Duration::from_millis(200))
                }
                ("POST", "/transactions/create") if previous == 0 => MockReply::status(401),
                ("POST", "/transactions/create") => MockReply::json(201, json!({"id": "t1"})),
                _ => MockReply::status(401),
            }
        }));
        let session = Arc::new(manager(&transport));

        let list = {
            let session = session.clone();
            tokio::spawn(async move { session.execute(ApiRequest::get("/transactions")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.coordinator().is_refreshing());

        let create = {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .execute(ApiRequest::post("/transactions/create"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Navigating away aborts the list fetch that leads the refresh
        list.abort();
        let response = create
            .await
            .expect("create task should finish")
            .expect("create should survive the aborted refresh");

        assert_eq!(response.status.as_u16(), 201);
        assert_eq!(transport.count("POST", REFRESH_PATH), 2);
        assert!(!session.coordinator().is_refreshing());
    }

    #[tokio::test]
    async fn test_csrf_fetch_failure_refreshes_then_retries_fetch() {
        let transport = Arc::new(MockTransport::new(|request, previous| {
            match (request.path.as_str(), previous) {
                (CSRF_PATH, 0) => MockReply::status(401),
                (CSRF_PATH, _) => MockReply::json(200, json!({"token": "tok"})),
                (REFRESH_PATH, _) => MockReply::status(200),
                _ => MockReply::status(204),
            }
        }));
        let session = manager(&transport);

        let response = session
            .execute(ApiRequest::delete("/transactions/7").with_csrf())
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 204);
        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(transport.count("GET", CSRF_PATH), 2);
    }

    #[tokio::test]
    async fn test_refresh_cooldown_after_failure() {
        let transport = Arc::new(MockTransport::new(|_, _| MockReply::status(401)));
        let session = manager(&transport);
        let events = session.events();

        assert_eq!(session.refresh_session().await, Err(ClientError::SessionExpired));
        assert_eq!(session.refresh_session().await, Err(ClientError::SessionExpired));

        assert_eq!(transport.count("POST", REFRESH_PATH), 1);
        assert_eq!(events.len(), 1);

        session.begin_session().await;
        assert_eq!(session.refresh_session().await, Err(ClientError::SessionExpired));
        assert_eq!(transport.count("POST", REFRESH_PATH), 2);
    }

    #[tokio::test]
    async fn test_network_failure_is_not_recovered() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            MockReply::error(ClientError::Network("connection refused".to_string()))
        }));
        let session = manager(&transport);

        let err = session
            .execute(ApiRequest::get("/transactions"))
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert_eq!(transport.count("POST", REFRESH_PATH), 0);
    }
}
