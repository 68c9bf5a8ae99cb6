//! # Application Orchestrator
//!
//! The [`App`] struct wires user intents to the domain services and applies
//! their results to the state store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Caller (CLI / UI loop)                   │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │  App (orchestrator)                                  │   │
//! │  │  - login() / create_transaction() / navigate() ...   │   │
//! │  │  - process_events() - applies async results          │   │
//! │  └────────────┬─────────────────────────────────────────┘   │
//! │               │                                             │
//! │  ┌────────────▼─────────────────────────────────────────┐   │
//! │  │  State: Arc<RwLock<AppState>>                        │   │
//! │  │  - view, session, theme, language, transactions      │   │
//! │  │  - inline errors per form                            │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! └───────────────────────┬─────────────────────────────────────┘
//!                         │ async_channel (unbounded)
//! ┌───────────────────────▼─────────────────────────────────────┐
//! │              Async Tasks (Tokio, abortable)                 │
//! │  AuthApi · TransactionApi · GmailApi · EmailEvaluationApi   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Event-Driven Communication
//!
//! Intents spawn a task and return a [`RequestHandle`] immediately. The task
//! sends an [`AppEvent`] back when the service call completes; the caller
//! applies pending events with [`App::process_events`] (or waits for all of
//! them with [`App::settle`]).
//!
//! Read requests are owned by the view that started them and are cancelled
//! when the user navigates away, so a late response never lands on a page
//! that is no longer shown. Mutations and auth requests always complete.
//!
//! ## Session Expiry
//!
//! When the session manager gives up on refreshing, the app logs out locally
//! and moves to the login view with the "expired" notice.
//!
//! ```rust,no_run
//! # async fn run() -> finance_client::core::Result<()> {
//! use finance_client::app::App;
//! use finance_client::config::ClientConfig;
//!
//! let mut app = App::from_config(&ClientConfig::from_env()?)?;
//! app.bootstrap();
//! app.login("asha@example.com", "secret", false);
//! app.settle().await;
//!
//! let state = app.state.read();
//! println!("{} -> {}", state.session.is_authenticated, state.view.route());
//! # Ok(())
//! # }
//! ```

mod events;
mod handlers;
mod state;
mod tasks;

pub use events::AppEvent;
pub use state::{AppState, EvaluationMode, Form, GmailState, View};
pub use tasks::RequestHandle;

use std::future::Future;
use std::sync::Arc;

use async_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;

use crate::config::ClientConfig;
use crate::core::error::Result;
use crate::core::service::{AuthApi, EmailEvaluationApi, GmailApi, TransactionApi};
use crate::services::{
    ApiClient, EmailTransactionService, GmailService, TransactionService, UserService,
};
use crate::session::{SessionEvent, SessionManager};
use crate::store::{
    FilePreferenceStore, LanguageState, PreferenceStore, Preferences, ThemeState,
};
use tasks::Requests;

/// The service seams the app talks to.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthApi>,
    pub transactions: Arc<dyn TransactionApi>,
    pub gmail: Arc<dyn GmailApi>,
    pub email: Arc<dyn EmailEvaluationApi>,
}

impl Services {
    /// Production services sharing one session manager.
    pub fn connect(session: Arc<SessionManager>) -> Self {
        Self {
            auth: Arc::new(UserService::new(session.clone())),
            transactions: Arc::new(TransactionService::new(session.clone())),
            gmail: Arc::new(GmailService::new(session.clone())),
            email: Arc::new(EmailTransactionService::new(session)),
        }
    }
}

/// Application orchestrator.
pub struct App {
    /// Shared application state. Hold locks briefly.
    pub state: Arc<RwLock<AppState>>,

    /// Results of background requests, applied by [`App::process_events`].
    pub event_rx: Receiver<AppEvent>,

    event_tx: Sender<AppEvent>,
    session_events: Receiver<SessionEvent>,
    services: Services,
    preferences: Arc<dyn PreferenceStore>,
    /// What has been persisted so far; `None` fields were never chosen.
    saved: Preferences,
    requests: Requests,
    /// The latest list fetch; a newer one supersedes it.
    list_request: Option<RequestHandle>,
}

impl App {
    /// Create the app with initial theme and language from the preference
    /// store (language falls back to `LANG`, then English).
    pub fn new(
        services: Services,
        preferences: Arc<dyn PreferenceStore>,
        session_events: Receiver<SessionEvent>,
    ) -> Self {
        let saved = match preferences.load() {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load preferences, using defaults");
                Preferences::default()
            }
        };
        let locale = lib_utils::get_env("LANG").ok();
        let state = AppState::new(
            ThemeState::initial(saved.theme),
            LanguageState::initial(saved.language, locale.as_deref()),
        );

        let (event_tx, event_rx) = unbounded();

        tracing::info!(
            theme = state.theme.mode.as_str(),
            language = state.language.code.code(),
            "App state initialized"
        );

        Self {
            state: Arc::new(RwLock::new(state)),
            event_rx,
            event_tx,
            session_events,
            services,
            preferences,
            saved,
            requests: Requests::default(),
            list_request: None,
        }
    }

    /// Build the production stack: reqwest transport, session manager,
    /// services and the file preference store.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = Arc::new(ApiClient::new(config)?);
        let session = Arc::new(SessionManager::new(transport));
        let events = session.events();
        let preferences = Arc::new(FilePreferenceStore::new(config.prefs_path.clone()));
        Ok(Self::new(Services::connect(session), preferences, events))
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Apply every event that has arrived so far. Returns how many were applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.session_events.try_recv() {
            self.handle_session_event(event);
            applied += 1;
        }
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Apply one async result to the state.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionChecked(result) => self.on_session_checked(result),
            AppEvent::LoginResult(result) => self.on_auth_result(Form::Login, result),
            AppEvent::SignupResult(result) => self.on_auth_result(Form::Signup, result),
            AppEvent::LoggedOut => self.on_logged_out(),
            AppEvent::TransactionsLoaded(result) => self.on_transactions_loaded(result),
            AppEvent::TransactionCreated(result) => self.on_transaction_created(result),
            AppEvent::TransactionUpdated { id, update, result } => {
                self.on_transaction_updated(id, update, result)
            }
            AppEvent::TransactionDeleted { id, result } => self.on_transaction_deleted(id, result),
            AppEvent::GoogleAuthUrl(result) => self.on_google_auth_url(result),
            AppEvent::CookieStatusChecked(ok) => self.on_cookie_status(ok),
            AppEvent::GmailConnectUrl(result) => self.on_gmail_connect_url(result),
            AppEvent::GmailSynced(result) => self.on_gmail_synced(result),
            AppEvent::EmailTransactionsLoaded(result) => self.on_email_transactions_loaded(result),
            AppEvent::GmailDisconnected(result) => self.on_gmail_disconnected(result),
            AppEvent::EmailsEvaluated(result) => self.on_emails_evaluated(result),
            AppEvent::EvaluationStatusLoaded(result) => self.on_evaluation_status(result),
        }
    }

    /// Wait until no request is in flight and every result has been applied.
    ///
    /// Results may start follow-up requests (a Gmail sync refetches the
    /// list), so this loops until things are quiet.
    pub async fn settle(&mut self) {
        loop {
            let joins = self.requests.take_all();
            let waited = joins.len();
            for join in joins {
                if let Err(e) = join.await {
                    tracing::warn!(error = %e, "Request task failed");
                }
            }
            let applied = self.process_events();
            if waited == 0 && applied == 0 {
                break;
            }
        }
    }

    /// Cancel everything in flight, e.g. before shutdown.
    pub fn cancel_all(&mut self) {
        self.requests.cancel_all();
        self.state.write().transactions.fetch_cancelled();
    }

    fn spawn_request<F>(&mut self, owner: Option<View>, request: F) -> RequestHandle
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.requests.spawn(owner, self.event_tx.clone(), request)
    }
}
