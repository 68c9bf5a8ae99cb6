//! # Finance Client - Library Root
//!
//! Typed client core for the personal finance tracker. The backend does the
//! real work (authentication, persistence, email parsing); this crate keeps
//! a session with it alive and exposes its features as typed services and
//! a small state store.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  app        - intents, events, views, cancellation     │
//! ├────────────────────────────────────────────────────────┤
//! │  store      - session/theme/language/transactions      │
//! │  services   - user, transactions, gmail, email         │
//! ├────────────────────────────────────────────────────────┤
//! │  session    - CSRF cache, single-flight token refresh  │
//! │  services::api - ApiClient (reqwest + cookie jar)      │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP/JSON, cookies, X-XSRF-TOKEN
//!          ▼
//! ┌─────────────────┐
//! │  Backend API    │
//! └─────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: [`App`] orchestrator; user intents spawn abortable tasks whose
//!   results come back as [`AppEvent`]s
//! - **config**: [`ClientConfig`] from the environment
//! - **core**: [`ClientError`] and the service traits
//! - **logging**: `tracing` subscriber with a rolling log file
//! - **services**: HTTP transport and the domain services
//! - **session**: [`SessionManager`], the auth-refresh interceptor
//! - **store**: state slices and their reducers, preference persistence
//!
//! ## Session Handling
//!
//! Requests go through [`SessionManager::execute`]. Mutations get a cached
//! CSRF token; a 401/403 triggers one shared refresh that concurrent
//! requests wait on, after which each request is replayed exactly once. When
//! the refresh fails the cookies are cleared and a single
//! [`SessionEvent::Expired`](session::SessionEvent) is emitted.
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p finance-client
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use app::{App, AppEvent, AppState, View};
pub use config::ClientConfig;
pub use core::{ClientError, Result};
pub use session::SessionManager;
