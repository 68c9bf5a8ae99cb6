//! # Session Layer
//!
//! Everything that keeps an authenticated session alive between the domain
//! services and the transport.
//!
//! ```text
//! session/
//! ├── mod.rs      - Module exports
//! ├── csrf.rs     - CsrfTokenCache: lazily fetched token, one fetch at a time
//! ├── refresh.rs  - RefreshCoordinator: single-flight refresh with a waiter queue
//! └── manager.rs  - SessionManager: CSRF attachment, 401/403 recovery, expiry events
//! ```

pub mod csrf;
pub mod manager;
pub mod refresh;

pub use csrf::CsrfTokenCache;
pub use manager::{SessionEvent, SessionManager, CSRF_PATH, LOGIN_EXPIRED_ROUTE, REFRESH_PATH};
pub use refresh::{RefreshCoordinator, RefreshOutcome};
