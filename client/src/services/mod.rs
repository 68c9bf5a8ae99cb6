//! # Services Module
//!
//! Domain services for the finance backend, and the HTTP plumbing under them.
//!
//! ## Module Overview
//!
//! ```text
//! services/
//! ├── api/             - ApiClient transport, ApiRequest/ApiResponse, HttpTransport trait
//! ├── user.rs          - Login, signup, identity, Google sign-in
//! ├── transactions.rs  - Transaction CRUD and list normalization
//! ├── gmail.rs         - Gmail connect/sync/import
//! └── email.rs         - Email evaluation job
//! ```
//!
//! ## Service Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          App / CLI                            │
//! │   AuthApi    TransactionApi    GmailApi    EmailEvaluationApi │
//! └──────┬──────────────┬─────────────┬───────────────┬───────────┘
//!        │              │             │               │
//!        ▼              ▼             ▼               ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  SessionManager: CSRF headers, 401/403 refresh + one replay   │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ HttpTransport
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  ApiClient (reqwest, cookie jar, timeout)                     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ HTTP/JSON
//!                                ▼
//!                     Backend API (/api/auth/*, /api/transactions/*,
//!                                  /api/gmail/*, /api/email-transactions/*)
//! ```
//!
//! ## Error Handling
//!
//! Every service returns [`crate::core::error::Result`]. Status codes are
//! turned into categorized [`ClientError`](crate::core::error::ClientError)s
//! whose messages are meant to be shown next to the form that triggered
//! the call:
//!
//! - Network errors: "Network error. Please check your connection"
//! - 401 on login: "Invalid email or password"
//! - 403 on a transaction mutation: "Authentication error: CSRF validation failed"
//! - 404 on update/delete: "Transaction not found"
//! - Server-supplied messages are passed through (prefixed per operation for transactions)
//!
//! ## Thread Safety
//!
//! Services are stateless apart from the shared `Arc<SessionManager>`; wrap
//! them in `Arc` and call them from any task.

pub mod api;
pub mod email;
pub mod gmail;
pub mod transactions;
pub mod user;

pub use api::{ApiClient, ApiRequest, ApiResponse, HttpTransport};
pub use email::EmailTransactionService;
pub use gmail::GmailService;
pub use transactions::TransactionService;
pub use user::UserService;
