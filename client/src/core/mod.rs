//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! - **[`error`]**: Client error type (`ClientError`, `Result<T>`)
//! - **[`service`]**: Service traits the application layer depends on
//!   (`AuthApi`, `TransactionApi`, `GmailApi`, `EmailEvaluationApi`)
//!
//! ## Dependency Injection
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use finance_client::core::service::TransactionApi;
//! use finance_client::services::{ApiClient, TransactionService};
//! use finance_client::session::SessionManager;
//!
//! let transport = Arc::new(ApiClient::with_base_url(
//!     "http://localhost:8080/api",
//!     std::time::Duration::from_secs(30),
//! ).unwrap());
//! let session = Arc::new(SessionManager::new(transport));
//!
//! // In production: the real service; in tests: any other implementation
//! let transactions: Arc<dyn TransactionApi> = Arc::new(TransactionService::new(session));
//! ```

pub mod error;
pub mod service;

pub use error::{ClientError, Result};
pub use service::{AuthApi, EmailEvaluationApi, GmailApi, TransactionApi};
