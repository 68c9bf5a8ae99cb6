//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.
//!
//! The application layer only sees these traits; the concrete services in
//! [`crate::services`] implement them on top of the session manager.

use async_trait::async_trait;
use shared::{
    AuthResponse, EmailEvaluationResult, EmailEvaluationStatus, EmailTransaction,
    GmailSyncResponse, MessageResponse, NewTransaction, SignupRequest, Transaction,
    TransactionPage, TransactionQuery, TransactionUpdate, User,
};

use super::error::Result;

/// Authentication operations
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Login with email and password
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<AuthResponse>;

    /// Register a new account
    async fn signup(&self, request: SignupRequest) -> Result<AuthResponse>;

    /// Identity behind the current session cookies
    async fn current_user(&self) -> Result<User>;

    /// End the session. Never fails from the caller's point of view.
    async fn logout(&self);

    /// Whether the backend sees valid session cookies
    async fn check_cookie_status(&self) -> bool;

    /// Refresh the access token; `false` on any failure
    async fn refresh_token(&self) -> bool;

    /// Start of the redirect-style Google OAuth flow
    async fn google_auth_url(&self) -> Result<String>;

    /// Exchange a Google ID token for a session
    async fn login_with_google(&self, credential: &str) -> Result<AuthResponse>;
}

/// Transaction CRUD
#[async_trait]
pub trait TransactionApi: Send + Sync {
    async fn list(&self, query: &TransactionQuery) -> Result<TransactionPage>;

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction>;

    /// `None` when the backend acknowledged the change without returning the row.
    async fn update(&self, id: &str, update: TransactionUpdate) -> Result<Option<Transaction>>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Gmail import integration
#[async_trait]
pub trait GmailApi: Send + Sync {
    async fn connect_url(&self) -> Result<String>;

    async fn sync(&self) -> Result<GmailSyncResponse>;

    async fn sync_current_month(&self) -> Result<GmailSyncResponse>;

    async fn transactions(&self) -> Result<Vec<EmailTransaction>>;

    async fn disconnect(&self) -> Result<MessageResponse>;
}

/// Server-side email transaction evaluation
#[async_trait]
pub trait EmailEvaluationApi: Send + Sync {
    /// Run an evaluation and wait for its result
    async fn evaluate(&self) -> Result<EmailEvaluationResult>;

    /// Start an evaluation in the background
    async fn evaluate_async(&self) -> Result<EmailEvaluationResult>;

    async fn status(&self) -> Result<EmailEvaluationStatus>;

    /// Admin: evaluate one user's mailbox
    async fn evaluate_for_user(&self, user_id: &str) -> Result<EmailEvaluationResult>;
}
