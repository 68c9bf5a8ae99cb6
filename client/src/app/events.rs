//! # Application Events
//!
//! Results of background requests, sent back to the app over its channel.

use shared::{
    AuthResponse, EmailEvaluationResult, EmailEvaluationStatus, EmailTransaction,
    GmailSyncResponse, MessageResponse, Transaction, TransactionPage, TransactionUpdate, User,
};

use crate::core::error::Result;

/// Async task results sent to the app
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Cookie-backed identity check at startup
    SessionChecked(Result<User>),
    /// Password or Google login completed
    LoginResult(Result<AuthResponse>),
    SignupResult(Result<AuthResponse>),
    /// Logout finished (it never fails from the user's point of view)
    LoggedOut,
    TransactionsLoaded(Result<TransactionPage>),
    TransactionCreated(Result<Transaction>),
    /// `result` is `None` when the backend did not echo the row
    TransactionUpdated {
        id: String,
        update: TransactionUpdate,
        result: Result<Option<Transaction>>,
    },
    TransactionDeleted { id: String, result: Result<()> },
    /// Google consent page for the redirect sign-in
    GoogleAuthUrl(Result<String>),
    /// Auth cookies were (or were not) stored by the login
    CookieStatusChecked(bool),
    GmailConnectUrl(Result<String>),
    GmailSynced(Result<GmailSyncResponse>),
    EmailTransactionsLoaded(Result<Vec<EmailTransaction>>),
    GmailDisconnected(Result<MessageResponse>),
    EmailsEvaluated(Result<EmailEvaluationResult>),
    EvaluationStatusLoaded(Result<EmailEvaluationStatus>),
}
