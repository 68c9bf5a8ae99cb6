//! # Application State Types
//!
//! Everything the views render from: the store slices plus the current view
//! and the per-form error messages.

use std::collections::HashMap;

use shared::{EmailEvaluationResult, EmailEvaluationStatus, EmailTransaction, GmailSyncResponse};

use crate::store::{
    LanguageState, SessionState, ThemeState, TransactionSummary, TransactionsState,
};

/// Application views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// Landing page
    #[default]
    Home,
    /// Login form; `expired` shows the "session expired" notice
    Login { expired: bool },
    Signup,
    Dashboard,
    /// Transaction list with filters and the add/edit form
    Transactions,
    Settings,
    Profile,
}

impl View {
    pub fn route(&self) -> &'static str {
        match self {
            View::Home => "/",
            View::Login { expired: false } => "/login",
            View::Login { expired: true } => "/login?expired=true",
            View::Signup => "/signup",
            View::Dashboard => "/dashboard",
            View::Transactions => "/transactions",
            View::Settings => "/settings",
            View::Profile => "/profile",
        }
    }

    /// Inverse of [`View::route`]; the query string is only honoured on `/login`.
    pub fn from_route(route: &str) -> Option<Self> {
        let (path, query) = match route.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (route, None),
        };
        let view = match path.trim_end_matches('/') {
            "" => View::Home,
            "/login" => View::Login {
                expired: query.is_some_and(|q| q.split('&').any(|p| p == "expired=true")),
            },
            "/signup" => View::Signup,
            "/dashboard" => View::Dashboard,
            "/transactions" => View::Transactions,
            "/settings" => View::Settings,
            "/profile" => View::Profile,
            _ => return None,
        };
        Some(view)
    }

    /// Views that redirect to login without a session
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            View::Dashboard | View::Transactions | View::Settings | View::Profile
        )
    }

    /// Same page, ignoring view parameters
    pub fn same_page(&self, other: &View) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Forms that show an inline error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    Login,
    Signup,
    /// Add/edit/delete on the transactions view
    Transaction,
    Gmail,
    Settings,
}

/// Gmail import status shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GmailState {
    pub syncing: bool,
    pub evaluating: bool,
    pub last_sync: Option<GmailSyncResponse>,
    pub last_evaluation: Option<EmailEvaluationResult>,
    /// Consent page that links a mailbox
    pub connect_url: Option<String>,
    /// Rows the backend extracted from mail, newest sync included
    pub email_transactions: Vec<EmailTransaction>,
    pub evaluation_status: Option<EmailEvaluationStatus>,
}

/// How the server-side email evaluation is run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Wait for the job and report its counts
    #[default]
    Now,
    /// Queue the job and return immediately
    Background,
    /// Evaluate one user's mail
    ForUser(String),
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub view: View,
    pub session: SessionState,
    pub theme: ThemeState,
    pub language: LanguageState,
    pub transactions: TransactionsState,
    pub gmail: GmailState,
    /// Google consent page for the redirect sign-in flow
    pub google_auth_url: Option<String>,
    /// Whether the auth cookies were confirmed after the last login
    pub cookies_confirmed: Option<bool>,
    pub errors: HashMap<Form, String>,
    /// Requests in flight that the user is waiting on (login, save, sync)
    pub busy: usize,
}

impl AppState {
    pub fn new(theme: ThemeState, language: LanguageState) -> Self {
        Self {
            theme,
            language,
            ..Default::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn error(&self, form: Form) -> Option<&str> {
        self.errors.get(&form).map(String::as_str)
    }

    pub fn set_error(&mut self, form: Form, message: impl Into<String>) {
        self.errors.insert(form, message.into());
    }

    pub fn clear_error(&mut self, form: Form) {
        self.errors.remove(&form);
    }

    /// Totals over the currently loaded (and visible) transactions
    pub fn summary(&self) -> TransactionSummary {
        TransactionSummary::from_items(self.transactions.visible_items())
    }
}
