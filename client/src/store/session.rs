//! Authentication slice. Never persisted; re-derived from `/auth/me` on start.

use chrono::{DateTime, Utc};
use shared::User;

/// Placeholder token stored when the real tokens live in HTTP-only cookies.
pub const COOKIE_TOKEN: &str = "auth-cookie-present";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub last_auth_check: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn log_in(&mut self, user: User, token: impl Into<String>) {
        self.is_authenticated = true;
        self.user = Some(user);
        self.token = Some(token.into());
        self.last_auth_check = Some(lib_utils::now_utc());
    }

    pub fn log_out(&mut self) {
        self.is_authenticated = false;
        self.user = None;
        self.token = None;
        self.last_auth_check = Some(lib_utils::now_utc());
    }

    /// Replace the profile without touching the auth check timestamp.
    pub fn update_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn update_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        self.last_auth_check = Some(lib_utils::now_utc());
    }
}
