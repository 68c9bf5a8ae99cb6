use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Signup request
///
/// The backend accepts either split first/last names or a single `name`;
/// see [`SignupRequest::normalized`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

impl SignupRequest {
    /// Split a full `name` into first/last name and derive a username from
    /// the email's local part when those fields were left empty.
    ///
    /// Requests without a `name`, or with both name parts present, are
    /// returned unchanged.
    pub fn normalized(mut self) -> Self {
        let Some(name) = self.name.clone() else {
            return self;
        };
        if self.first_name.is_some() && self.last_name.is_some() {
            return self;
        }

        let mut parts = name.split(' ');
        let first_word = parts.next().unwrap_or_default().to_string();
        let rest = parts.collect::<Vec<_>>().join(" ");

        let original_first = self.first_name.clone();
        if self.first_name.is_none() {
            self.first_name = Some(first_word);
        }
        if self.last_name.is_none() {
            self.last_name = Some(if !rest.is_empty() {
                rest
            } else {
                original_first.unwrap_or_default()
            });
        }
        if self.username.is_none() {
            let local = self.email.split('@').next().unwrap_or_default();
            self.username = Some(local.to_string());
        }
        self
    }
}

/// User information (public, safe to send to client)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl User {
    /// Name shown in greetings: first + last name, or the email when no name is known.
    pub fn display_name(&self) -> String {
        let full = match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        };
        let full = full.trim().to_string();
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}

/// Authentication response (login/signup/google success)
///
/// Tokens normally travel as cookies; the body copy is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// `GET /auth/me` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUserResponse {
    pub user: User,
}

/// `GET /auth/csrf-token` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsrfTokenResponse {
    pub token: String,
}

/// OAuth start URL (`GET /auth/google`, `GET /gmail/connect`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// `POST /auth/google` request carrying the Google ID token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleCredentialRequest {
    pub credential: String,
}

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
///
/// Different backend handlers use `message` or `error`; `code` carries a
/// machine-readable reason such as `CSRF_TOKEN_INVALID`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Human-readable text, preferring `message` over `error`.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.is_empty())
    }
}
