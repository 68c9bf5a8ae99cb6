//! # User Service
//!
//! Login, signup, session identity and Google sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    AuthResponse, AuthUrlResponse, CurrentUserResponse, GoogleCredentialRequest, LoginRequest,
    SignupRequest, User,
};

use crate::core::error::{ClientError, Result};
use crate::core::service::AuthApi;
use crate::services::api::{ApiRequest, ApiResponse};
use crate::session::SessionManager;

const NETWORK_ERROR: &str = "Network error. Please check your connection";
const LOGIN_UNEXPECTED: &str = "An unexpected error occurred. Please try again later";
const SIGNUP_UNEXPECTED: &str = "An unexpected error occurred during signup";

pub struct UserService {
    session: Arc<SessionManager>,
}

impl UserService {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Map a non-success auth response: the server message if it sent one,
    /// otherwise `fallback`, in the category the status implies.
    fn rejection(response: &ApiResponse, fallback: &str) -> ClientError {
        let message = response
            .error_message()
            .unwrap_or_else(|| fallback.to_string());
        ClientError::from_status(response.status, Some(message))
    }

    fn send_failure(err: ClientError) -> ClientError {
        if err.is_network() {
            ClientError::Network(NETWORK_ERROR.to_string())
        } else {
            err
        }
    }
}

#[async_trait]
impl AuthApi for UserService {
    #[tracing::instrument(skip(self, password), fields(email = %email.trim()))]
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<AuthResponse> {
        let email = email.trim();
        lib_utils::validate_not_empty(email, "Email").map_err(ClientError::Validation)?;
        lib_utils::validate_not_empty(password, "Password").map_err(ClientError::Validation)?;

        tracing::info!("Attempting login");
        let request = ApiRequest::post("/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me,
        })?;
        let response = self
            .session
            .execute(request)
            .await
            .map_err(Self::send_failure)?;

        match response.status {
            status if status.is_success() => {
                let auth = response.json::<AuthResponse>()?;
                self.session.begin_session().await;
                tracing::info!(user_id = %auth.user.id, "Login successful");
                Ok(auth)
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Login rejected: invalid credentials");
                Err(ClientError::Authentication(
                    "Invalid email or password".to_string(),
                ))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Login rate limited");
                Err(ClientError::RateLimited(
                    "Too many login attempts. Please try again later".to_string(),
                ))
            }
            status => {
                tracing::warn!(status = status.as_u16(), "Login failed");
                Err(Self::rejection(&response, LOGIN_UNEXPECTED))
            }
        }
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    async fn signup(&self, request: SignupRequest) -> Result<AuthResponse> {
        lib_utils::validate_email(&request.email).map_err(ClientError::Validation)?;
        lib_utils::validate_min_length(&request.password, 6, "Password")
            .map_err(ClientError::Validation)?;

        let body = request.normalized();
        let response = self
            .session
            .execute(ApiRequest::post("/auth/register").json(&body)?)
            .await
            .map_err(Self::send_failure)?;

        match response.status {
            status if status.is_success() => {
                let auth = response.json::<AuthResponse>()?;
                self.session.begin_session().await;
                tracing::info!(user_id = %auth.user.id, "Signup successful");
                Ok(auth)
            }
            StatusCode::BAD_REQUEST => Err(ClientError::Validation("Invalid signup data".to_string())),
            status => {
                tracing::warn!(status = status.as_u16(), "Signup failed");
                Err(Self::rejection(&response, SIGNUP_UNEXPECTED))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn current_user(&self) -> Result<User> {
        let not_authenticated = || ClientError::Authentication("User not authenticated".to_string());

        let response = self
            .session
            .execute(ApiRequest::get("/auth/me"))
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Identity check failed");
                not_authenticated()
            })?;
        if !response.is_success() {
            return Err(not_authenticated());
        }
        response
            .json::<CurrentUserResponse>()
            .map(|body| body.user)
            .map_err(|_| not_authenticated())
    }

    #[tracing::instrument(skip(self))]
    async fn logout(&self) {
        match self.session.execute(ApiRequest::post("/auth/logout")).await {
            Ok(response) if response.is_success() => tracing::info!("Logged out"),
            Ok(response) => {
                tracing::debug!(status = response.status.as_u16(), "Logout rejected, ignoring")
            }
            Err(e) => tracing::debug!(error = %e, "Logout failed, ignoring"),
        }
        self.session.end_session().await;
    }

    async fn check_cookie_status(&self) -> bool {
        // Raw transport: a 401 here is an answer, not something to recover from
        match self
            .session
            .transport()
            .send(&ApiRequest::get("/auth/cookie-check"))
            .await
        {
            Ok(response) => response.status == StatusCode::OK,
            Err(_) => false,
        }
    }

    async fn refresh_token(&self) -> bool {
        self.session.refresh_session().await.is_ok()
    }

    #[tracing::instrument(skip(self))]
    async fn google_auth_url(&self) -> Result<String> {
        let response = self
            .session
            .execute(ApiRequest::get("/auth/google"))
            .await?
            .error_for_status()?;
        let url = response.json::<AuthUrlResponse>()?.auth_url;
        if url.trim().is_empty() {
            return Err(ClientError::Validation("No auth URL received".to_string()));
        }
        Ok(url)
    }

    #[tracing::instrument(skip(self, credential))]
    async fn login_with_google(&self, credential: &str) -> Result<AuthResponse> {
        let request = ApiRequest::post("/auth/google").json(&GoogleCredentialRequest {
            credential: credential.to_string(),
        })?;
        let response = self
            .session
            .execute(request)
            .await
            .map_err(Self::send_failure)?;
        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "Google sign-in rejected");
            return Err(Self::rejection(&response, "Google sign-in failed"));
        }

        let auth = response.json::<AuthResponse>()?;
        self.session.begin_session().await;
        tracing::info!(user_id = %auth.user.id, "Google sign-in successful");
        Ok(auth)
    }
}
