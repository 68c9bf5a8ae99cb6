//! # Authentication Handlers
//!
//! Login, signup, logout and the startup identity check.

use shared::{AuthResponse, SignupRequest, User};

use crate::app::{App, AppEvent, Form, RequestHandle, View};
use crate::core::error::Result;
use crate::session::SessionEvent;
use crate::store::COOKIE_TOKEN;

impl App {
    /// Re-derive the session from the auth cookies (`GET /auth/me`).
    pub fn bootstrap(&mut self) -> RequestHandle {
        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            AppEvent::SessionChecked(auth.current_user().await)
        })
    }

    pub fn login(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        remember_me: bool,
    ) -> RequestHandle {
        let (email, password) = (email.into(), password.into());
        self.begin_form(Form::Login);

        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            AppEvent::LoginResult(auth.login(&email, &password, remember_me).await)
        })
    }

    pub fn signup(&mut self, request: SignupRequest) -> RequestHandle {
        self.begin_form(Form::Signup);

        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            AppEvent::SignupResult(auth.signup(request).await)
        })
    }

    /// Sign in with a Google ID token obtained by the front end.
    pub fn login_with_google(&mut self, credential: impl Into<String>) -> RequestHandle {
        let credential = credential.into();
        self.begin_form(Form::Login);

        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            AppEvent::LoginResult(auth.login_with_google(&credential).await)
        })
    }

    /// Fetch the Google consent page for the redirect sign-in flow.
    pub fn google_auth_url(&mut self) -> RequestHandle {
        self.begin_form(Form::Login);

        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            AppEvent::GoogleAuthUrl(auth.google_auth_url().await)
        })
    }

    /// Ask the backend whether the auth cookies came back with the last
    /// request. Runs after every successful login.
    pub fn check_cookie_status(&mut self) -> RequestHandle {
        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            AppEvent::CookieStatusChecked(auth.check_cookie_status().await)
        })
    }

    pub fn logout(&mut self) -> RequestHandle {
        let auth = self.services.auth.clone();
        self.spawn_request(None, async move {
            auth.logout().await;
            AppEvent::LoggedOut
        })
    }

    /// Clear the form's error and count it as busy until its result arrives.
    pub(in crate::app) fn begin_form(&mut self, form: Form) {
        let mut state = self.state.write();
        state.clear_error(form);
        state.busy += 1;
    }

    pub(in crate::app) fn end_form(&mut self) {
        let mut state = self.state.write();
        state.busy = state.busy.saturating_sub(1);
    }

    pub(in crate::app) fn on_session_checked(&mut self, result: Result<User>) {
        let redirect = {
            let mut state = self.state.write();
            match result {
                Ok(user) if state.session.is_authenticated => {
                    tracing::debug!(user_id = %user.id, "Session still valid");
                    state.session.update_user(user);
                    state.session.update_token(COOKIE_TOKEN);
                    None
                }
                Ok(user) => {
                    tracing::info!(user_id = %user.id, "Session restored from cookies");
                    state.session.log_in(user, COOKIE_TOKEN);
                    None
                }
                Err(e) => {
                    tracing::debug!(error = %e, "No active session");
                    state.session.log_out();
                    state.view.requires_auth().then_some(View::Login { expired: false })
                }
            }
        };
        if let Some(view) = redirect {
            self.navigate(view);
        }
    }

    pub(in crate::app) fn on_auth_result(&mut self, form: Form, result: Result<AuthResponse>) {
        self.end_form();
        match result {
            Ok(auth) => {
                {
                    let mut state = self.state.write();
                    tracing::info!(user_id = %auth.user.id, "Logged in");
                    let token = auth.access_token.unwrap_or_else(|| COOKIE_TOKEN.to_string());
                    state.session.log_in(auth.user, token);
                    state.google_auth_url = None;
                    state.clear_error(form);
                }
                self.check_cookie_status();
                self.navigate(View::Dashboard);
            }
            Err(e) => {
                tracing::warn!(form = ?form, error = %e, "Authentication failed");
                self.state.write().set_error(form, e.to_string());
            }
        }
    }

    pub(in crate::app) fn on_google_auth_url(&mut self, result: Result<String>) {
        self.end_form();
        let mut state = self.state.write();
        match result {
            Ok(url) => {
                state.google_auth_url = Some(url);
                state.clear_error(Form::Login);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Google sign-in unavailable");
                state.google_auth_url = None;
                state.set_error(Form::Login, e.to_string());
            }
        }
    }

    pub(in crate::app) fn on_cookie_status(&mut self, ok: bool) {
        let mut state = self.state.write();
        if !state.is_authenticated() {
            return;
        }
        if !ok {
            tracing::warn!("Auth cookies not confirmed; the session may not survive a restart");
        }
        state.cookies_confirmed = Some(ok);
    }

    pub(in crate::app) fn on_logged_out(&mut self) {
        self.clear_user_data();
        self.navigate(View::Login { expired: false });
        tracing::info!("Logged out");
    }

    pub(in crate::app) fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Expired { redirect } => {
                tracing::warn!(redirect = %redirect, "Session expired");
                self.clear_user_data();

                let on_login = matches!(self.state.read().view, View::Login { .. });
                if !on_login {
                    let target = View::from_route(&redirect).unwrap_or(View::Login { expired: true });
                    self.navigate(target);
                }
            }
        }
    }

    /// Drop everything that belongs to the signed-out user.
    fn clear_user_data(&mut self) {
        if let Some(list) = self.list_request.take() {
            list.cancel();
        }
        let mut state = self.state.write();
        state.session.log_out();
        state.cookies_confirmed = None;
        state.transactions = Default::default();
        state.gmail = Default::default();
    }
}
