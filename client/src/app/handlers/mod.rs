//! # Intent Handlers
//!
//! User intents (the public `App` methods that start work) and the matching
//! result handlers that fold [`AppEvent`](super::AppEvent)s into the state.
//!
//! - **auth**: bootstrap, login, signup, Google sign-in, logout, session expiry
//! - **transactions**: list fetch, filters, create/update/delete
//! - **gmail**: Gmail sync and email evaluation
//! - **navigation**: view changes with the login guard and request cancellation
//! - **settings**: theme and language, persisted

mod auth;
mod gmail;
mod navigation;
mod settings;
mod transactions;
