//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the client and backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, signup, current user, CSRF token and Google OAuth DTOs
//! - [`transaction`] - Transactions, filters and the normalized list page
//! - [`gmail`] - Gmail sync and email transaction evaluation
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {
//!   "email": "alice@example.com",
//!   "password": "MyPassword123!",
//!   "rememberMe": false
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Set-Cookie: accessToken=...; HttpOnly
//! Content-Type: application/json
//!
//! {
//!   "user": {
//!     "id": "u1",
//!     "firstName": "Alice",
//!     "email": "alice@example.com"
//!   },
//!   "accessToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! }
//! ```

pub mod auth;
pub mod gmail;
pub mod transaction;

pub use auth::*;
pub use gmail::*;
pub use transaction::*;
