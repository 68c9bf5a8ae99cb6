//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the finance client and the backend API.
//! All DTOs use JSON serialization via `serde` for API communication.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, signup, current user, CSRF and OAuth DTOs
//!   - **[`dto::transaction`]**: Transactions, query filters and the list envelope
//!   - **[`dto::gmail`]**: Gmail import and email evaluation DTOs
//! - **[`utils`]**: Shared formatting helpers
//!   - **[`utils::format_amount`]**: Render an amount with its currency symbol
//!   - **[`utils::truncate`]**: Shorten long descriptions for list display
//!
//! ## Wire Format
//!
//! The backend speaks camelCase JSON, so every DTO carries
//! `#[serde(rename_all = "camelCase")]`:
//! - Optional fields are omitted from JSON when `None` (using `#[serde(skip_serializing_if = "Option::is_none")]`)
//! - Enums serialize to the exact strings the backend stores (`"credit"`, `"CREDIT_CARD"`, `"INR"`)
//! - All structs implement both `Serialize` and `Deserialize`
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::auth::LoginRequest;
//!
//! let request = LoginRequest {
//!     email: "alice@example.com".to_string(),
//!     password: "secret".to_string(),
//!     remember_me: true,
//! };
//!
//! let json = serde_json::to_value(&request).unwrap();
//! assert_eq!(json["rememberMe"], true);
//! ```

pub mod dto;
pub mod utils;

// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
