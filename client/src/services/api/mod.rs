//! # Backend API Module
//!
//! Low-level plumbing shared by all domain services.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs        - Module exports and documentation
//! ├── client.rs     - ApiClient: reqwest transport (base URL, cookies, timeout)
//! ├── request.rs    - ApiRequest / ApiResponse values
//! └── transport.rs  - HttpTransport trait (injected into the session manager)
//! ```

pub mod client;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use request::{ApiRequest, ApiResponse, CSRF_HEADERS};
pub use transport::HttpTransport;
