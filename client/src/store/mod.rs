//! # Global State Store
//!
//! Plain state slices with reducer methods. The app layer owns one of each
//! behind its `RwLock`; nothing here does I/O except the preference stores.
//!
//! ```text
//! store/
//! ├── session.rs       - SessionState: who is logged in
//! ├── theme.rs         - ThemeState: light/dark (persisted)
//! ├── language.rs      - LanguageState: UI language (persisted)
//! ├── transactions.rs  - TransactionsState: list, fetch status, filter
//! ├── summary.rs       - TransactionSummary: income/expense totals
//! └── preferences.rs   - PreferenceStore: file and in-memory persistence
//! ```

pub mod language;
pub mod preferences;
pub mod session;
pub mod summary;
pub mod theme;
pub mod transactions;

pub use language::{LanguageCode, LanguageState};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences};
pub use session::{SessionState, COOKIE_TOKEN};
pub use summary::TransactionSummary;
pub use theme::{ThemeMode, ThemeState};
pub use transactions::{FetchStatus, FilterUpdate, TransactionFilter, TransactionsState, TypeFilter};
