//! CarePanel Persistence
//!
//! This module provides the local persistence layer:
//!
//! - **types**: Persisted records (Account, RegisteredAccount, Secret, Role)
//! - **backend**: Key-value backends (memory, file-per-key)
//! - **session_store**: Session and account-list persistence with safe fallbacks
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Account → JSON → SessionStore → KeyValueBackend (or in-memory overlay when degraded)
//!
//! Read Path:
//!   KeyValueBackend → JSON → schema validation → Account (or defaults)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use carepanel::storage::{FileBackend, SessionStore};
//! use std::sync::Arc;
//!
//! let store = SessionStore::new(Arc::new(FileBackend::new("./carepanel_data")));
//! let accounts = store.load_accounts();
//! println!("{} registered accounts", accounts.len());
//! ```

pub mod backend;
pub mod error;
pub mod session_store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::{StoreError, StoreResult};
pub use session_store::{SessionStore, ACCOUNTS_KEY, SESSION_KEY};
pub use types::{
    default_accounts, Account, RegisteredAccount, Role, Secret, DEFAULT_ADMIN_EMAIL,
    DEFAULT_ADMIN_PASSWORD,
};
