//! Authentication
//!
//! Session lifecycle on top of the persistence layer:
//!
//! - **container**: Auth State Container (login, logout, clear_error, register)
//! - **error**: Error types
//!
//! ```text
//! login(email, password)
//!   → loading = true
//!   → simulated delay
//!   → match against captured account list
//!   → (still the latest request?) apply + persist session
//! ```

pub mod container;
pub mod error;

pub use container::{AuthContainer, AuthState, DEFAULT_LOGIN_DELAY};
pub use error::{AuthError, AuthResult};
