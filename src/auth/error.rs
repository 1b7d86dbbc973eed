//! Auth error types

use thiserror::Error;

/// Errors returned by [`AuthContainer::login`](super::AuthContainer::login)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No registered account matches the email and password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A newer login or a logout was issued before this login resolved.
    /// The result was discarded without touching state.
    #[error("Login superseded by a newer request")]
    Superseded,
}

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;
