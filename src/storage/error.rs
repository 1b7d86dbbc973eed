//! Storage error types
//!
//! Errors raised by key-value backends. The session store absorbs these
//! (see [`SessionStore`](super::SessionStore)); they never reach callers of
//! the auth or dashboard containers.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted records
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation on the backing medium failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value exists but cannot be read back as text
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The key is not usable as a storage key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The backend refused the operation (quota, private mode, poisoned lock)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidKey("../etc".to_string());
        assert_eq!(err.to_string(), "Invalid key: ../etc");

        let err = StoreError::Unavailable("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Storage unavailable: quota exceeded");

        let err = StoreError::Corrupt("healthcare_users is not UTF-8".to_string());
        assert_eq!(err.to_string(), "Corrupt record: healthcare_users is not UTF-8");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(err.to_string(), "IO error: read-only");
    }
}
