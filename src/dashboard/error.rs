//! Dashboard error types

use thiserror::Error;

/// Errors that can occur in the dashboard layer
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A newer fetch was issued before this one resolved
    #[error("Fetch superseded by a newer request")]
    Superseded,

    /// CSV encoding failed
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the export failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
