//! Dashboard
//!
//! - **types**: Patient records, summary statistics and the mock dataset
//! - **container**: Dashboard Data Container (simulated fetch)
//! - **patients**: Search, status filter and CSV export for the patient table
//! - **error**: Error types

pub mod container;
pub mod error;
pub mod patients;
pub mod types;

pub use container::{DashboardContainer, DashboardState, DEFAULT_FETCH_DELAY};
pub use error::{DashboardError, DashboardResult};
pub use patients::{export_csv, PatientFilter};
pub use types::{mock_dashboard_data, DashboardData, DashboardStats, Patient, PatientStatus};
