//! # CarePanel
//!
//! Session, auth and client-state core for a healthcare back-office admin
//! dashboard.
//!
//! ## Features
//!
//! - **Persistent sessions**: current session and account list kept in a local key-value store
//! - **Safe hydration**: malformed records fall back to defaults, unavailable storage degrades to memory
//! - **Race-free login**: only the most recently issued request applies its result
//! - **Route guarding**: protected views redirect to login and back again after sign-in
//! - **Dashboard data**: simulated summary fetch, patient search/filter and CSV export
//!
//! ## Modules
//!
//! - [`storage`]: Key-value backends and the Persistent Session Store
//! - [`auth`]: Auth State Container
//! - [`router`]: Route Guard and navigator
//! - [`dashboard`]: Dashboard Data Container and patient directory
//! - [`theme`]: Theme preference
//! - [`app`]: Wiring of all of the above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carepanel::{App, Config, Route};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(Config::load_default());
//!
//!     let mut nav = app.navigator("/patients");
//!     assert_eq!(nav.route(), Route::Login);
//!
//!     app.auth.login("admin@healthcare.com", "admin123").await?;
//!     assert_eq!(nav.sync(), Route::Patients);
//!
//!     let data = app.dashboard.ensure_loaded().await?;
//!     println!("{} patients on record", data.stats.total_patients);
//!
//!     app.auth.logout();
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod router;
pub mod sequence;
pub mod storage;
pub mod theme;

// Re-export top-level types for convenience
pub use app::App;

pub use auth::{AuthContainer, AuthError, AuthResult, AuthState};

pub use config::{
    generate_default_config, AuthConfig, BackendKind, Config, ConfigError, DashboardConfig,
    LoggingConfig, StorageConfig,
};

pub use dashboard::{
    export_csv, DashboardContainer, DashboardData, DashboardError, DashboardState,
    DashboardStats, Patient, PatientFilter, PatientStatus,
};

pub use router::{guard, GuardDecision, Navigator, Route};

pub use storage::{
    Account, FileBackend, KeyValueBackend, MemoryBackend, RegisteredAccount, Role, Secret,
    SessionStore, StoreError,
};

pub use theme::{Theme, ThemeStore};
