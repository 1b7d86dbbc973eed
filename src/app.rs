//! Application Root
//!
//! Builds the storage backend from configuration and wires the session store,
//! containers and theme store together. Views receive an `App` (or the pieces
//! they need) instead of reaching for global state.

use crate::auth::AuthContainer;
use crate::config::{BackendKind, Config};
use crate::dashboard::DashboardContainer;
use crate::router::Navigator;
use crate::storage::{FileBackend, KeyValueBackend, MemoryBackend, SessionStore};
use crate::theme::ThemeStore;
use std::sync::Arc;

/// Shared application state for all views
#[derive(Clone)]
pub struct App {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Session and account persistence
    pub store: Arc<SessionStore>,
    /// Auth State Container
    pub auth: Arc<AuthContainer>,
    /// Dashboard Data Container
    pub dashboard: Arc<DashboardContainer>,
    /// Theme preference
    pub themes: ThemeStore,
}

impl App {
    /// Create the app with the backend selected in `config.storage`
    pub fn new(config: Config) -> Self {
        let backend: Arc<dyn KeyValueBackend> = match config.storage.backend {
            BackendKind::File => Arc::new(FileBackend::new(config.storage.data_path())),
            BackendKind::Memory => Arc::new(MemoryBackend::new()),
        };
        Self::with_backend(config, backend)
    }

    /// Create the app over an explicit backend
    pub fn with_backend(config: Config, backend: Arc<dyn KeyValueBackend>) -> Self {
        tracing::debug!(backend = backend.name(), "Opening session store");

        let store = Arc::new(SessionStore::new(backend));
        let auth = Arc::new(AuthContainer::new(
            store.clone(),
            config.auth.login_delay(),
        ));
        let dashboard = Arc::new(DashboardContainer::new(config.dashboard.fetch_delay()));
        let themes = ThemeStore::new(store.clone());

        Self {
            config: Arc::new(config),
            store,
            auth,
            dashboard,
            themes,
        }
    }

    /// Navigator bound to this app's auth state, starting at `path`
    pub fn navigator(&self, path: &str) -> Navigator {
        Navigator::new(self.auth.subscribe(), path)
    }
}
