//! Navigator
//!
//! Tracks the current location and re-applies the route guard whenever the
//! auth state changes. After a guard redirect to the login view the
//! originally requested location is remembered and restored once the user
//! signs in.

use crate::auth::AuthState;
use crate::router::guard::{guard, GuardDecision, Route};
use tokio::sync::watch;

/// Guarded location tracking
pub struct Navigator {
    auth: watch::Receiver<AuthState>,
    location: String,
    route: Route,
    return_to: Option<String>,
}

impl Navigator {
    /// Start at `initial_path`, applying the guard immediately
    pub fn new(auth: watch::Receiver<AuthState>, initial_path: &str) -> Self {
        let mut navigator = Self {
            auth,
            location: Route::DEFAULT.path().to_string(),
            route: Route::DEFAULT,
            return_to: None,
        };
        navigator.navigate(initial_path);
        navigator
    }

    /// Current location (path as requested, or the redirect target)
    pub fn location(&self) -> &str {
        &self.location
    }

    /// View rendered at the current location
    pub fn route(&self) -> Route {
        self.route
    }

    /// Location to restore after sign-in, if a redirect parked one
    pub fn return_to(&self) -> Option<&str> {
        self.return_to.as_deref()
    }

    /// User-initiated navigation. Forgets any earlier parked location.
    pub fn navigate(&mut self, path: &str) -> Route {
        self.return_to = None;
        let authenticated = self.auth.borrow_and_update().authenticated;
        self.apply(path, authenticated)
    }

    /// Re-evaluate the current location against the latest auth state
    pub fn sync(&mut self) -> Route {
        let location = self.location.clone();
        let authenticated = self.auth.borrow_and_update().authenticated;
        self.apply(&location, authenticated)
    }

    /// Wait for the next auth state change and re-evaluate.
    ///
    /// Returns `None` once the auth container has been dropped.
    pub async fn changed(&mut self) -> Option<Route> {
        self.auth.changed().await.ok()?;
        Some(self.sync())
    }

    fn apply(&mut self, path: &str, authenticated: bool) -> Route {
        match guard(authenticated, path) {
            GuardDecision::Allow { route } => {
                self.location = path.to_string();
                self.route = route;
            }
            GuardDecision::Redirect {
                to: Route::Login,
                from,
            } => {
                tracing::debug!(from = ?from, "Redirecting to login");
                if from.is_some() {
                    self.return_to = from;
                }
                self.location = Route::Login.path().to_string();
                self.route = Route::Login;
            }
            GuardDecision::Redirect { to, .. } => {
                let target = self
                    .return_to
                    .take()
                    .unwrap_or_else(|| to.path().to_string());
                tracing::debug!(target = %target, "Leaving login view");
                self.route = Route::from_path(&target);
                self.location = target;
            }
        }
        self.route
    }
}
