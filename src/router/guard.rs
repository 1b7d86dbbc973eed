//! Route Guard
//!
//! Pure decision function over the authenticated flag and a requested path.

use serde::Serialize;

/// Views of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Sign-in form (`/login`)
    Login,
    /// Summary statistics (`/`), the default protected view
    Dashboard,
    /// Patient directory (`/patients`)
    Patients,
    /// Account and appearance settings (`/settings`)
    Settings,
    /// Any other path; rendered inside the protected layout
    NotFound,
}

impl Route {
    /// Where authenticated users land by default
    pub const DEFAULT: Route = Route::Dashboard;

    /// Resolve a path, ignoring query string, fragment and trailing slash
    pub fn from_path(path: &str) -> Self {
        match normalize(path) {
            "/login" => Route::Login,
            "/" => Route::Dashboard,
            "/patients" => Route::Patients,
            "/settings" => Route::Settings,
            _ => Route::NotFound,
        }
    }

    /// Canonical path of the view
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Patients => "/patients",
            Route::Settings => "/settings",
            Route::NotFound => "/404",
        }
    }

    /// Whether the view requires a signed-in account
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Login => write!(f, "login"),
            Route::Dashboard => write!(f, "dashboard"),
            Route::Patients => write!(f, "patients"),
            Route::Settings => write!(f, "settings"),
            Route::NotFound => write!(f, "not_found"),
        }
    }
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the requested view
    Allow { route: Route },
    /// Go elsewhere. `from` is the originally requested location when the
    /// redirect is to the login view.
    Redirect { to: Route, from: Option<String> },
}

/// Decide whether navigation to `path` is allowed
pub fn guard(authenticated: bool, path: &str) -> GuardDecision {
    let route = Route::from_path(path);

    match (authenticated, route) {
        (false, route) if route.is_protected() => GuardDecision::Redirect {
            to: Route::Login,
            from: Some(path.to_string()),
        },
        (true, Route::Login) => GuardDecision::Redirect {
            to: Route::DEFAULT,
            from: None,
        },
        (_, route) => GuardDecision::Allow { route },
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(|c| c == '?' || c == '#').next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Route::Dashboard);
        assert_eq!(Route::from_path(""), Route::Dashboard);
        assert_eq!(Route::from_path("/login"), Route::Login);
        assert_eq!(Route::from_path("/login/"), Route::Login);
        assert_eq!(Route::from_path("/patients?status=critical"), Route::Patients);
        assert_eq!(Route::from_path("/settings#appearance"), Route::Settings);
        assert_eq!(Route::from_path("/billing"), Route::NotFound);
        assert_eq!(Route::from_path("/Patients"), Route::NotFound);
    }

    #[test]
    fn test_only_login_is_public() {
        for route in [Route::Dashboard, Route::Patients, Route::Settings, Route::NotFound] {
            assert!(route.is_protected(), "{} should be protected", route);
        }
        assert!(!Route::Login.is_protected());
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        assert_eq!(
            guard(false, "/patients?search=doe"),
            GuardDecision::Redirect {
                to: Route::Login,
                from: Some("/patients?search=doe".to_string()),
            }
        );
        assert_eq!(
            guard(false, "/no-such-page"),
            GuardDecision::Redirect {
                to: Route::Login,
                from: Some("/no-such-page".to_string()),
            }
        );
        assert_eq!(
            guard(false, "/login"),
            GuardDecision::Allow { route: Route::Login }
        );
    }

    #[test]
    fn test_authenticated_leaves_login() {
        assert_eq!(
            guard(true, "/login"),
            GuardDecision::Redirect {
                to: Route::Dashboard,
                from: None,
            }
        );
        assert_eq!(
            guard(true, "/settings"),
            GuardDecision::Allow {
                route: Route::Settings
            }
        );
        assert_eq!(
            guard(true, "/missing"),
            GuardDecision::Allow {
                route: Route::NotFound
            }
        );
    }
}
