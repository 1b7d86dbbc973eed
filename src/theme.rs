//! Theme preference
//!
//! Light/dark/system preference persisted next to the session records.

use crate::storage::SessionStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key holding the theme preference
pub const THEME_KEY: &str = "vite-ui-theme";

/// User-selected theme
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the host preference
    #[default]
    System,
}

impl Theme {
    /// Dark goes to light, anything else goes to dark
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::System => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("Unknown theme: {} (expected light, dark or system)", s)),
        }
    }
}

/// Reads and writes the theme preference through the session store
#[derive(Clone)]
pub struct ThemeStore {
    store: Arc<SessionStore>,
}

impl ThemeStore {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Stored preference, `System` if absent or unreadable
    pub fn load(&self) -> Theme {
        let Some(raw) = self.store.read_item(THEME_KEY) else {
            return Theme::default();
        };

        // Bare word, or a JSON-quoted word
        raw.parse::<Theme>()
            .ok()
            .or_else(|| serde_json::from_str::<Theme>(&raw).ok())
            .unwrap_or_else(|| {
                tracing::warn!(key = THEME_KEY, value = %raw, "Ignoring unknown theme");
                Theme::default()
            })
    }

    /// Store the preference as a bare word (`light`, `dark`, `system`)
    pub fn set(&self, theme: Theme) {
        self.store.write_item(THEME_KEY, &theme.to_string());
        tracing::debug!(theme = %theme, "Saved theme");
    }

    /// Flip the stored preference and return the new value
    pub fn toggle(&self) -> Theme {
        let next = self.load().toggled();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueBackend, MemoryBackend};

    fn create_test_themes() -> (ThemeStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(SessionStore::new(backend.clone()));
        (ThemeStore::new(store), backend)
    }

    #[test]
    fn test_default_is_system() {
        let (themes, _) = create_test_themes();
        assert_eq!(themes.load(), Theme::System);
    }

    #[test]
    fn test_set_and_load() {
        let (themes, backend) = create_test_themes();
        themes.set(Theme::Dark);

        assert_eq!(themes.load(), Theme::Dark);
        assert_eq!(backend.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_json_and_unknown_values() {
        let (themes, backend) = create_test_themes();

        backend.set_item(THEME_KEY, "\"light\"").unwrap();
        assert_eq!(themes.load(), Theme::Light);

        backend.set_item(THEME_KEY, "\"sepia\"").unwrap();
        assert_eq!(themes.load(), Theme::System);
    }

    #[test]
    fn test_toggle() {
        let (themes, _) = create_test_themes();

        assert_eq!(themes.toggle(), Theme::Dark);
        assert_eq!(themes.toggle(), Theme::Light);
        assert_eq!(themes.toggle(), Theme::Dark);
        assert_eq!(themes.load(), Theme::Dark);
    }
}
