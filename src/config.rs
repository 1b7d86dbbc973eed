//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which key-value backend holds persisted records
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSON file per key under `data_dir`
    #[default]
    File,
    /// Process memory only
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub backend: BackendKind,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("carepanel").to_string_lossy().to_string())
        .unwrap_or_else(|| "./carepanel_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendKind::default(),
        }
    }
}

impl StorageConfig {
    /// `data_dir` with a leading `~/` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }
}

/// Auth container configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_login_delay")]
    pub login_delay_ms: u64,
}

fn default_login_delay() -> u64 {
    800
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: default_login_delay(),
        }
    }
}

impl AuthConfig {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

/// Dashboard container configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_fetch_delay")]
    pub fetch_delay_ms: u64,
}

fn default_fetch_delay() -> u64 {
    1000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay(),
        }
    }
}

impl DashboardConfig {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment, falling back to defaults
    /// if a config file exists but cannot be loaded
    pub fn load_default() -> Self {
        Self::try_load_default().unwrap_or_else(|e| {
            tracing::warn!("{}, using defaults", e);
            Self::from_env()
        })
    }

    /// Load the first config file found in the default locations, or the
    /// environment alone if there is none
    pub fn try_load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("carepanel").join("config.toml")),
            Some(PathBuf::from("/etc/carepanel/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(data_dir) = var("CAREPANEL_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(backend) = var("CAREPANEL_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.storage.backend = kind,
                Err(e) => tracing::warn!("Ignoring CAREPANEL_STORAGE_BACKEND: {}", e),
            }
        }

        // Delay overrides
        if let Some(delay) = var("CAREPANEL_LOGIN_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                self.auth.login_delay_ms = ms;
            }
        }
        if let Some(delay) = var("CAREPANEL_FETCH_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                self.dashboard.fetch_delay_ms = ms;
            }
        }

        // Logging overrides
        if let Some(level) = var("CAREPANEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CAREPANEL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# CarePanel Configuration
#
# Environment variables override these settings:
# - CAREPANEL_DATA_DIR
# - CAREPANEL_STORAGE_BACKEND
# - CAREPANEL_LOGIN_DELAY_MS
# - CAREPANEL_FETCH_DELAY_MS
# - CAREPANEL_LOG_LEVEL
# - CAREPANEL_LOG_FORMAT

[storage]
# Directory holding the session, account list and theme records
data_dir = "~/.local/share/carepanel"

# Backend: file (survives restarts) or memory (process only)
backend = "file"

[auth]
# Simulated login latency (ms)
login_delay_ms = 800

[dashboard]
# Simulated dashboard fetch latency (ms)
fetch_delay_ms = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
