//! Persistent Session Store
//!
//! Loads and saves the current-session record and the registered-account list
//! on top of a [`KeyValueBackend`].
//!
//! None of the public operations fail:
//! - missing or malformed records are treated as absent and replaced by defaults
//! - a record the backend cannot decode is removed and treated as absent
//! - a failing backend switches the store into degraded mode. Every write still
//!   goes to the backend first; values it refuses are kept in an in-memory
//!   overlay that shadows the backend for the rest of the process lifetime

use crate::storage::backend::KeyValueBackend;
use crate::storage::error::StoreError;
use crate::storage::types::{default_accounts, Account, RegisteredAccount};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Key holding the JSON list of registered accounts (passwords included)
pub const ACCOUNTS_KEY: &str = "healthcare_users";

/// Key holding the JSON current-session account (no password)
pub const SESSION_KEY: &str = "healthcare_user";

/// Session and account persistence over a key-value backend
pub struct SessionStore {
    backend: Arc<dyn KeyValueBackend>,
    /// Writes the backend refused. `None` marks a removed key.
    overlay: Mutex<HashMap<String, Option<String>>>,
    degraded: AtomicBool,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            overlay: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether the store has fallen back to in-memory persistence
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Registered accounts, or the seeded default admin if none are persisted
    pub fn load_accounts(&self) -> Vec<RegisteredAccount> {
        let Some(raw) = self.read_item(ACCOUNTS_KEY) else {
            tracing::debug!("No persisted accounts, seeding default admin");
            return default_accounts();
        };

        let accounts = parse_accounts(&raw);
        if accounts.is_empty() {
            tracing::warn!(key = ACCOUNTS_KEY, "No valid persisted accounts, seeding default admin");
            return default_accounts();
        }

        tracing::debug!(count = accounts.len(), "Loaded persisted accounts");
        accounts
    }

    /// Overwrite the persisted account list
    pub fn save_accounts(&self, accounts: &[RegisteredAccount]) {
        match serde_json::to_string(accounts) {
            Ok(json) => {
                self.write_item(ACCOUNTS_KEY, &json);
                tracing::debug!(count = accounts.len(), "Saved account list");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode account list");
            }
        }
    }

    /// The persisted current-session account, if any
    pub fn load_current_session(&self) -> Option<Account> {
        let raw = self.read_item(SESSION_KEY)?;

        match serde_json::from_str::<Account>(&raw) {
            Ok(account) => Some(account),
            Err(e) => {
                tracing::warn!(
                    key = SESSION_KEY,
                    error = %e,
                    "Discarding malformed session record"
                );
                self.remove_item(SESSION_KEY);
                None
            }
        }
    }

    /// Persist the current-session account
    pub fn save_current_session(&self, account: &Account) {
        match serde_json::to_string(account) {
            Ok(json) => {
                self.write_item(SESSION_KEY, &json);
                tracing::debug!(email = %account.email, "Saved session");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode session record");
            }
        }
    }

    /// Remove the persisted current-session account
    pub fn clear_current_session(&self) {
        self.remove_item(SESSION_KEY);
        tracing::debug!("Cleared session");
    }

    /// Read a raw value. An overlay entry shadows the backend.
    pub fn read_item(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.overlay_lock().get(key) {
            return entry.clone();
        }

        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(StoreError::Corrupt(reason)) => {
                tracing::warn!(key = %key, reason = %reason, "Discarding unreadable record");
                self.remove_item(key);
                None
            }
            Err(e) => {
                self.degrade(key, &e);
                None
            }
        }
    }

    /// Write a raw value, keeping it in the overlay if the backend refuses
    pub fn write_item(&self, key: &str, value: &str) {
        match self.backend.set_item(key, value) {
            Ok(()) => {
                self.overlay_lock().remove(key);
            }
            Err(e) => {
                self.degrade(key, &e);
                self.overlay_lock()
                    .insert(key.to_string(), Some(value.to_string()));
            }
        }
    }

    /// Remove a raw value, recording the removal in the overlay if the backend refuses
    pub fn remove_item(&self, key: &str) {
        match self.backend.remove_item(key) {
            Ok(()) => {
                self.overlay_lock().remove(key);
            }
            Err(e) => {
                self.degrade(key, &e);
                self.overlay_lock().insert(key.to_string(), None);
            }
        }
    }

    fn degrade(&self, key: &str, error: &StoreError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            tracing::warn!(
                backend = self.backend.name(),
                key = %key,
                error = %error,
                "Storage unavailable, continuing with in-memory session only"
            );
        }
    }

    fn overlay_lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Option<String>>> {
        self.overlay.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Validate each persisted entry against the account schema, dropping invalid ones
fn parse_accounts(raw: &str) -> Vec<RegisteredAccount> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = ACCOUNTS_KEY, error = %e, "Malformed account list");
            return Vec::new();
        }
    };

    let serde_json::Value::Array(entries) = value else {
        tracing::warn!(key = ACCOUNTS_KEY, "Account list is not a JSON array");
        return Vec::new();
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<RegisteredAccount>(entry) {
                Ok(account) => Some(account),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Dropping invalid persisted account");
                    None
                }
            }
        })
        .collect()
}
