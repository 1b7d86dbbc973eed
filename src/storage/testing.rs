//! Failing backends for exercising degraded-mode behaviour in tests

use crate::storage::backend::{KeyValueBackend, MemoryBackend};
use crate::storage::error::{StoreError, StoreResult};
use std::sync::Arc;

fn quota_exceeded() -> StoreError {
    StoreError::Unavailable("quota exceeded".to_string())
}

/// Refuses every operation, like storage in a locked-down browser profile
pub struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(quota_exceeded())
    }

    fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(quota_exceeded())
    }

    fn remove_item(&self, _key: &str) -> StoreResult<()> {
        Err(quota_exceeded())
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

/// Serves reads from `inner` but refuses writes and removals
pub struct ReadOnlyBackend {
    pub inner: Arc<MemoryBackend>,
}

impl KeyValueBackend for ReadOnlyBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(quota_exceeded())
    }

    fn remove_item(&self, _key: &str) -> StoreResult<()> {
        Err(quota_exceeded())
    }

    fn name(&self) -> &'static str {
        "read-only"
    }
}

/// Refuses reads but passes writes and removals through to `inner`
pub struct WriteOnlyBackend {
    pub inner: Arc<MemoryBackend>,
}

impl KeyValueBackend for WriteOnlyBackend {
    fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(quota_exceeded())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.inner.remove_item(key)
    }

    fn name(&self) -> &'static str {
        "write-only"
    }
}
