//! Local store with best-effort remote mirroring.

use std::sync::Arc;

use async_trait::async_trait;

use super::{KeyValueStore, StorageError};

/// Writes to a local primary and mirrors to a remote secondary.
///
/// The local store is authoritative: its failures propagate. Remote
/// failures are logged and swallowed. Reads fall back to the remote only
/// when the local store has no value.
pub struct MirroredStore {
    local: Arc<dyn KeyValueStore>,
    remote: Arc<dyn KeyValueStore>,
}

impl MirroredStore {
    pub fn new(local: Arc<dyn KeyValueStore>, remote: Arc<dyn KeyValueStore>) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl KeyValueStore for MirroredStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(value) = self.local.get(key).await? {
            return Ok(Some(value));
        }
        match self.remote.get(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(backend = self.remote.name(), "remote read failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.local.put(key, value).await?;
        if let Err(e) = self.remote.put(key, value).await {
            tracing::warn!(backend = self.remote.name(), "remote mirror failed: {}", e);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mirrored"
    }
}
