//! Persistence port for flow metrics.
//!
//! The engine only needs an async key-value contract ([`KeyValueStore`]).
//! One adapter is picked at construction time:
//!
//! ```text
//! ┌───────────────────────┐
//! │ FlowMetricsRepository │  fixed key "flow_metrics", JSON encoding
//! └───────────┬───────────┘
//!             ▼
//! ┌───────────────────────┐     ┌─────────────┐
//! │   dyn KeyValueStore   │────▶│ MemoryStore │
//! │                       │────▶│ FileStore   │
//! │                       │────▶│ MirroredStore (local + remote)
//! └───────────────────────┘     └─────────────┘
//! ```

mod error;
mod file;
mod memory;
mod mirrored;
mod repository;

use async_trait::async_trait;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use mirrored::MirroredStore;
pub use repository::{FlowMetricsRepository, FLOW_METRICS_KEY};

/// Async key-value storage backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Short adapter name for logs.
    fn name(&self) -> &str;
}
