//! Flow metrics load/save over a key-value store.

use std::sync::Arc;

use crate::flow::FlowMetrics;

use super::{KeyValueStore, StorageError};

/// Singleton key the metrics record is stored under.
pub const FLOW_METRICS_KEY: &str = "flow_metrics";

/// Loads and saves the [`FlowMetrics`] record.
#[derive(Clone)]
pub struct FlowMetricsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FlowMetricsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Name of the underlying adapter.
    pub fn backend(&self) -> &str {
        self.store.name()
    }

    /// Loads the stored metrics.
    ///
    /// Never fails: a missing record, a corrupt payload or an unreachable
    /// backend all yield zeroed metrics. Derived fields are recomputed so a
    /// stale stored intensity cannot leak in.
    pub async fn load(&self) -> FlowMetrics {
        match self.try_load().await {
            Ok(Some(metrics)) => metrics,
            Ok(None) => {
                tracing::debug!(backend = self.backend(), "no stored flow metrics, using defaults");
                FlowMetrics::new()
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend(),
                    "failed to load flow metrics, using defaults: {}",
                    e
                );
                FlowMetrics::new()
            }
        }
    }

    /// Loads the stored metrics, reporting backend and decoding failures.
    ///
    /// Returns `Ok(None)` if no record has been written yet.
    pub async fn try_load(&self) -> Result<Option<FlowMetrics>, StorageError> {
        let Some(raw) = self.store.get(FLOW_METRICS_KEY).await? else {
            return Ok(None);
        };
        let mut metrics: FlowMetrics = serde_json::from_str(&raw)?;
        metrics.recompute_intensity();
        Ok(Some(metrics))
    }

    /// Upserts the metrics record.
    pub async fn save(&self, metrics: &FlowMetrics) -> Result<(), StorageError> {
        let json = serde_json::to_string(metrics)?;
        self.store.put(FLOW_METRICS_KEY, &json).await
    }

    /// Re-zeros the stored record, keeping its identity.
    ///
    /// An unreachable backend is an error, since the identity cannot be
    /// read. A missing or corrupt record is replaced by a fresh one.
    pub async fn reset(&self) -> Result<FlowMetrics, StorageError> {
        let mut metrics = match self.try_load().await {
            Ok(Some(metrics)) => metrics,
            Ok(None) => FlowMetrics::new(),
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(
                    backend = self.backend(),
                    "replacing corrupt flow metrics: {}",
                    e
                );
                FlowMetrics::new()
            }
            Err(e) => return Err(e),
        };
        metrics.reset();
        self.save(&metrics).await?;
        Ok(metrics)
    }
}
