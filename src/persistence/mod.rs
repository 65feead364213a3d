//! Debounced, failure-tolerant persistence of flow metrics.
//!
//! Every metrics mutation hands a snapshot to [`DebouncedWriter::schedule`].
//! Only the last snapshot of a burst is written, once the quiet window has
//! passed without another mutation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::flow::FlowMetrics;
use crate::storage::FlowMetricsRepository;

/// Quiet period that must follow the last mutation before a write.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_secs(1);

/// A scheduled write that has not been superseded.
struct PendingWrite {
    /// Cancels the write while it is still waiting out the quiet window.
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Coalesces metrics writes to the persistence port.
///
/// Each `schedule` replaces the pending task. A superseded task gives up if
/// it is still waiting; a write that already started is never interrupted.
/// All writes queue on one gate in the order their quiet window ended, so an
/// older snapshot can never land after a newer one, even when a slow write
/// outlives the task that replaced it.
pub struct DebouncedWriter {
    repository: FlowMetricsRepository,
    quiet_window: Duration,
    /// Held for the duration of every store write; FIFO.
    gate: Arc<Mutex<()>>,
    pending: Option<PendingWrite>,
    latest: Option<FlowMetrics>,
}

impl DebouncedWriter {
    /// Creates a writer with the given quiet window.
    pub fn new(repository: FlowMetricsRepository, quiet_window: Duration) -> Self {
        Self {
            repository,
            quiet_window,
            gate: Arc::new(Mutex::new(())),
            pending: None,
            latest: None,
        }
    }

    /// Creates a writer with the default one second quiet window.
    pub fn with_default_window(repository: FlowMetricsRepository) -> Self {
        Self::new(repository, DEFAULT_QUIET_WINDOW)
    }

    /// Returns true if a scheduled write has not finished yet.
    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Schedules `snapshot` to be written after the quiet window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, snapshot: FlowMetrics) {
        self.cancel_pending();

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let repository = self.repository.clone();
        let gate = Arc::clone(&self.gate);
        let quiet_window = self.quiet_window;
        self.latest = Some(snapshot.clone());

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;

                Ok(()) = cancel_rx => {
                    tracing::trace!("metrics write superseded");
                    return;
                }
                _ = tokio::time::sleep(quiet_window) => {}
            }
            write(&gate, &repository, &snapshot).await;
        });

        self.pending = Some(PendingWrite {
            cancel: cancel_tx,
            handle,
        });
    }

    /// Writes the latest scheduled snapshot now, skipping the quiet window.
    ///
    /// Waits for any write already in progress first.
    pub async fn flush(&mut self) {
        self.take_flush().await;
    }

    /// Detaches the flush of the latest snapshot from this writer.
    ///
    /// The pending task is cancelled at once; the returned future performs
    /// the write behind any write already in progress. It borrows nothing,
    /// so the caller may release whatever guards the writer before awaiting.
    pub fn take_flush(&mut self) -> impl Future<Output = ()> + Send + 'static {
        if self.has_pending() {
            tracing::debug!("flushing flow metrics ahead of the quiet window");
        }
        self.cancel_pending();
        let snapshot = self.latest.take();
        let repository = self.repository.clone();
        let gate = Arc::clone(&self.gate);

        async move {
            if let Some(snapshot) = snapshot {
                write(&gate, &repository, &snapshot).await;
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            // The task may already be writing; then the signal is ignored.
            let _ = pending.cancel.send(());
        }
    }
}

async fn write(gate: &Mutex<()>, repository: &FlowMetricsRepository, snapshot: &FlowMetrics) {
    let _writing = gate.lock().await;
    match repository.save(snapshot).await {
        Ok(()) => tracing::debug!(backend = repository.backend(), "flow metrics saved"),
        Err(e) if e.is_transient() => tracing::warn!(
            backend = repository.backend(),
            "failed to save flow metrics, will retry on next change: {}",
            e
        ),
        Err(e) => tracing::error!(
            backend = repository.backend(),
            "flow metrics could not be encoded, snapshot dropped: {}",
            e
        ),
    }
}
