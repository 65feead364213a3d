//! Shared handle to a running [`SessionEngine`].
//!
//! UI handlers, the one-second ticker and the shutdown path all hold clones
//! of the same [`EngineHandle`]. Every operation goes through a single async
//! mutex, so transitions never interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::config::FocusConfig;
use crate::flow::FlowMetrics;
use crate::types::TimerState;

use super::session::SessionEngine;

/// Cloneable, thread-safe access to one engine.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<Mutex<SessionEngine>>,
    /// Set while a toggle is queued for or holding the engine
    toggling: Arc<AtomicBool>,
}

/// Clears the toggle flag when the toggle finishes or is dropped.
struct ToggleInFlight<'a>(&'a AtomicBool);

impl Drop for ToggleInFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EngineHandle {
    /// Wraps `engine` for shared use.
    pub fn new(engine: SessionEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            toggling: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the current phase from idle.
    pub async fn start(&self) -> bool {
        self.engine.lock().await.start()
    }

    /// Pauses or resumes the running phase.
    ///
    /// A tap that arrives while an earlier toggle is still in flight is
    /// dropped and returns false, so a double tap cannot record two
    /// distractions. Other operations holding the engine, such as a tick,
    /// only delay the toggle.
    pub async fn toggle(&self) -> bool {
        if self.toggling.swap(true, Ordering::AcqRel) {
            tracing::debug!("toggle dropped, another toggle in flight");
            return false;
        }
        let _in_flight = ToggleInFlight(&self.toggling);
        self.engine.lock().await.toggle()
    }

    /// Abandons the plan and returns to idle.
    pub async fn stop(&self) -> bool {
        self.engine.lock().await.stop()
    }

    /// Returns to idle at cycle 1.
    pub async fn reset(&self) {
        self.engine.lock().await.reset();
    }

    /// Re-zeros the flow metrics.
    pub async fn reset_metrics(&self) {
        self.engine.lock().await.reset_metrics();
    }

    /// Replaces the configuration.
    pub async fn update_config(&self, config: FocusConfig) {
        self.engine.lock().await.update_config(config);
    }

    /// Advances the countdown by one second.
    pub async fn tick(&self) -> bool {
        self.engine.lock().await.tick()
    }

    /// Copy of the current timer state.
    pub async fn snapshot(&self) -> TimerState {
        self.engine.lock().await.state().clone()
    }

    /// Copy of the current flow metrics.
    pub async fn metrics(&self) -> FlowMetrics {
        self.engine.lock().await.metrics().clone()
    }

    /// Adaptive length for the next focus session, in minutes.
    pub async fn suggested_focus_minutes(&self) -> u32 {
        self.engine.lock().await.suggested_focus_minutes()
    }

    /// Drives the countdown once per second until the task is dropped.
    pub async fn run_ticker(&self) {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.engine.lock().await.tick();
        }
    }

    /// Spawns [`run_ticker`](Self::run_ticker) on the current runtime.
    pub fn spawn_ticker(&self) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move { handle.run_ticker().await })
    }

    /// Writes pending metrics before the process exits.
    ///
    /// The engine stays usable through other handles while the write runs.
    pub async fn shutdown(&self) {
        let flush = self.engine.lock().await.take_flush();
        flush.await;
        tracing::debug!("engine shut down");
    }
}
