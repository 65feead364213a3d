//! Focus session state machine.
//!
//! ```text
//!            start              toggle
//!   Idle ───────────▶ FocusRunning ◀──────▶ FocusPaused
//!    ▲                    │ complete (not last cycle)
//!    │ stop / reset /     ▼                  toggle
//!    │ last cycle    BreakRunning ◀──────▶ BreakPaused
//!    │                    │ complete
//!    └────────────────────┘ (auto-break: straight to FocusRunning)
//! ```
//!
//! Invalid transitions are ignored and reported as `false`; the engine is
//! driven by UI handlers that can race with rapid taps.

use std::future::Future;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::mpsc;

use crate::clock::Clock;
use crate::config::FocusConfig;
use crate::flow::{
    apply_daily_reset, compute_adaptive_session_length, record_completed_focus_session,
    FlowMetrics,
};
use crate::notification::{
    break_complete_content, focus_complete_content, plan_complete_content, NotificationContent,
};
use crate::persistence::DebouncedWriter;
use crate::storage::FlowMetricsRepository;
use crate::types::{SessionStatus, TimerPhase, TimerState};

use super::event::EngineEvent;

// ============================================================================
// SessionEngine
// ============================================================================

/// Owns the timer state and flow metrics and applies every transition.
pub struct SessionEngine {
    /// Countdown state
    state: TimerState,
    /// Shared flow statistics
    metrics: FlowMetrics,
    /// Plan configuration
    config: FocusConfig,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Event sender channel
    events: mpsc::UnboundedSender<EngineEvent>,
    /// Debounced metrics persistence
    writer: DebouncedWriter,
    /// Day the daily reset check last ran
    daily_checked_on: Option<NaiveDate>,
    /// Adaptive length for the next focus session, minutes
    suggested_focus_minutes: u32,
}

impl SessionEngine {
    /// Creates an engine around already loaded metrics.
    pub fn new(
        config: FocusConfig,
        metrics: FlowMetrics,
        writer: DebouncedWriter,
        clock: Arc<dyn Clock>,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        let suggested_focus_minutes = compute_adaptive_session_length(
            config.work_duration_minutes,
            metrics.flow_intensity(),
            metrics.consecutive_sessions(),
        );
        let mut engine = Self {
            state: TimerState::new(config.work_seconds(), config.total_cycles),
            metrics,
            config,
            clock,
            events,
            writer,
            daily_checked_on: None,
            suggested_focus_minutes,
        };
        let focus_seconds = engine.focus_seconds();
        engine.state.load_phase(TimerPhase::Focus, focus_seconds);
        engine
    }

    /// Loads metrics from `repository` and creates an idle engine.
    pub async fn open(
        config: FocusConfig,
        repository: FlowMetricsRepository,
        clock: Arc<dyn Clock>,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        let metrics = repository.load().await;
        tracing::debug!(
            backend = repository.backend(),
            intensity = %metrics.flow_intensity(),
            "flow metrics loaded"
        );
        let writer = DebouncedWriter::with_default_window(repository);
        Self::new(config, metrics, writer, clock, events)
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Starts the loaded focus phase from idle.
    ///
    /// Idle always means a focus phase is loaded: breaks start running as
    /// soon as they are loaded, and every way back to idle reloads focus.
    pub fn start(&mut self) -> bool {
        if !self.state.is_idle() {
            tracing::debug!(status = self.status().as_str(), "start ignored");
            return false;
        }
        self.check_daily_reset();

        self.begin_focus();
        self.emit_state();
        true
    }

    /// Pauses a running phase or resumes a paused one.
    ///
    /// Both directions count as a distraction.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_idle() {
            tracing::debug!("toggle ignored while idle");
            return false;
        }
        self.check_daily_reset();

        if self.state.is_running() {
            self.state.set_paused();
        } else {
            self.state.set_running();
        }
        self.metrics.record_distraction();
        tracing::debug!(
            status = self.status().as_str(),
            distractions = self.metrics.distraction_count(),
            intensity = %self.metrics.flow_intensity(),
            "distraction recorded"
        );
        self.emit(EngineEvent::Interruption);
        self.persist();
        self.emit_state();
        true
    }

    /// Abandons the plan and returns to idle.
    pub fn stop(&mut self) -> bool {
        if self.state.is_idle() {
            return false;
        }
        let phase = self.state.phase;
        let elapsed = self.state.elapsed_seconds();
        self.rewind();
        if self.metrics.session_start_timestamp.take().is_some() {
            self.persist();
        }
        tracing::debug!(phase = phase.as_str(), elapsed, "timer stopped");
        self.emit_state();
        true
    }

    /// Returns to idle at cycle 1 with durations taken from the current configuration.
    pub fn reset(&mut self) {
        self.rewind();
        if self.metrics.session_start_timestamp.take().is_some() {
            self.persist();
        }
        self.emit_state();
    }

    /// Advances the countdown by one second.
    ///
    /// Returns true if the tick completed the phase.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let finished = self.state.tick();
        if finished {
            self.complete_phase();
        } else {
            self.emit_state();
        }
        finished
    }

    /// Completes the running phase.
    pub fn complete_phase(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        match self.state.phase {
            TimerPhase::Focus => self.complete_focus(),
            TimerPhase::Break => self.complete_break(),
        }
        self.emit_state();
        true
    }

    fn complete_focus(&mut self) {
        let session_minutes = self.state.total_seconds / 60;
        let now = self.clock.now().with_timezone(&Utc);
        let elapsed_wall_minutes = self
            .metrics
            .session_start_timestamp
            .map(|started| (now - started).num_seconds().max(0) as f64 / 60.0)
            .unwrap_or_else(|| f64::from(session_minutes));

        record_completed_focus_session(
            &mut self.metrics,
            session_minutes,
            elapsed_wall_minutes,
            self.clock.today(),
        );
        self.suggested_focus_minutes = compute_adaptive_session_length(
            self.config.work_duration_minutes,
            self.metrics.flow_intensity(),
            self.metrics.consecutive_sessions(),
        );
        tracing::info!(
            minutes = session_minutes,
            streak = self.metrics.current_streak,
            intensity = %self.metrics.flow_intensity(),
            next_minutes = self.suggested_focus_minutes,
            "focus session completed"
        );
        self.emit(EngineEvent::FlowSessionCompleted {
            minutes: session_minutes,
        });

        if self.state.is_last_cycle() {
            let cycles = self.state.total_cycles;
            self.notify(plan_complete_content(cycles));
            self.rewind();
            self.emit(EngineEvent::PlanCompleted { cycles });
        } else {
            self.notify(focus_complete_content(
                session_minutes,
                self.config.break_duration_minutes,
            ));
            self.state
                .load_phase(TimerPhase::Break, self.config.break_seconds());
            self.state.set_running();
            self.emit(EngineEvent::BreakStarted);
        }
        self.persist();
    }

    fn complete_break(&mut self) {
        let break_minutes = self.state.total_seconds / 60;
        self.emit(EngineEvent::BreakCompleted {
            minutes: break_minutes,
        });

        if self.state.current_cycle < self.state.total_cycles {
            self.state.current_cycle += 1;
        }
        let auto_start = self.config.auto_break_enabled;
        self.notify(break_complete_content(self.state.current_cycle, auto_start));

        let focus_seconds = self.focus_seconds();
        self.state.load_phase(TimerPhase::Focus, focus_seconds);
        if auto_start {
            self.begin_focus();
        }
    }

    /// Runs the loaded focus phase and stamps its start.
    fn begin_focus(&mut self) {
        self.metrics.session_start_timestamp = Some(self.clock.now().with_timezone(&Utc));
        self.state.set_running();
        self.emit(EngineEvent::FlowSessionStarted);
        self.persist();
    }

    /// Idle at cycle 1 with a fresh focus phase.
    fn rewind(&mut self) {
        self.state.current_cycle = 1;
        self.state.total_cycles = self.config.total_cycles.max(1);
        let focus_seconds = self.focus_seconds();
        self.state.load_phase(TimerPhase::Focus, focus_seconds);
    }

    fn check_daily_reset(&mut self) {
        let today = self.clock.today();
        if self.daily_checked_on == Some(today) {
            return;
        }
        self.daily_checked_on = Some(today);
        if apply_daily_reset(&mut self.metrics, today) {
            self.persist();
        }
    }

    // ------------------------------------------------------------------------
    // Configuration and metrics
    // ------------------------------------------------------------------------

    /// Replaces the configuration.
    ///
    /// Applied immediately when the plan has not started; otherwise at the
    /// next stop, reset or plan completion.
    pub fn update_config(&mut self, config: FocusConfig) {
        self.config = config;
        let untouched = self.state.is_idle()
            && self.state.phase == TimerPhase::Focus
            && self.state.current_cycle == 1;
        if untouched {
            self.rewind();
            self.emit_state();
        }
    }

    /// Re-zeros the flow metrics, keeping their identity.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
        self.suggested_focus_minutes = compute_adaptive_session_length(
            self.config.work_duration_minutes,
            self.metrics.flow_intensity(),
            self.metrics.consecutive_sessions(),
        );
        tracing::info!("flow metrics reset");
        self.persist();
    }

    /// Writes pending metrics immediately.
    pub async fn flush(&mut self) {
        self.writer.flush().await;
    }

    /// Detaches the write of pending metrics from the engine.
    ///
    /// See [`DebouncedWriter::take_flush`]; lets a shared owner await the
    /// write without keeping the engine locked.
    pub fn take_flush(&mut self) -> impl Future<Output = ()> + Send + 'static {
        self.writer.take_flush()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Derived session status.
    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    /// Current flow metrics.
    pub fn metrics(&self) -> &FlowMetrics {
        &self.metrics
    }

    /// Active configuration.
    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Adaptive length for the next focus session, in minutes.
    pub fn suggested_focus_minutes(&self) -> u32 {
        self.suggested_focus_minutes
    }

    /// Length of the next focus phase in seconds.
    fn focus_seconds(&self) -> u32 {
        if self.config.adaptive_durations {
            self.suggested_focus_minutes.saturating_mul(60)
        } else {
            self.config.work_seconds()
        }
    }

    // ------------------------------------------------------------------------
    // Side effects
    // ------------------------------------------------------------------------

    fn persist(&mut self) {
        self.writer.schedule(self.metrics.clone());
    }

    fn notify(&self, content: NotificationContent) {
        if self.config.notifications_enabled {
            self.emit(EngineEvent::NotificationRequested {
                title: content.title,
                body: content.body,
            });
        }
    }

    fn emit_state(&self) {
        self.emit(EngineEvent::TimerStateChanged(self.state.clone()));
    }

    fn emit(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
