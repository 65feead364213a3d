//! End-to-end scenarios for the session engine.
//!
//! These tests drive `SessionEngine` through its public API only:
//! - Complete multi-cycle plans
//! - Reset/start and idle no-op behaviour
//! - Daily reset and streaks across calendar days
//! - Persistence round trips and backend failures

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use tokio::sync::mpsc;

use flowfocus::clock::ManualClock;
use flowfocus::config::FocusConfig;
use flowfocus::engine::{EngineEvent, SessionEngine};
use flowfocus::flow::{compute_flow_intensity, record_completed_focus_session, FlowMetrics};
use flowfocus::persistence::DebouncedWriter;
use flowfocus::storage::{FileStore, FlowMetricsRepository, MemoryStore};
use flowfocus::types::{SessionStatus, TimerPhase};

// ============================================================================
// Test Helpers
// ============================================================================

fn monday_morning() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
}

struct Scenario {
    engine: SessionEngine,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    clock: Arc<ManualClock>,
}

impl Scenario {
    fn new(config: FocusConfig, metrics: FlowMetrics, repository: FlowMetricsRepository) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let clock = Arc::new(ManualClock::new(monday_morning()));
        let writer = DebouncedWriter::with_default_window(repository);
        let engine = SessionEngine::new(config, metrics, writer, clock.clone(), tx);
        Self {
            engine,
            events,
            clock,
        }
    }

    fn in_memory(config: FocusConfig) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let scenario = Self::new(
            config,
            FlowMetrics::new(),
            FlowMetricsRepository::new(store.clone()),
        );
        (scenario, store)
    }

    /// Ticks until the running phase completes, advancing the clock with it.
    fn finish_phase(&mut self) {
        assert!(self.engine.state().is_running(), "phase is not running");
        loop {
            self.clock.advance(Duration::seconds(1));
            if self.engine.tick() {
                break;
            }
        }
    }

    fn milestones(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if !event.is_state_change() && !matches!(event, EngineEvent::NotificationRequested { .. }) {
                events.push(event);
            }
        }
        events
    }
}

// ============================================================================
// Full plans
// ============================================================================

#[tokio::test]
async fn test_four_cycle_plan_accumulates_one_hundred_minutes() {
    let (mut s, _) = Scenario::in_memory(FocusConfig::default());

    for cycle in 1..=4 {
        assert_eq!(s.engine.state().current_cycle, cycle);
        assert!(s.engine.start());
        s.finish_phase();
        if cycle < 4 {
            assert_eq!(s.engine.status(), SessionStatus::BreakRunning);
            s.finish_phase();
            assert_eq!(s.engine.status(), SessionStatus::Idle);
        }
    }

    let state = s.engine.state();
    assert_eq!(state.current_cycle, 1);
    assert_eq!(state.phase, TimerPhase::Focus);
    assert_eq!(s.engine.status(), SessionStatus::Idle);

    let metrics = s.engine.metrics();
    assert_eq!(metrics.total_focus_minutes, 100);
    assert_eq!(metrics.consecutive_sessions(), 4);
    assert_eq!(metrics.current_streak, 4);
    assert_eq!(metrics.best_flow_duration, 25.0);

    let events = s.milestones();
    assert_eq!(
        events.iter().filter(|e| matches!(e, EngineEvent::FlowSessionCompleted { minutes: 25 })).count(),
        4
    );
    assert_eq!(
        events.iter().filter(|e| matches!(e, EngineEvent::BreakCompleted { minutes: 5 })).count(),
        3
    );
    assert_eq!(events.last(), Some(&EngineEvent::PlanCompleted { cycles: 4 }));
}

#[tokio::test]
async fn test_auto_break_plan_needs_a_single_start() {
    let config = FocusConfig {
        auto_break_enabled: true,
        ..FocusConfig::default()
            .with_work_minutes(2)
            .with_break_minutes(1)
            .with_total_cycles(3)
    };
    let (mut s, _) = Scenario::in_memory(config);

    assert!(s.engine.start());
    // focus, break, focus, break, focus
    for _ in 0..5 {
        s.finish_phase();
    }

    assert_eq!(s.engine.status(), SessionStatus::Idle);
    assert_eq!(s.engine.metrics().total_focus_minutes, 6);
    assert!(s.milestones().contains(&EngineEvent::PlanCompleted { cycles: 3 }));
}

// ============================================================================
// Reset, start and no-ops
// ============================================================================

#[tokio::test]
async fn test_reset_then_start_from_any_state() {
    let (mut s, _) = Scenario::in_memory(FocusConfig::default().with_work_minutes(30));

    // Mid-focus
    s.engine.start();
    s.engine.tick();
    s.engine.reset();
    assert!(s.engine.start());
    assert_eq!(s.engine.state().remaining_seconds, 1800);
    assert_eq!(s.engine.state().current_cycle, 1);

    // Paused during a break
    s.finish_phase();
    s.engine.toggle();
    assert_eq!(s.engine.status(), SessionStatus::BreakPaused);
    s.engine.reset();
    assert!(s.engine.start());
    let state = s.engine.state();
    assert_eq!(state.phase, TimerPhase::Focus);
    assert_eq!(state.remaining_seconds, 1800);
    assert_eq!(state.total_seconds, 1800);
    assert_eq!(s.engine.status(), SessionStatus::FocusRunning);
}

#[tokio::test]
async fn test_toggle_while_idle_changes_nothing() {
    let (mut s, store) = Scenario::in_memory(FocusConfig::default());
    let before_state = s.engine.state().clone();
    let before_metrics = s.engine.metrics().clone();

    assert!(!s.engine.toggle());
    assert!(!s.engine.toggle());
    s.engine.flush().await;

    assert_eq!(s.engine.state(), &before_state);
    assert_eq!(s.engine.metrics(), &before_metrics);
    assert!(s.milestones().is_empty());
    assert_eq!(store.write_count(), 0);
}

// ============================================================================
// Flow metrics
// ============================================================================

#[tokio::test]
async fn test_distractions_then_completion() {
    let (mut s, _) = Scenario::in_memory(FocusConfig::default());
    s.engine.start();

    for _ in 0..6 {
        s.engine.toggle();
    }
    assert_eq!(s.engine.metrics().distraction_count(), 6);
    assert_eq!(
        s.milestones()
            .iter()
            .filter(|e| **e == EngineEvent::Interruption)
            .count(),
        6
    );

    s.finish_phase();

    let metrics = s.engine.metrics();
    assert_eq!(metrics.distraction_count(), 0);
    assert_eq!(
        metrics.flow_intensity(),
        compute_flow_intensity(
            metrics.consecutive_sessions(),
            0,
            metrics.average_session_length()
        )
    );
}

#[tokio::test]
async fn test_session_from_yesterday_triggers_daily_reset() {
    let yesterday = monday_morning().date_naive().pred_opt().unwrap();
    let mut metrics = FlowMetrics::new();
    for _ in 0..3 {
        record_completed_focus_session(&mut metrics, 25, 25.0, yesterday);
    }
    metrics.record_distraction();
    let store = Arc::new(MemoryStore::new());
    let mut s = Scenario::new(
        FocusConfig::default(),
        metrics,
        FlowMetricsRepository::new(store),
    );

    s.engine.start();

    let metrics = s.engine.metrics();
    assert_eq!(metrics.consecutive_sessions(), 0);
    assert_eq!(metrics.distraction_count(), 0);
    assert_eq!(metrics.current_streak, 3);
    assert_eq!(metrics.total_focus_minutes, 75);
}

#[tokio::test]
async fn test_streak_survives_consecutive_days_and_breaks_after_gap() {
    let (mut s, _) = Scenario::in_memory(FocusConfig::default().with_total_cycles(1));

    // Monday and Tuesday
    for _ in 0..2 {
        s.engine.start();
        s.finish_phase();
        s.clock.advance(Duration::days(1));
    }
    assert_eq!(s.engine.metrics().current_streak, 2);

    // Skip Wednesday, back on Thursday
    s.clock.advance(Duration::days(1));
    s.engine.start();
    s.finish_phase();

    let metrics = s.engine.metrics();
    assert_eq!(metrics.current_streak, 1);
    assert_eq!(metrics.longest_streak, 2);
    assert_eq!(metrics.consecutive_sessions(), 1);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_metrics_round_trip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let repository = FlowMetricsRepository::new(Arc::new(FileStore::new(dir.path())));

    let (tx, _rx) = mpsc::unbounded_channel();
    let clock = Arc::new(ManualClock::new(monday_morning()));
    let mut engine = SessionEngine::open(
        FocusConfig::default().with_work_minutes(1),
        repository.clone(),
        clock.clone(),
        tx,
    )
    .await;
    engine.start();
    engine.toggle();
    engine.toggle();
    while !engine.tick() {}
    engine.flush().await;
    let saved = engine.metrics().clone();

    let (tx, _rx) = mpsc::unbounded_channel();
    let reopened = SessionEngine::open(FocusConfig::default(), repository, clock, tx).await;

    assert_eq!(reopened.metrics(), &saved);
    assert_eq!(reopened.metrics().total_focus_minutes, 1);
}

#[tokio::test]
async fn test_failing_backend_never_interrupts_the_timer() {
    let (mut s, store) = Scenario::in_memory(
        FocusConfig::default()
            .with_work_minutes(1)
            .with_break_minutes(1)
            .with_total_cycles(2),
    );
    store.set_should_fail(true);

    assert!(s.engine.start());
    assert!(s.engine.toggle());
    assert!(s.engine.toggle());
    s.finish_phase();
    s.finish_phase();
    assert!(s.engine.start());
    s.finish_phase();
    s.engine.flush().await;

    assert_eq!(s.engine.status(), SessionStatus::Idle);
    assert_eq!(s.engine.metrics().total_focus_minutes, 2);
    assert_eq!(store.write_count(), 0);

    // The next change after recovery persists the full picture.
    store.set_should_fail(false);
    s.engine.reset_metrics();
    s.engine.flush().await;
    assert_eq!(store.write_count(), 1);
}
