//! Core timer data types for the focus session engine.
//!
//! This module defines the data structures used for:
//! - Timer phase and derived session status
//! - The timer state snapshot owned by the session engine

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerPhase
// ============================================================================

/// The kind of interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// A focus (work) interval
    #[default]
    Focus,
    /// A break between focus intervals
    Break,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Focus => "focus",
            TimerPhase::Break => "break",
        }
    }
}

// ============================================================================
// SessionStatus
// ============================================================================

/// Derived view of the timer: phase combined with the run flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Neither running nor paused
    Idle,
    /// Focus interval counting down
    FocusRunning,
    /// Focus interval paused
    FocusPaused,
    /// Break counting down
    BreakRunning,
    /// Break paused
    BreakPaused,
}

impl SessionStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::FocusRunning => "focus_running",
            SessionStatus::FocusPaused => "focus_paused",
            SessionStatus::BreakRunning => "break_running",
            SessionStatus::BreakPaused => "break_paused",
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Snapshot of the countdown timer.
///
/// The session engine owns the only mutable instance; everything handed out
/// (events, accessors) is a copy or a shared borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Current phase of the cycle
    pub phase: TimerPhase,
    /// Counting down
    pub running: bool,
    /// Halted mid-phase, waiting for resume
    pub paused: bool,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Length of the current phase, fixed when the phase begins
    pub total_seconds: u32,
    /// 1-based index of the current focus/break pair
    pub current_cycle: u32,
    /// Number of focus/break pairs in the plan
    pub total_cycles: u32,
}

impl TimerState {
    /// Creates an idle state at the start of a plan.
    pub fn new(focus_seconds: u32, total_cycles: u32) -> Self {
        let total_seconds = focus_seconds.max(1);
        Self {
            phase: TimerPhase::Focus,
            running: false,
            paused: false,
            remaining_seconds: total_seconds,
            total_seconds,
            current_cycle: 1,
            total_cycles: total_cycles.max(1),
        }
    }

    /// Returns the derived session status.
    pub fn status(&self) -> SessionStatus {
        match (self.phase, self.running, self.paused) {
            (TimerPhase::Focus, true, _) => SessionStatus::FocusRunning,
            (TimerPhase::Focus, false, true) => SessionStatus::FocusPaused,
            (TimerPhase::Break, true, _) => SessionStatus::BreakRunning,
            (TimerPhase::Break, false, true) => SessionStatus::BreakPaused,
            (_, false, false) => SessionStatus::Idle,
        }
    }

    /// Returns true if the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns true if the timer is neither running nor paused.
    pub fn is_idle(&self) -> bool {
        !self.running && !self.paused
    }

    /// Returns true if this is the last focus/break pair of the plan.
    pub fn is_last_cycle(&self) -> bool {
        self.current_cycle >= self.total_cycles
    }

    /// Loads a fresh phase without starting it.
    pub(crate) fn load_phase(&mut self, phase: TimerPhase, seconds: u32) {
        self.phase = phase;
        self.total_seconds = seconds.max(1);
        self.remaining_seconds = self.total_seconds;
        self.running = false;
        self.paused = false;
    }

    pub(crate) fn set_running(&mut self) {
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.total_seconds;
        }
        self.running = true;
        self.paused = false;
    }

    pub(crate) fn set_paused(&mut self) {
        self.running = false;
        self.paused = true;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the phase has reached zero.
    pub(crate) fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Elapsed seconds in the current phase.
    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.remaining_seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
