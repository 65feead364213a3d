//! Events emitted by the session engine.

use crate::types::TimerState;

/// Statistics, notification and mirroring events for collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A focus interval started counting down
    FlowSessionStarted,
    /// A focus interval ran to completion
    FlowSessionCompleted {
        /// Planned length of the session
        minutes: u32,
    },
    /// A break started counting down
    BreakStarted,
    /// A break ran to completion
    BreakCompleted {
        /// Planned length of the break
        minutes: u32,
    },
    /// The timer was paused or resumed mid-phase
    Interruption,
    /// The last cycle of the plan finished
    PlanCompleted {
        /// Cycles in the finished plan
        cycles: u32,
    },
    /// A user-facing notification should be delivered
    NotificationRequested {
        /// Notification title
        title: String,
        /// Notification body
        body: String,
    },
    /// Timer state after any change, for widgets and UI mirroring
    TimerStateChanged(TimerState),
}

impl EngineEvent {
    /// Returns true for the per-change state mirror event.
    pub fn is_state_change(&self) -> bool {
        matches!(self, EngineEvent::TimerStateChanged(_))
    }
}
