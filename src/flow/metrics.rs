//! Flow metrics record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scheduler::compute_flow_intensity;

// ============================================================================
// FlowIntensity
// ============================================================================

/// Coarse signal of how undistracted recent focus sessions have been.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowIntensity {
    /// Frequently interrupted or short sessions
    #[default]
    Low,
    /// Steady focus around the baseline length
    Medium,
    /// Long, uninterrupted sessions
    High,
}

impl FlowIntensity {
    /// Returns the string representation of the intensity.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowIntensity::Low => "low",
            FlowIntensity::Medium => "medium",
            FlowIntensity::High => "high",
        }
    }
}

impl std::fmt::Display for FlowIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FlowMetrics
// ============================================================================

/// Derived focus statistics, persisted as a single record.
///
/// `flow_intensity` is always a function of `consecutive_sessions`,
/// `distraction_count` and `average_session_length`; the counters it depends
/// on are only mutated through methods that recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowMetrics {
    /// Record identity, kept across resets
    pub id: Uuid,
    /// Focus sessions completed since the last daily reset
    consecutive_sessions: u32,
    /// Current streak counter
    pub current_streak: u32,
    /// Highest streak counter ever reached
    pub longest_streak: u32,
    /// Derived intensity
    flow_intensity: FlowIntensity,
    /// Pause/resume events since the last completed focus session
    distraction_count: u32,
    /// When the running focus session started
    pub session_start_timestamp: Option<DateTime<Utc>>,
    /// Lifetime focus minutes
    pub total_focus_minutes: u64,
    /// Two-sample moving average of session length, minutes
    average_session_length: f64,
    /// Longest single-session wall time, minutes
    pub best_flow_duration: f64,
    /// Local calendar day of the last completed focus session
    pub last_session_date: Option<NaiveDate>,
}

impl Default for FlowMetrics {
    fn default() -> Self {
        Self::with_id(Uuid::new_v4())
    }
}

impl FlowMetrics {
    /// Creates zeroed metrics with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates zeroed metrics for an existing identity.
    #[must_use]
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            consecutive_sessions: 0,
            current_streak: 0,
            longest_streak: 0,
            flow_intensity: FlowIntensity::Low,
            distraction_count: 0,
            session_start_timestamp: None,
            total_focus_minutes: 0,
            average_session_length: 0.0,
            best_flow_duration: 0.0,
            last_session_date: None,
        }
    }

    /// Focus sessions completed since the last daily reset.
    pub fn consecutive_sessions(&self) -> u32 {
        self.consecutive_sessions
    }

    /// Current flow intensity.
    pub fn flow_intensity(&self) -> FlowIntensity {
        self.flow_intensity
    }

    /// Distractions since the last completed focus session.
    pub fn distraction_count(&self) -> u32 {
        self.distraction_count
    }

    /// Moving average of session length in minutes.
    pub fn average_session_length(&self) -> f64 {
        self.average_session_length
    }

    /// Counts one distraction and recomputes intensity.
    pub fn record_distraction(&mut self) {
        self.distraction_count = self.distraction_count.saturating_add(1);
        self.recompute_intensity();
    }

    /// Zeroes the per-day counters.
    pub(crate) fn clear_daily_counters(&mut self) {
        self.consecutive_sessions = 0;
        self.distraction_count = 0;
        self.session_start_timestamp = None;
        self.recompute_intensity();
    }

    /// Counts a completed session and folds its length into the average.
    pub(crate) fn complete_session(&mut self, session_minutes: u32) {
        self.consecutive_sessions = self.consecutive_sessions.saturating_add(1);
        self.total_focus_minutes = self
            .total_focus_minutes
            .saturating_add(u64::from(session_minutes));
        self.average_session_length =
            (self.average_session_length + f64::from(session_minutes)) / 2.0;
        self.distraction_count = 0;
        self.recompute_intensity();
    }

    /// Restores flow intensity from the counters.
    pub fn recompute_intensity(&mut self) {
        self.flow_intensity = compute_flow_intensity(
            self.consecutive_sessions,
            self.distraction_count,
            self.average_session_length,
        );
    }

    /// Re-zeros every field except the identity.
    pub fn reset(&mut self) {
        *self = Self::with_id(self.id);
    }

    /// Overrides the intensity inputs. Used to seed fixtures.
    #[cfg(test)]
    pub(crate) fn seed(
        &mut self,
        consecutive_sessions: u32,
        distraction_count: u32,
        average_session_length: f64,
    ) {
        self.consecutive_sessions = consecutive_sessions;
        self.distraction_count = distraction_count;
        self.average_session_length = average_session_length;
        self.recompute_intensity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zeroed() {
        let metrics = FlowMetrics::new();
        assert_eq!(metrics.consecutive_sessions(), 0);
        assert_eq!(metrics.distraction_count(), 0);
        assert_eq!(metrics.flow_intensity(), FlowIntensity::Low);
        assert_eq!(metrics.total_focus_minutes, 0);
        assert!(metrics.last_session_date.is_none());
    }

    #[test]
    fn test_record_distraction_recomputes_intensity() {
        let mut metrics = FlowMetrics::new();
        metrics.seed(4, 0, 50.0);
        assert_eq!(metrics.flow_intensity(), FlowIntensity::High);

        // ratio 2/4 halves the score: (1 - 0.5) * 2.0 = 1.0
        metrics.record_distraction();
        metrics.record_distraction();
        assert_eq!(metrics.distraction_count(), 2);
        assert_eq!(metrics.flow_intensity(), FlowIntensity::Medium);
    }

    #[test]
    fn test_completed_session_recomputes_intensity() {
        let mut metrics = FlowMetrics::new();
        metrics.seed(1, 0, 50.0);
        metrics.record_distraction();
        assert_eq!(metrics.flow_intensity(), FlowIntensity::Low);

        metrics.complete_session(50);

        assert_eq!(metrics.consecutive_sessions(), 2);
        assert_eq!(metrics.distraction_count(), 0);
        assert_eq!(
            metrics.flow_intensity(),
            compute_flow_intensity(2, 0, metrics.average_session_length())
        );
        assert_eq!(metrics.flow_intensity(), FlowIntensity::High);
    }

    #[test]
    fn test_reset_keeps_identity() {
        let mut metrics = FlowMetrics::new();
        let id = metrics.id;
        metrics.current_streak = 7;
        metrics.total_focus_minutes = 300;
        metrics.record_distraction();

        metrics.reset();

        assert_eq!(metrics.id, id);
        assert_eq!(metrics, FlowMetrics::with_id(id));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let metrics = FlowMetrics::new();
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json.get("consecutiveSessions").is_some());
        assert!(json.get("flowIntensity").is_some());
        assert_eq!(json["flowIntensity"], "low");
    }

    #[test]
    fn test_missing_fields_default() {
        let metrics: FlowMetrics =
            serde_json::from_str(r#"{"currentStreak": 3, "totalFocusMinutes": 75}"#).unwrap();
        assert_eq!(metrics.current_streak, 3);
        assert_eq!(metrics.total_focus_minutes, 75);
        assert_eq!(metrics.distraction_count(), 0);
    }

    #[test]
    fn test_intensity_display() {
        assert_eq!(FlowIntensity::High.to_string(), "high");
    }
}
