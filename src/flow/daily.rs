//! Calendar-day reset of per-day flow counters.

use chrono::NaiveDate;

use super::metrics::FlowMetrics;

/// Returns true if `metrics` still carries counters from an earlier day.
///
/// Metrics with no completed session yet count as stale: there is nothing to
/// carry over.
pub fn needs_daily_reset(metrics: &FlowMetrics, today: NaiveDate) -> bool {
    metrics.last_session_date != Some(today)
}

/// Clears the per-day counters when the last session was not today.
///
/// Zeroes `consecutive_sessions` and `distraction_count` and drops any
/// session start timestamp. Streaks and lifetime totals are left alone.
/// Returns true if anything was reset.
pub fn apply_daily_reset(metrics: &mut FlowMetrics, today: NaiveDate) -> bool {
    if !needs_daily_reset(metrics, today) {
        return false;
    }
    tracing::debug!(
        last_session = ?metrics.last_session_date,
        %today,
        "resetting daily flow counters"
    );
    metrics.clear_daily_counters();
    true
}
