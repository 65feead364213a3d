//! Adaptive scheduling rules.
//!
//! Pure functions over [`FlowMetrics`]: flow intensity scoring, the next
//! session length, and the bookkeeping for a completed focus session.

use chrono::NaiveDate;

use super::metrics::{FlowIntensity, FlowMetrics};

/// Session length the length score is normalised against, in minutes.
pub const BASELINE_SESSION_MINUTES: f64 = 25.0;

/// Cap on the normalised length score.
const MAX_LENGTH_SCORE: f64 = 2.0;

/// Flow score above which intensity is High.
const HIGH_THRESHOLD: f64 = 1.5;

/// Flow score above which intensity is Medium.
const MEDIUM_THRESHOLD: f64 = 0.8;

/// Scores recent focus quality.
///
/// ```
/// use flowfocus::flow::{compute_flow_intensity, FlowIntensity};
///
/// assert_eq!(compute_flow_intensity(10, 0, 25.0), FlowIntensity::Medium);
/// ```
pub fn compute_flow_intensity(
    consecutive_sessions: u32,
    distraction_count: u32,
    average_session_length: f64,
) -> FlowIntensity {
    let distraction_ratio = f64::from(distraction_count) / f64::from(consecutive_sessions.max(1));
    let session_length_score =
        (average_session_length / BASELINE_SESSION_MINUTES).min(MAX_LENGTH_SCORE);
    let flow_score = (1.0 - distraction_ratio) * session_length_score;

    if flow_score > HIGH_THRESHOLD {
        FlowIntensity::High
    } else if flow_score > MEDIUM_THRESHOLD {
        FlowIntensity::Medium
    } else {
        FlowIntensity::Low
    }
}

/// Next focus session length in minutes.
///
/// High intensity stretches sessions up to 90 minutes, Medium up to 60,
/// Low shortens them by five minutes with a 15 minute floor.
pub fn compute_adaptive_session_length(
    base_minutes: u32,
    intensity: FlowIntensity,
    consecutive_sessions: u32,
) -> u32 {
    match intensity {
        FlowIntensity::High => base_minutes
            .saturating_add(consecutive_sessions.saturating_mul(5))
            .min(90),
        FlowIntensity::Medium => base_minutes
            .saturating_add(consecutive_sessions.saturating_mul(2))
            .min(60),
        FlowIntensity::Low => base_minutes.saturating_sub(5).max(15),
    }
}

/// Updates `metrics` for a focus session that ran to completion.
///
/// The streak counter grows with every completed session, including
/// several on the same day. A gap of more than one calendar day since the
/// last session restarts it at 1.
pub fn record_completed_focus_session(
    metrics: &mut FlowMetrics,
    session_duration_minutes: u32,
    elapsed_wall_minutes: f64,
    today: NaiveDate,
) {
    let streak_broken = metrics
        .last_session_date
        .and_then(|last| today.signed_duration_since(last).num_days().checked_sub(1))
        .is_some_and(|gap| gap > 0);
    metrics.current_streak = if streak_broken {
        1
    } else {
        metrics.current_streak.saturating_add(1)
    };
    metrics.longest_streak = metrics.longest_streak.max(metrics.current_streak);

    metrics.complete_session(session_duration_minutes);
    metrics.best_flow_duration = metrics.best_flow_duration.max(elapsed_wall_minutes);
    metrics.session_start_timestamp = None;
    metrics.last_session_date = Some(today);

    metrics.recompute_intensity();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    mod intensity_tests {
        use super::*;

        #[test]
        fn test_regression_ten_sessions_baseline_length_is_medium() {
            assert_eq!(compute_flow_intensity(10, 0, 25.0), FlowIntensity::Medium);
        }

        #[test]
        fn test_long_undistracted_sessions_are_high() {
            assert_eq!(compute_flow_intensity(3, 0, 45.0), FlowIntensity::High);
        }

        #[test]
        fn test_length_score_is_capped() {
            // 200 minutes caps at 2.0; one distraction in four sessions
            // leaves 0.75 * 2.0 = 1.5, which is not above the High threshold.
            assert_eq!(compute_flow_intensity(4, 1, 200.0), FlowIntensity::Medium);
        }

        #[test]
        fn test_zero_sessions_uses_one_as_divisor() {
            assert_eq!(compute_flow_intensity(0, 1, 50.0), FlowIntensity::Low);
            assert_eq!(compute_flow_intensity(0, 0, 50.0), FlowIntensity::High);
        }

        #[test]
        fn test_more_distractions_than_sessions_is_low() {
            assert_eq!(compute_flow_intensity(1, 3, 90.0), FlowIntensity::Low);
        }

        #[test]
        fn test_thresholds_are_exclusive() {
            // score exactly 0.8
            assert_eq!(compute_flow_intensity(1, 0, 20.0), FlowIntensity::Low);
            // score just above 0.8
            assert_eq!(compute_flow_intensity(1, 0, 20.5), FlowIntensity::Medium);
        }
    }

    mod session_length_tests {
        use super::*;

        #[test]
        fn test_high_intensity_extends() {
            assert_eq!(compute_adaptive_session_length(25, FlowIntensity::High, 4), 45);
        }

        #[test]
        fn test_high_intensity_caps_at_ninety() {
            assert_eq!(compute_adaptive_session_length(25, FlowIntensity::High, 20), 90);
        }

        #[test]
        fn test_medium_intensity_caps_at_sixty() {
            assert_eq!(compute_adaptive_session_length(25, FlowIntensity::Medium, 3), 31);
            assert_eq!(compute_adaptive_session_length(50, FlowIntensity::Medium, 10), 60);
        }

        #[test]
        fn test_low_intensity_shortens_with_floor() {
            assert_eq!(compute_adaptive_session_length(25, FlowIntensity::Low, 7), 20);
            assert_eq!(compute_adaptive_session_length(18, FlowIntensity::Low, 0), 15);
            assert_eq!(compute_adaptive_session_length(3, FlowIntensity::Low, 0), 15);
        }
    }

    mod completed_session_tests {
        use super::*;

        #[test]
        fn test_baseline_average_is_a_fixed_point() {
            let mut metrics = FlowMetrics::new();
            metrics.seed(0, 0, 25.0);

            record_completed_focus_session(&mut metrics, 25, 25.0, day(1));

            assert_eq!(metrics.average_session_length(), 25.0);
        }

        #[test]
        fn test_average_is_two_sample_moving_average() {
            let mut metrics = FlowMetrics::new();
            record_completed_focus_session(&mut metrics, 40, 40.0, day(1));
            assert_eq!(metrics.average_session_length(), 20.0);
            record_completed_focus_session(&mut metrics, 40, 40.0, day(1));
            assert_eq!(metrics.average_session_length(), 30.0);
        }

        #[test]
        fn test_updates_counters_and_clears_distractions() {
            let mut metrics = FlowMetrics::new();
            metrics.record_distraction();
            metrics.record_distraction();

            record_completed_focus_session(&mut metrics, 25, 31.5, day(2));

            assert_eq!(metrics.consecutive_sessions(), 1);
            assert_eq!(metrics.distraction_count(), 0);
            assert_eq!(metrics.total_focus_minutes, 25);
            assert_eq!(metrics.best_flow_duration, 31.5);
            assert_eq!(metrics.last_session_date, Some(day(2)));
            assert!(metrics.session_start_timestamp.is_none());
        }

        #[test]
        fn test_streak_counts_every_session_same_day() {
            let mut metrics = FlowMetrics::new();
            for _ in 0..3 {
                record_completed_focus_session(&mut metrics, 25, 25.0, day(3));
            }
            assert_eq!(metrics.current_streak, 3);
            assert_eq!(metrics.longest_streak, 3);
        }

        #[test]
        fn test_streak_continues_from_yesterday() {
            let mut metrics = FlowMetrics::new();
            record_completed_focus_session(&mut metrics, 25, 25.0, day(3));
            record_completed_focus_session(&mut metrics, 25, 25.0, day(4));
            assert_eq!(metrics.current_streak, 2);
        }

        #[test]
        fn test_streak_restarts_after_gap() {
            let mut metrics = FlowMetrics::new();
            record_completed_focus_session(&mut metrics, 25, 25.0, day(3));
            record_completed_focus_session(&mut metrics, 25, 25.0, day(3));
            record_completed_focus_session(&mut metrics, 25, 25.0, day(6));

            assert_eq!(metrics.current_streak, 1);
            assert_eq!(metrics.longest_streak, 2);
        }

        #[test]
        fn test_best_flow_keeps_maximum() {
            let mut metrics = FlowMetrics::new();
            record_completed_focus_session(&mut metrics, 25, 48.0, day(1));
            record_completed_focus_session(&mut metrics, 25, 26.0, day(1));
            assert_eq!(metrics.best_flow_duration, 48.0);
        }

        #[test]
        fn test_intensity_reflects_pre_reset_distractions_then_recomputes() {
            let mut metrics = FlowMetrics::new();
            metrics.seed(2, 0, 50.0);
            for _ in 0..3 {
                metrics.record_distraction();
            }
            assert_eq!(
                metrics.flow_intensity(),
                compute_flow_intensity(2, 3, 50.0)
            );

            record_completed_focus_session(&mut metrics, 50, 50.0, day(1));

            assert_eq!(metrics.distraction_count(), 0);
            assert_eq!(metrics.flow_intensity(), compute_flow_intensity(3, 0, 50.0));
        }
    }
}
