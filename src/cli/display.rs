//! Display utilities for the flowfocus CLI.
//!
//! This module provides formatted output for:
//! - Engine events while a plan runs
//! - Stored flow metrics
//! - Adaptive plan suggestions

use std::io::Write;

use crate::engine::EngineEvent;
use crate::flow::FlowMetrics;
use crate::types::{TimerPhase, TimerState};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Prints one engine event.
    ///
    /// State changes redraw the countdown line in place.
    pub fn show_event(event: &EngineEvent) {
        match event {
            EngineEvent::TimerStateChanged(state) => {
                print!("\r{}", Self::progress_line(state));
                let _ = std::io::stdout().flush();
            }
            other => {
                if let Some(line) = Self::event_line(other) {
                    println!("\r{}", line);
                }
            }
        }
    }

    /// Shows the keys understood by `run`.
    pub fn show_input_help() {
        println!("\rkeys: p = pause/resume, n = start, s = stop, r = reset, q = quit");
    }

    /// Shows stored flow metrics.
    pub fn show_metrics(metrics: &FlowMetrics) {
        println!("flowfocus status");
        println!("─────────────────────────────");
        for line in Self::metrics_lines(metrics) {
            println!("{}", line);
        }
    }

    /// Shows the suggested next focus length.
    pub fn show_plan(metrics: &FlowMetrics, base_minutes: u32, suggested_minutes: u32) {
        println!(
            "Next focus session: {} min (base {} min, {} flow intensity, {} sessions today)",
            suggested_minutes,
            base_minutes,
            metrics.flow_intensity(),
            metrics.consecutive_sessions()
        );
    }

    /// Shows a confirmation for metrics reset.
    pub fn show_metrics_reset() {
        println!("* Flow metrics cleared");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Shows how to recover from an error.
    pub fn show_hint(hint: &str) {
        eprintln!("  hint: {}", hint);
    }

    fn event_line(event: &EngineEvent) -> Option<String> {
        let line = match event {
            EngineEvent::FlowSessionStarted => "> Focus session started".to_string(),
            EngineEvent::FlowSessionCompleted { minutes } => {
                format!("* Focus session complete ({} min)", minutes)
            }
            EngineEvent::BreakStarted => "~ Break started".to_string(),
            EngineEvent::BreakCompleted { .. } => "~ Break finished".to_string(),
            EngineEvent::Interruption => return None,
            EngineEvent::PlanCompleted { cycles } => format!("* Plan complete ({} cycles)", cycles),
            EngineEvent::NotificationRequested { title, body } => {
                format!("[{}] {}", title, body)
            }
            EngineEvent::TimerStateChanged(_) => return None,
        };
        Some(line)
    }

    fn progress_line(state: &TimerState) -> String {
        let (minutes, seconds) = Self::format_time(state.remaining_seconds);
        let label = match (state.phase, state.is_paused(), state.is_idle()) {
            (_, true, _) => "paused",
            (_, _, true) => "ready",
            (TimerPhase::Focus, ..) => "focus",
            (TimerPhase::Break, ..) => "break",
        };
        format!(
            "{:<6} {:>2}:{:02}  cycle {}/{}   ",
            label, minutes, seconds, state.current_cycle, state.total_cycles
        )
    }

    fn metrics_lines(metrics: &FlowMetrics) -> Vec<String> {
        let last = metrics
            .last_session_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        vec![
            format!("Flow intensity: {}", metrics.flow_intensity()),
            format!("Sessions today: {}", metrics.consecutive_sessions()),
            format!("Distractions:   {}", metrics.distraction_count()),
            format!(
                "Streak:         {} (best {})",
                metrics.current_streak, metrics.longest_streak
            ),
            format!("Total focus:    {} min", metrics.total_focus_minutes),
            format!("Best flow:      {:.1} min", metrics.best_flow_duration),
            format!("Last session:   {}", last),
        ]
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        (total_seconds / 60, total_seconds % 60)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time_zero() {
            assert_eq!(Display::format_time(0), (0, 0));
        }

        #[test]
        fn test_format_time_full_session() {
            assert_eq!(Display::format_time(1500), (25, 0));
            assert_eq!(Display::format_time(61), (1, 1));
        }
    }

    mod line_tests {
        use super::*;

        #[test]
        fn test_progress_line_running_focus() {
            let mut state = TimerState::new(1500, 4);
            state.set_running();
            state.tick();
            let line = Display::progress_line(&state);
            assert!(line.starts_with("focus"));
            assert!(line.contains("24:59"));
            assert!(line.contains("cycle 1/4"));
        }

        #[test]
        fn test_progress_line_idle_and_paused() {
            let mut state = TimerState::new(60, 1);
            assert!(Display::progress_line(&state).starts_with("ready"));
            state.set_paused();
            assert!(Display::progress_line(&state).starts_with("paused"));
        }

        #[test]
        fn test_interruptions_are_silent() {
            assert!(Display::event_line(&EngineEvent::Interruption).is_none());
        }

        #[test]
        fn test_notification_line() {
            let line = Display::event_line(&EngineEvent::NotificationRequested {
                title: "Break is over".to_string(),
                body: "Cycle 2 is starting now.".to_string(),
            });
            assert_eq!(
                line.as_deref(),
                Some("[Break is over] Cycle 2 is starting now.")
            );
        }

        #[test]
        fn test_metrics_lines_without_sessions() {
            let lines = Display::metrics_lines(&FlowMetrics::new());
            assert!(lines.iter().any(|l| l == "Last session:   never"));
            assert!(lines.iter().any(|l| l == "Flow intensity: low"));
        }
    }
}
