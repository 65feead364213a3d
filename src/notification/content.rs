//! Notification content construction.

/// Title and body of a user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

fn minutes(n: u32) -> String {
    if n == 1 {
        "1 minute".to_string()
    } else {
        format!("{n} minutes")
    }
}

/// Content for a focus session that finished mid-plan.
#[must_use]
pub fn focus_complete_content(focus_minutes: u32, break_minutes: u32) -> NotificationContent {
    NotificationContent::new(
        "Focus session complete",
        format!(
            "You stayed focused for {}. Time for a {break_minutes}-minute break.",
            minutes(focus_minutes)
        ),
    )
}

/// Content for the focus session that finished the whole plan.
#[must_use]
pub fn plan_complete_content(cycles: u32) -> NotificationContent {
    let title = if cycles == 1 {
        "Cycle complete".to_string()
    } else {
        format!("All {cycles} cycles complete")
    };
    NotificationContent::new(title, "Great work. Start a new focus block when you're ready.")
}

/// Content for a finished break.
#[must_use]
pub fn break_complete_content(next_cycle: u32, auto_start: bool) -> NotificationContent {
    let body = if auto_start {
        format!("Cycle {next_cycle} is starting now.")
    } else {
        format!("Ready for cycle {next_cycle}? Start your next focus session.")
    };
    NotificationContent::new("Break is over", body)
}
