//! Notification content for phase transitions.
//!
//! The engine only decides what to say and when; delivery is left to the
//! front end listening for [`EngineEvent::NotificationRequested`].
//!
//! [`EngineEvent::NotificationRequested`]: crate::engine::EngineEvent::NotificationRequested

pub mod content;

pub use content::{
    break_complete_content, focus_complete_content, plan_complete_content, NotificationContent,
};
