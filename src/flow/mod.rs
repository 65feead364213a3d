//! Flow metrics model and adaptive scheduling.
//!
//! - `metrics`: the persisted [`FlowMetrics`] record and [`FlowIntensity`]
//! - `scheduler`: intensity scoring, adaptive session length, completion bookkeeping
//! - `daily`: calendar-day reset of the per-day counters

pub mod daily;
pub mod metrics;
pub mod scheduler;

pub use daily::{apply_daily_reset, needs_daily_reset};
pub use metrics::{FlowIntensity, FlowMetrics};
pub use scheduler::{
    compute_adaptive_session_length, compute_flow_intensity, record_completed_focus_session,
    BASELINE_SESSION_MINUTES,
};
