//! flowfocus library
//!
//! Focus session engine with adaptive flow tracking. It includes:
//! - Session state machine driving focus/break cycles
//! - Flow metrics with streaks, distraction tracking and adaptive session lengths
//! - Debounced, failure-tolerant persistence behind a key-value port
//! - Configuration, clock source and notification content
//! - CLI command parsing, display utilities and the interactive runner

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod flow;
pub mod notification;
pub mod persistence;
pub mod storage;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, FocusConfig};
pub use engine::{EngineEvent, EngineHandle, SessionEngine};
pub use flow::{FlowIntensity, FlowMetrics};
pub use persistence::DebouncedWriter;
pub use storage::{
    FileStore, FlowMetricsRepository, KeyValueStore, MemoryStore, MirroredStore, StorageError,
};
pub use types::{SessionStatus, TimerPhase, TimerState};
