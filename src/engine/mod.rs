//! Focus session engine.
//!
//! This module contains:
//! - `session`: the state machine that owns timer state and flow metrics
//! - `handle`: shared async access, the one-second ticker and shutdown
//! - `event`: events emitted to collaborators

pub mod event;
pub mod handle;
pub mod session;

pub use event::EngineEvent;
pub use handle::EngineHandle;
pub use session::SessionEngine;
