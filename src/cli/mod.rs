//! CLI module for flowfocus.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `runner`: Interactive plan runner driven by stdin
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod runner;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use runner::{run_plan, InputCommand, RunOutcome};
