//! Command definitions for the flowfocus CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::FocusConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// flowfocus - adaptive focus sessions in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "flowfocus",
    version,
    about = "Adaptive focus/break timer that tracks your flow",
    long_about = "Runs focus and break cycles in the terminal.\n\
                  Tracks streaks and distractions, and suggests how long the next \
                  focus session should be.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.json and stored metrics
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Second directory that receives a copy of every metrics write
    #[arg(long, global = true, value_name = "DIR")]
    pub mirror_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a focus plan interactively
    Run(RunArgs),

    /// Show stored flow metrics
    Status,

    /// Suggest the length of the next focus session
    Plan {
        /// Base session length in minutes (defaults to the configured work duration)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=120))]
        base: Option<u32>,
    },

    /// Clear stored flow metrics
    ResetMetrics,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command. Unset values come from config.json.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Focus duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub break_time: Option<u32>,

    /// Number of focus/break cycles (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub cycles: Option<u32>,

    /// Start the next focus session automatically after a break
    #[arg(short, long)]
    pub auto_break: bool,

    /// Size focus sessions by the adaptive scheduler
    #[arg(long)]
    pub adaptive: bool,

    /// Do not print notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Save these settings as the defaults
    #[arg(long)]
    pub save: bool,
}

impl RunArgs {
    /// Applies the command-line overrides on top of `config`.
    pub fn apply(&self, mut config: FocusConfig) -> FocusConfig {
        if let Some(work) = self.work {
            config.work_duration_minutes = work;
        }
        if let Some(brk) = self.break_time {
            config.break_duration_minutes = brk;
        }
        if let Some(cycles) = self.cycles {
            config.total_cycles = cycles;
        }
        if self.auto_break {
            config.auto_break_enabled = true;
        }
        if self.adaptive {
            config.adaptive_durations = true;
        }
        if self.no_notify {
            config.notifications_enabled = false;
        }
        config
    }
}

// ============================================================================
// Tests
// ============================================================================
