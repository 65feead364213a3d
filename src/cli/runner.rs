//! Interactive plan runner.
//!
//! Drives an [`EngineHandle`] from line-based keyboard input while printing
//! engine events, until the plan completes, the user quits or Ctrl-C arrives.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::engine::{EngineEvent, EngineHandle};

use super::display::Display;

// ============================================================================
// Input
// ============================================================================

/// A command typed while a plan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Pause or resume
    Toggle,
    /// Start the loaded phase
    Start,
    /// Abandon the plan
    Stop,
    /// Back to cycle 1
    Reset,
    /// Leave the runner
    Quit,
}

impl InputCommand {
    /// Parses one input line. Returns `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" | "resume" => Some(Self::Toggle),
            "n" | "start" | "next" => Some(Self::Start),
            "s" | "stop" => Some(Self::Stop),
            "r" | "reset" => Some(Self::Reset),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Why the runner returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The last cycle finished
    PlanCompleted,
    /// The user typed quit
    Quit,
    /// Ctrl-C
    Interrupted,
}

// ============================================================================
// Runner
// ============================================================================

/// Starts the plan and runs it to an outcome.
///
/// Pending metrics are flushed before returning.
pub async fn run_plan<R>(
    handle: EngineHandle,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    input: R,
) -> Result<RunOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let ticker = handle.spawn_ticker();
    handle.start().await;
    Display::show_input_help();

    let mut lines = input.lines();
    let mut input_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                Display::show_event(&event);
                if matches!(event, EngineEvent::PlanCompleted { .. }) {
                    break RunOutcome::PlanCompleted;
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match InputCommand::parse(&line) {
                    Some(InputCommand::Quit) => break RunOutcome::Quit,
                    Some(command) => apply(&handle, command).await,
                    None => Display::show_input_help(),
                },
                Ok(None) => {
                    tracing::debug!("input closed, running until the plan completes");
                    input_open = false;
                }
                Err(e) => {
                    tracing::warn!("failed to read input: {}", e);
                    input_open = false;
                }
            },
            _ = &mut ctrl_c => break RunOutcome::Interrupted,
        }
    };

    ticker.abort();
    while let Ok(event) = events.try_recv() {
        Display::show_event(&event);
    }
    handle.shutdown().await;
    println!();
    Ok(outcome)
}

async fn apply(handle: &EngineHandle, command: InputCommand) {
    let applied = match command {
        InputCommand::Toggle => handle.toggle().await,
        InputCommand::Start => handle.start().await,
        InputCommand::Stop => handle.stop().await,
        InputCommand::Reset => {
            handle.reset().await;
            true
        }
        InputCommand::Quit => false,
    };
    if !applied {
        tracing::info!(?command, "command had no effect");
    }
}

// ============================================================================
// Tests
// ============================================================================
