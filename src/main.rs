//! flowfocus CLI - adaptive focus sessions in the terminal
//!
//! Runs focus/break cycles, tracks flow metrics across days and suggests
//! the length of the next focus session.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;

use flowfocus::cli::{run_plan, Cli, Commands, Display, RunArgs, RunOutcome};
use flowfocus::clock::{Clock, SystemClock};
use flowfocus::config::{
    default_data_dir, load_config, save_config, ConfigError, CONFIG_FILE_NAME,
};
use flowfocus::engine::{EngineHandle, SessionEngine};
use flowfocus::flow::{apply_daily_reset, compute_adaptive_session_length};
use flowfocus::storage::{
    FileStore, FlowMetricsRepository, KeyValueStore, MirroredStore, StorageError,
};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(hint) = suggestion_for(&e) {
            Display::show_hint(hint);
        }
        std::process::exit(1);
    }
}

/// Finds a recovery hint for the first library error in the chain.
fn suggestion_for(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.suggestion())
        } else {
            cause.downcast_ref::<StorageError>().map(StorageError::suggestion)
        }
    })
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    tracing::debug!("using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Run(args)) => {
            let repository = open_repository(&data_dir, cli.mirror_dir.as_deref());
            run(&data_dir, repository, &args).await?;
        }
        Some(Commands::Status) => {
            let repository = open_repository(&data_dir, cli.mirror_dir.as_deref());
            let metrics = repository.load().await;
            Display::show_metrics(&metrics);
        }
        Some(Commands::Plan { base }) => {
            let config = load_config(&data_dir.join(CONFIG_FILE_NAME))
                .context("Failed to load configuration")?;
            let repository = open_repository(&data_dir, cli.mirror_dir.as_deref());
            let mut metrics = repository.load().await;
            // Counters from an earlier day no longer describe today's flow.
            apply_daily_reset(&mut metrics, SystemClock.today());

            let base = base.unwrap_or(config.work_duration_minutes);
            let suggested = compute_adaptive_session_length(
                base,
                metrics.flow_intensity(),
                metrics.consecutive_sessions(),
            );
            Display::show_plan(&metrics, base, suggested);
        }
        Some(Commands::ResetMetrics) => {
            let repository = open_repository(&data_dir, cli.mirror_dir.as_deref());
            repository
                .reset()
                .await
                .context("Failed to reset flow metrics")?;
            Display::show_metrics_reset();
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs a plan interactively against stdin.
async fn run(data_dir: &Path, repository: FlowMetricsRepository, args: &RunArgs) -> Result<()> {
    let config_path = data_dir.join(CONFIG_FILE_NAME);
    let config = args.apply(load_config(&config_path).context("Failed to load configuration")?);
    config.validate().context("Invalid session settings")?;
    if args.save {
        save_config(&config_path, &config).context("Failed to save configuration")?;
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = SessionEngine::open(config, repository, Arc::new(SystemClock), event_tx).await;
    let handle = EngineHandle::new(engine);

    let input = BufReader::new(tokio::io::stdin());
    let outcome = run_plan(handle.clone(), event_rx, input).await?;

    let suggested = handle.suggested_focus_minutes().await;
    match outcome {
        RunOutcome::PlanCompleted => println!("Suggested next focus session: {} min", suggested),
        RunOutcome::Quit | RunOutcome::Interrupted => tracing::info!(?outcome, "run ended"),
    }
    Ok(())
}

/// Builds the metrics repository over the file store, optionally mirrored.
fn open_repository(data_dir: &Path, mirror_dir: Option<&Path>) -> FlowMetricsRepository {
    let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir));
    let store: Arc<dyn KeyValueStore> = match mirror_dir {
        Some(dir) => Arc::new(MirroredStore::new(local, Arc::new(FileStore::new(dir)))),
        None => local,
    };
    FlowMetricsRepository::new(store)
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
