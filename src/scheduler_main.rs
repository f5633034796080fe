//! # ReplyClaw Scheduler — windowed recurring dispatch
//!
//! Keeps `replyclaw --today` running on a fixed cadence inside the daily
//! window, one run at a time, with all output archived to the run log.
//!
//! Usage:
//!   replyclaw-scheduler
//!   replyclaw-scheduler --bot-bin ./target/release/replyclaw
//!
//! Stop with Ctrl+C: no new runs are scheduled; an in-flight run finishes
//! on its own.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use replyclaw_core::ReplyClawConfig;
use replyclaw_scheduler::{ProcessRunner, RunLog, Scheduler, TimeWindow};

#[derive(Parser)]
#[command(
    name = "replyclaw-scheduler",
    version,
    about = "⏰ ReplyClaw scheduler — windowed recurring dispatch"
)]
struct Cli {
    /// Path to the replyclaw dispatch binary.
    #[arg(long, default_value = "replyclaw")]
    bot_bin: String,

    /// Run log file (default from config: ~/.replyclaw/task_log.txt).
    #[arg(long)]
    log_file: Option<String>,

    /// First hour of the daily window (local).
    #[arg(long)]
    window_start: Option<u32>,

    /// First hour past the daily window (local).
    #[arg(long)]
    window_end: Option<u32>,

    /// Minutes between dispatch runs.
    #[arg(long)]
    every_minutes: Option<u64>,

    /// Config file path (default: ~/.replyclaw/config.toml).
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let expanded = shellexpand::tilde(path).to_string();
            ReplyClawConfig::load_from(std::path::Path::new(&expanded))?
        }
        None => ReplyClawConfig::load()?,
    };
    let schedule = &config.schedule;

    let window = TimeWindow::new(
        cli.window_start.unwrap_or(schedule.window_start),
        cli.window_end.unwrap_or(schedule.window_end),
    );
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| schedule.log_file.clone());
    let log = RunLog::new(std::path::Path::new(
        &shellexpand::tilde(&log_path).to_string(),
    ));
    let runner = Arc::new(ProcessRunner::new(PathBuf::from(&cli.bot_bin)));

    let scheduler = Scheduler::new(
        window,
        Duration::from_secs(cli.every_minutes.unwrap_or(schedule.tick_minutes) * 60),
        Duration::from_secs(schedule.poll_seconds),
        runner,
        log,
    );
    scheduler.run_until_interrupted().await;
    Ok(())
}
