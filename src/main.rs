//! # ReplyClaw — paced reply dispatcher
//!
//! Fetches approved reply drafts from the work queue and submits each one
//! through a logged-in browser session, paced to human cadence.
//!
//! Usage:
//!   replyclaw --setup-auth                 # one-time: capture a login session
//!   replyclaw --visible --today --limit 1  # visible browser, today only, one item
//!   replyclaw --today                      # headless, today's items
//!   replyclaw                              # headless, full backlog

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use replyclaw_core::ReplyClawConfig;
use replyclaw_dispatch::DispatchLoop;
use replyclaw_queue::QueueClient;
use replyclaw_surface::{AuthSnapshot, WebDriverSurface, bootstrap};

#[derive(Parser)]
#[command(name = "replyclaw", version, about = "🦞 ReplyClaw — paced reply dispatcher")]
struct Cli {
    /// One-time: open a visible browser, log in, save the auth snapshot.
    #[arg(long)]
    setup_auth: bool,

    /// Run the browser visibly (default is headless).
    #[arg(long)]
    visible: bool,

    /// Max items to process (0 = unlimited; 1 recommended for a test pass).
    #[arg(long, default_value = "0", value_name = "N")]
    limit: usize,

    /// Only items generated today (store zone).
    #[arg(long)]
    today: bool,

    /// Config file path (default: ~/.replyclaw/config.toml).
    #[arg(long)]
    config: Option<String>,

    /// WebDriver endpoint override.
    #[arg(long)]
    webdriver_url: Option<String>,

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

    let mut config = match &cli.config {
        Some(path) => {
            let expanded = shellexpand::tilde(path).to_string();
            ReplyClawConfig::load_from(std::path::Path::new(&expanded))?
        }
        None => ReplyClawConfig::load()?,
    };
    if let Some(url) = cli.webdriver_url {
        config.surface.webdriver_url = url;
    }

    // --setup-auth: capture a login session and exit.
    if cli.setup_auth {
        println!("{}", "=".repeat(60));
        println!("  Auth setup");
        println!("{}", "=".repeat(60));
        let saved =
            bootstrap::setup_auth(&config.surface, &config.surface.auth_state_path()).await?;
        if !saved {
            anyhow::bail!("login was not detected — run --setup-auth again");
        }
        return Ok(());
    }

    run_dispatch(&config, cli.visible, cli.limit, cli.today).await
}

async fn run_dispatch(
    config: &ReplyClawConfig,
    visible: bool,
    limit: usize,
    today: bool,
) -> Result<()> {
    println!("{}", "=".repeat(60));
    println!("  ReplyClaw dispatch starting");
    println!(
        "  headless: {}  limit: {}  scope: {}",
        !visible,
        if limit == 0 {
            "unlimited".to_string()
        } else {
            format!("{limit} item(s)")
        },
        if today { "today" } else { "full backlog" }
    );
    println!("{}", "=".repeat(60));

    // A missing snapshot aborts before any item is touched.
    let snapshot_path = config.surface.auth_state_path();
    let snapshot = AuthSnapshot::load(&snapshot_path)?;

    // Step 1: fetch the batch. A store failure here ends the run untouched.
    tracing::info!("[1/3] fetching pending items from the work queue");
    let queue = QueueClient::new(config.queue.clone());
    let items = queue.fetch_pending(limit, today).await?;
    if items.is_empty() {
        println!("  nothing to dispatch (approved Draft items: 0)");
        return Ok(());
    }
    tracing::info!("  {} item(s) queued", items.len());
    for item in &items {
        let generated = item
            .generated_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into());
        tracing::info!("    → {}  {}  {}", item.id, generated, item.draft_preview());
    }

    // Step 2: one browser session for the whole run.
    tracing::info!(
        "[2/3] starting browser session (snapshot: {})",
        snapshot_path.display()
    );
    let surface = WebDriverSurface::connect(&config.surface, !visible).await?;
    if let Err(e) = surface.apply_snapshot(&snapshot).await {
        let _ = surface.close().await;
        return Err(e.into());
    }

    // Step 3: dispatch. The session is released on every exit path.
    tracing::info!("[3/3] dispatching replies");
    let dispatch = DispatchLoop::new(&surface, &queue, &config.pacing);
    let result = dispatch.run(&items).await;
    let _ = surface.close().await;
    let report = result?;

    println!("{}", "=".repeat(60));
    println!("  dispatch finished");
    println!(
        "  complete: {}   skipped: {}   attempted: {}",
        report.succeeded, report.skipped, report.attempted
    );
    println!("{}", "=".repeat(60));
    Ok(())
}
