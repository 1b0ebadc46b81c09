//! user-directory binary entry point.
//!
//! Parses the command line, sets up file logging and the async runtime,
//! initializes the terminal in raw mode, runs the TUI event loop,
//! and restores the terminal state on exit.
//!
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use user_directory::api::{DEFAULT_BASE_URL, HttpUserApi, InMemoryUserApi, UserApi};
use user_directory::app::{self, AppState};
use user_directory::controller::UserDirectoryController;

#[derive(Parser, Debug)]
#[command(name = "user-directory", version, about = "Browse and edit users of a demo REST service")]
struct Args {
    /// Base URL of the users service
    #[arg(long, env = "USER_DIRECTORY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Log file (defaults to `<config-dir>/user-directory.log`)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Directory holding theme.conf and keybinds.conf
    #[arg(long, env = "USER_DIRECTORY_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
    /// Use a seeded in-memory service instead of the network
    #[arg(long)]
    offline: bool,
}

/// The terminal owns stdout, so logs go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn build_api(args: &Args) -> Result<Arc<dyn UserApi>> {
    if args.offline {
        return Ok(Arc::new(InMemoryUserApi::seeded()));
    }
    let api = HttpUserApi::new(&args.base_url, Duration::from_secs(args.timeout_secs))
        .context("build http client")?;
    Ok(Arc::new(api))
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = args.config_dir.clone().unwrap_or_else(app::default_config_dir);
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("create config dir {}", config_dir.display()))?;
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("user-directory.log"));
    init_logging(&log_file)?;

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let api = build_api(&args)?;
    info!(base_url = %args.base_url, offline = args.offline, "starting user-directory");

    let directory = UserDirectoryController::new(api);
    let mut app = AppState::with_config_dir(directory, &config_dir);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut app, runtime.handle().clone());

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
