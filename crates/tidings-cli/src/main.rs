//! `tidings`: terminal dashboard for the Tidings notification server.
//!
//! # Usage
//!
//! ```
//! tidings --url http://localhost:5000
//! tidings export --from 2024-01-01 --to 2024-01-07 --out reports/
//! tidings subscribe --endpoint https://push.example.com/abc --p256dh BNc --auth tBH
//! tidings --config ~/.config/tidings/config.toml
//! ```

mod app;
mod client;
mod commands;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::{Action, App};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use commands::SubscriptionSource;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tidings_core::analytics::Aggregator;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tidings", about = "Terminal dashboard for Tidings notification analytics")]
struct Args {
  /// Path to a TOML config file (url, export_dir).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the tidings server (default: http://localhost:5000).
  #[arg(long, env = "TIDINGS_URL")]
  url: Option<String>,

  /// Directory CSV reports are written to (default: current directory).
  #[arg(long, env = "TIDINGS_EXPORT_DIR", value_name = "DIR")]
  export_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Write a CSV report without opening the dashboard.
  Export {
    /// First local calendar day to include (default: 7 days ago).
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,
    /// Last local calendar day to include (default: now).
    #[arg(long, value_name = "YYYY-MM-DD")]
    to:   Option<NaiveDate>,
    /// Output directory, overriding `--export-dir`.
    #[arg(long, value_name = "DIR")]
    out:  Option<PathBuf>,
  },
  /// Register a Web Push subscription with the server.
  Subscribe {
    /// JSON file holding a serialised push subscription.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["endpoint", "p256dh", "auth"])]
    file:     Option<PathBuf>,
    /// Push service endpoint URL.
    #[arg(long, requires_all = ["p256dh", "auth"])]
    endpoint: Option<String>,
    /// Client public key.
    #[arg(long)]
    p256dh:   Option<String>,
    /// Client auth secret.
    #[arg(long)]
    auth:     Option<String>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  export_dir: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  let export_dir = args
    .export_dir
    .or(file_cfg.export_dir)
    .unwrap_or_else(|| PathBuf::from("."));

  let client = ApiClient::new(api_config)?;

  match args.command {
    None => run_dashboard(client, export_dir).await,
    Some(command) => {
      init_tracing();
      run_command(&client, command, export_dir).await
    }
  }
}

/// Headless commands log to stderr; the dashboard owns the terminal.
fn init_tracing() {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();
}

async fn run_command(client: &ApiClient, command: Command, export_dir: PathBuf) -> Result<()> {
  match command {
    Command::Export { from, to, out } => {
      let range = commands::resolve_range(from, to, Utc::now(), &Local)?;
      let path = commands::export(client, range, &out.unwrap_or(export_dir)).await?;
      println!("{}", path.display());
    }
    Command::Subscribe { file, endpoint, p256dh, auth } => {
      let source = match (file, endpoint, p256dh, auth) {
        (Some(path), ..) => SubscriptionSource::File(path),
        (None, Some(endpoint), Some(p256dh), Some(auth)) => {
          SubscriptionSource::Keys { endpoint, p256dh, auth }
        }
        _ => anyhow::bail!("pass either --file or --endpoint with --p256dh and --auth"),
      };
      commands::subscribe(client, &source).await?;
      println!("Successfully subscribed to notifications");
    }
  }
  Ok(())
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

async fn run_dashboard(client: ApiClient, export_dir: PathBuf) -> Result<()> {
  let mut app = App::new(Aggregator::local(), export_dir);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, &client).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

/// Fetch notifications. A failed fetch leaves the app in whatever state it
/// was in, so the first failure keeps the loading view up.
async fn load(app: &mut App, client: &ApiClient) {
  match client.list_notifications().await {
    Ok(notifications) => app.set_notifications(notifications),
    Err(e) => tracing::debug!("fetching notifications failed: {e:#}"),
  }
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  client: &ApiClient,
) -> Result<()> {
  terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;
  load(app, client).await;

  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
    {
      match app.handle_key(key) {
        Action::Continue => {}
        Action::Reload => load(app, client).await,
        Action::Quit => break,
      }
    }
  }

  Ok(())
}
