// Afya - terminal client for the AfyaJamii maternal health service
//
// Architecture:
// - Gateway (reqwest): Thin authenticated client over the service's REST API
// - Session: Credential store plus login/signup/restore/logout lifecycle
// - Flows: Per-view state machines (vitals, chat, history) driven by events
// - TUI (ratatui): Auth screen and dashboard, one event loop on the main task
// - Event system: One mpsc channel carries every async completion back in

mod api;
mod cli;
mod config;
mod demo;
mod events;
mod flows;
mod logging;
mod notify;
mod session;
mod startup;
mod tui;
mod util;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::{ApiClient, HealthApi};
use config::{Config, LogRotation};
use demo::DemoApi;
use logging::{LogBuffer, TuiLogLayer};
use notify::Notifier;
use session::{CredentialStore, SessionManager, TokenSlot};
use tui::app::App;
use tui::theme::ThemeKind;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Subcommands (config --show, --reset, ...) run and exit before any of
    // the TUI machinery comes up.
    if cli::handle_cli(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if cli.demo {
        config.demo_mode = true;
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }

    // Logs go to the in-app buffer, never stdout: the alternate screen owns
    // the terminal once the TUI starts. File logging is opt-in on top.
    //
    // Filter precedence: AFYA_LOG > RUST_LOG > config file level
    let default_filter = format!("afya={}", config.logging.level);
    let filter = std::env::var("AFYA_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let log_buffer = LogBuffer::new();

    // The guard must live until exit so buffered file writes flush.
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> =
        if config.logging.file_enabled {
            match std::fs::create_dir_all(&config.logging.file_dir) {
                Err(e) => {
                    eprintln!(
                        "Warning: Could not create log directory {:?}: {}",
                        config.logging.file_dir, e
                    );
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .init();
                    None
                }
                Ok(()) => {
                    let file_appender = match config.logging.file_rotation {
                        LogRotation::Hourly => tracing_appender::rolling::hourly(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                        LogRotation::Daily => tracing_appender::rolling::daily(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                        LogRotation::Never => tracing_appender::rolling::never(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                    };
                    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                    // File layer uses JSON format for structured log parsing
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .with(
                            tracing_subscriber::fmt::layer()
                                .json()
                                .with_writer(non_blocking)
                                .with_ansi(false),
                        )
                        .init();
                    Some(guard)
                }
            }
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        };

    // Gateway: live client or the built-in stub, behind the same trait.
    let slot = TokenSlot::default();
    let api: Arc<dyn HealthApi> = if config.demo_mode {
        Arc::new(DemoApi::new())
    } else {
        Arc::new(ApiClient::new(&config.api, slot.clone())?)
    };

    let store = CredentialStore::open_default()?;
    let session = SessionManager::new(api.clone(), store, slot);
    let session_restored = session.restore();

    startup::print_startup(&config, session_restored);
    startup::log_startup(&config, session_restored);

    // One channel carries every async completion back to the event loop.
    let (events_tx, events_rx) = mpsc::channel(256);
    let notify = Notifier::new(events_tx.clone());

    let app = App::new(
        api,
        session,
        events_tx,
        notify,
        log_buffer,
        ThemeKind::from_name(&config.theme),
    );
    tui::run(app, events_rx).await
}
