//! Earshot - pauses playing media when the default audio output disappears.
//!
//! Runs headless in the background. Unplugging headphones (or losing any other
//! default render device) pauses every media session that is playing, and the
//! paused track is reported in the log.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use earshot_core::{
    bootstrap_services, default_backends, BroadcastEventBridge, MediaPausedHandler, TokioSpawner,
};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;

use crate::config::DaemonConfig;

/// Earshot - pause media when headphones are unplugged.
#[derive(Parser, Debug)]
#[command(name = "earshot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "EARSHOT_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Report each paused track (overrides config file).
    #[arg(short = 'n', long, value_name = "BOOL")]
    notify_on_pause: Option<bool>,

    /// Print device and media events as JSON lines on stdout.
    #[arg(short = 'j', long)]
    json_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Earshot v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        DaemonConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(notify) = args.notify_on_pause {
        config.notify_on_pause = notify;
    }
    if args.json_events {
        config.emit_json_events = true;
    }

    log::info!(
        "Configuration: notify_on_pause={}, pause_queue_capacity={}, watch_multimedia_role={}",
        config.notify_on_pause,
        config.pause_queue_capacity,
        config.watch_multimedia_role
    );

    let backends = default_backends().context("Failed to initialize audio bindings")?;

    let core_config = config.to_core_config();
    let services = bootstrap_services(
        &core_config,
        backends,
        paused_handler(config.notify_on_pause),
        &TokioSpawner::current(),
    )
    .context("Failed to bootstrap services")?;

    match services.observer.current_default() {
        Some(device) => log::info!("Watching default output device {}", device),
        None => log::info!("No default output device yet, waiting for one"),
    }

    let printer = config
        .emit_json_events
        .then(|| tokio::spawn(print_events(Arc::clone(&services.event_bridge))));

    // Wait for shutdown signal
    shutdown_signal().await;

    log::info!("Shutdown signal received, cleaning up...");

    services.shutdown();

    if let Some(printer) = printer {
        printer.abort();
    }

    log::info!("Shutdown complete");
    Ok(())
}

/// Builds the callback invoked for every paused media session.
fn paused_handler(notify: bool) -> Arc<dyn MediaPausedHandler> {
    Arc::new(move |title: &str, artist: &str| {
        if notify {
            log::info!("Paused: {} by {}", title, artist);
        }
    })
}

/// Writes each broadcast event to stdout as one JSON line.
async fn print_events(bridge: Arc<BroadcastEventBridge>) {
    let mut rx = bridge.subscribe();
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("Failed to serialize event: {}", e),
            },
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("Event printer lagged, skipped {} event(s)", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
