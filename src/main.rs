//! Request condition server.
//!
//! Loads a rules file, evaluates every rule for each incoming request and
//! reports the matching rule names.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ listener ──▶ request id ──▶ rules middleware ──▶ echo handler
//!                                                        │
//!                                                        ▼
//!                                               RuleTable (ArcSwap)
//!                                                        ▲
//!     rules.toml ──▶ loader ──▶ validation ──▶ watcher ──┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use request_conditions::config::{load_config, watcher::ConfigWatcher, AppConfig};
use request_conditions::http::HttpServer;
use request_conditions::lifecycle::{signals, Shutdown};
use request_conditions::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "request-conditions")]
#[command(about = "HTTP server that tags requests with the rules they match", long_about = None)]
struct Args {
    /// Path to the TOML rules file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("request-conditions v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rules = config.rules.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match (&args.config, config.reload.enabled) {
        (Some(path), true) => {
            let interval = Duration::from_secs(config.reload.poll_interval_secs);
            let (watcher, updates) = ConfigWatcher::new(path, interval);
            (updates, Some(watcher.run()?))
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_on_signal(&signal_shutdown).await;
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
