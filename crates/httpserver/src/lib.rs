//! Process wiring for the demonstration binaries.
//!
//! - `httpserver`: serves canned pages, a video file and a chunked proxy to an
//!   upstream HTTP API through [`handlers::DemoHandler`]
//! - `tcplistener`: prints the request line and headers of every request it
//!   receives

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub mod handlers;

pub const DEFAULT_PORT: u16 = 42069;

#[derive(Debug, Parser)]
#[command(name = "httpserver", about = "HTTP/1.1 demonstration server", long_about = None)]
pub struct Config {
    /// Port to listen on, on every interface
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding `vim.mp4`
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Base URL that `/httpbin/<path>` is forwarded to
    #[arg(long, default_value = "https://httpbin.org")]
    pub upstream: String,
}

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .init();
}

/// Resolves on Ctrl-C, or on SIGTERM where signals exist.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(cause = %e, "can't listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(cause = %e, "can't listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
