//! xmlup-svc - XML issue metadata upload service
//!
//! Accepts an XML upload plus volume, issue, year and date, inserts the
//! issue metadata block after the first `</lpage>` and returns the
//! corrected file for download.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xmlup_common::config::{ConfigResolver, ConfigSource};
use xmlup_svc::{build_router, AppState};

/// Command-line arguments for xmlup-svc
#[derive(Parser, Debug)]
#[command(name = "xmlup-svc")]
#[command(about = "Upload service that adds missing issue metadata to XML files")]
#[command(version)]
struct Args {
    /// Path to the TOML config file (falls back to XMLUP_CONFIG, then the platform config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host to bind, overriding the config file
    #[arg(long, env = "XMLUP_HOST")]
    host: Option<String>,

    /// Port to listen on, overriding the config file
    #[arg(short, long, env = "XMLUP_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolved = ConfigResolver::new(args.config)
        .resolve()
        .context("Failed to load configuration")?;
    let mut config = resolved.config;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting xmlup-svc v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &resolved.source {
        ConfigSource::MissingFile(path) => {
            warn!("Config file {} not found, using compiled defaults", path.display())
        }
        source => info!("Configuration: {}", source),
    }
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    let state = AppState::from_config(&config);
    let app = build_router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("xmlup-svc listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
