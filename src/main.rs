// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use nsd_rpcd::{
    config::Config, constants::TOKIO_WORKER_THREADS, nsd::NsdControlClient, rpc,
    service::ZoneService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// JSON-RPC daemon to create, update and delete zones dynamically in NSD
#[derive(Debug, Parser)]
#[command(name = "nsd-rpcd", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Listen address, overriding `Server.bind` (e.g. `tcp://127.0.0.1:4242`)
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("nsd-rpcd-worker")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_tracing() {
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug nsd-rpcd --config /etc/nsd-rpcd.yaml
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json nsd-rpcd --config /etc/nsd-rpcd.yaml
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_tracing();

    info!("Starting nsd-rpcd");
    debug!("Logging initialized with file and line number tracking");

    let mut config = Config::load_file(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        debug!(bind = %bind, "Overriding Server.bind from the command line");
        config.server.bind = Some(bind);
    }
    let listen_address = config.server.listen_address()?;

    debug!(
        host = %config.nsd_master.control_host,
        port = config.nsd_master.control_port,
        "Creating NSD control client"
    );
    let client = NsdControlClient::from_config(&config.nsd_master)
        .context("Failed to set up the NSD control client")?;

    info!(
        dir = %config.zones.dir.display(),
        filepattern = config.zones.file_pattern.template(),
        pattern = config.zones.pattern.as_deref().unwrap_or("<none>"),
        "Zone storage configured"
    );
    let service = Arc::new(ZoneService::new(client, config.zones));

    let listener = tokio::net::TcpListener::bind(&listen_address)
        .await
        .with_context(|| format!("Failed to bind {listen_address}"))?;
    info!(address = %listen_address, "JSON-RPC server listening");

    axum::serve(listener, rpc::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Graceful shutdown completed successfully");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown..."),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
