//! CPG Sales Dashboard Server - Main entry point

use anyhow::{Context, Result};
use cpg_common::logging::{init_logging, LogConfig};
use cpg_server::{config::Config, router, DashboardState};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("cpg-server")
        .filter_directives("cpg_server=debug,cpg_pipeline=info,tower_http=debug")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting CPG Sales Dashboard server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    // Loading and aggregating is blocking file I/O and CPU work
    let state = {
        let loader_config = config.clone();
        tokio::task::spawn_blocking(move || DashboardState::build(&loader_config))
            .await
            .context("Dashboard loader task panicked")?
            .with_context(|| format!("Failed to load sales data from {}", config.data.path.display()))?
    };

    info!(
        records = state.dataset.records.len(),
        total_revenue = state.dataset.aggregates.summary.total_revenue,
        "Dashboard data ready"
    );

    let app = router(state.into_shared(), &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
