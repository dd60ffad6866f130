//! Researchify API: publications, team rosters, achievements and a themeable
//! team website, deployable to GitHub Pages.
//!
//! The binary in `main.rs` only loads `.env`, sets up logging and calls
//! [`start_server`]. Everything else is reachable from [`routes::build_router`].

pub mod auth;
pub mod config;
pub mod error;
pub mod external;
pub mod logging;
pub mod publication;
pub mod routes;
pub mod state;
pub mod storage;
pub mod team;
pub mod validation;

use anyhow::Context;
use config::Config;
use log::{error, info};
use state::{AppState, ExternalClients, SharedState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Opens the store and wires the real third-party clients.
pub async fn build_state(config: Config) -> anyhow::Result<SharedState> {
    let db = storage::establish_connection(&config.database_url, config.database_max_connections)
        .await
        .with_context(|| format!("opening database {}", config.database_url))?;
    let clients = ExternalClients::from_config(&config).context("building http client")?;
    Ok(AppState::new(config, Arc::new(db), clients).shared())
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    if let Some(dir) = &config.log_dir {
        info!("Writing logs under {}", dir.display());
    }
    info!("Initializing state...");
    let state = build_state(config).await?;
    let app = routes::build_router(state);

    let address = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await
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
