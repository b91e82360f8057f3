use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::settings::AppConfig;
use crate::infrastructure::providers::Providers;
use crate::infrastructure::providers::tts::GoogleCredentials;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod jobs;
mod modules;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("influencer_gpt=debug,tower_http=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    info!("Starting server...");

    let config = AppConfig::new()?;
    let credentials = GoogleCredentials::from_settings(&config.tts)?;
    let providers = Providers::from_config(&config, credentials)?;
    let storage = Arc::new(StorageService::new(&config.storage));

    let shutdown = CancellationToken::new();
    let state = AppState::new(config.clone(), storage, providers, shutdown.clone());
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM and cancels every in-flight poll loop.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Received shutdown signal, cancelling in-flight jobs");
    shutdown.cancel();
}
