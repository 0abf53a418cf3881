use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

pub mod dto;
mod handlers;

use crate::config::Config;
use crate::infer::{Client, InferError};

pub struct AppState {
    pub client: Client,
}

/// Builds the relay's routes around a fresh upstream client.
pub fn router(config: &Config) -> Result<Router, InferError> {
    let client = Client::new(config)?;
    if !client.has_api_key() {
        tracing::warn!("OPENROUTER_API_KEY is not set, chat requests will fail");
    }

    Ok(handlers::build_router(Arc::new(AppState { client })))
}

/// Serves the relay on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, router: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let router = router(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    serve_on(listener, router, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
