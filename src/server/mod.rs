pub mod handlers;

use crate::core::engine::MorseEngine;
use crate::utils::error::{MorseError, Result};
use axum::{routing::get, Router};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: MorseEngine,
}

pub fn build_router(engine: MorseEngine) -> Router {
    Router::new()
        .route(
            "/decode-morse",
            get(handlers::decode_usage).post(handlers::decode_morse),
        )
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}

pub async fn bind(address: &str) -> Result<TcpListener> {
    TcpListener::bind(address).await.map_err(|e| MorseError::ConfigError {
        message: format!("Failed to bind to {}: {}", address, e),
    })
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        tracing::info!("Morse decoder listening on http://{}", address);
        tracing::info!("Decode endpoint: http://{}/decode-morse", address);
        tracing::info!("Health check: http://{}/health", address);
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
