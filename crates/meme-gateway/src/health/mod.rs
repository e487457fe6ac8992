//! Health endpoints
//!
//! `GET /health` answers as long as the process runs; `GET /health/ready`
//! reports the database, cache, watch engine and gateway session.

mod handlers;
mod responses;
mod state;

pub use handlers::{health_check, readiness_check};
pub use responses::{HealthChecks, HealthResponse, ReadinessResponse};
pub use state::HealthState;

use std::future::Future;

use axum::{routing::get, Router};
use meme_common::{AppError, AppResult};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Build the health router
pub fn create_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the health router on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: HealthState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Health server listening");
    }

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("health server error: {e}")))
}
