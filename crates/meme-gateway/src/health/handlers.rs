//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};

use super::responses::{HealthResponse, ReadinessResponse};
use super::state::HealthState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
pub async fn readiness_check(
    State(state): State<HealthState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match &state.database {
        Some(pool) => Some(meme_db::health_check(pool).await),
        None => None,
    };
    let redis = match &state.redis {
        Some(pool) => Some(pool.health_check().await.is_ok()),
        None => None,
    };

    let response = ReadinessResponse::new(
        database,
        redis,
        state.engine.is_running(),
        state.gateway.is_connected(),
        state.engine.watched_count(),
    );
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
