//! Health response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
    pub watched_posts: usize,
}

/// Result per dependency: "healthy", "unhealthy" or "not_configured"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
    pub engine: String,
    pub gateway: String,
}

fn check(healthy: Option<bool>) -> String {
    match healthy {
        Some(true) => "healthy",
        Some(false) => "unhealthy",
        None => "not_configured",
    }
    .to_string()
}

impl ReadinessResponse {
    /// `None` marks a dependency that isn't configured; it doesn't fail readiness
    pub fn new(
        database: Option<bool>,
        redis: Option<bool>,
        engine: bool,
        gateway: bool,
        watched_posts: usize,
    ) -> Self {
        let ready = database != Some(false) && redis != Some(false) && engine && gateway;
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: check(database),
                redis: check(redis),
                engine: check(Some(engine)),
                gateway: check(Some(gateway)),
            },
            watched_posts,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
