//! Health server state

use meme_cache::RedisPool;
use meme_db::PgPool;
use meme_service::MemeWatchEngine;

use crate::client::GatewayStatus;

/// What the readiness probe inspects
#[derive(Clone)]
pub struct HealthState {
    pub(crate) database: Option<PgPool>,
    pub(crate) redis: Option<RedisPool>,
    pub(crate) engine: MemeWatchEngine,
    pub(crate) gateway: GatewayStatus,
}

impl HealthState {
    pub fn new(engine: MemeWatchEngine, gateway: GatewayStatus) -> Self {
        Self {
            database: None,
            redis: None,
            engine,
            gateway,
        }
    }

    pub fn with_database(mut self, pool: PgPool) -> Self {
        self.database = Some(pool);
        self
    }

    pub fn with_redis(mut self, pool: RedisPool) -> Self {
        self.redis = Some(pool);
        self
    }
}

impl std::fmt::Debug for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthState")
            .field("database", &self.database.is_some())
            .field("redis", &self.redis.is_some())
            .field("watched_posts", &self.engine.watched_count())
            .field("gateway_connected", &self.gateway.is_connected())
            .finish()
    }
}
