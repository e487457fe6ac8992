//! Bot runtime
//!
//! Wires storage, cache, transport and the watch engine together, resumes
//! watches left over from the previous run, then drives the gateway event
//! loop until Ctrl-C.

mod event_loop;

pub use event_loop::EventLoop;

use std::sync::Arc;
use std::time::Duration;

use meme_cache::{CachedGuildConfigStore, RedisPool};
use meme_common::{AppConfig, AppError, AppResult};
use meme_core::GuildConfigStore;
use meme_db::{PgGuildConfigStore, PgMemeRegistry};
use meme_service::{resume_watches, retry_abandoned, BotSettings, MemeWatchEngine, ServiceContext};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use crate::client::{GatewayClient, GatewayClientConfig};
use crate::health::{self, HealthState};
use crate::router::{CommandRouter, EventClassifier};
use crate::transport::HttpTransport;

/// Capacity of the gateway → event loop channel
const EVENT_BUFFER: usize = 1024;

/// Wait before watching posts that failed to resume at startup once more
const ABANDONED_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Upper bound for in-flight retractions at shutdown
const ENGINE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the bot until Ctrl-C or a fatal gateway error
pub async fn run(config: AppConfig) -> AppResult<()> {
    info!("Connecting to PostgreSQL...");
    let pool = meme_db::create_pool(&meme_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(AppError::database)?;
    meme_db::run_migrations(&pool)
        .await
        .map_err(AppError::database)?;
    info!("PostgreSQL connection established");

    let pg_store: Arc<dyn GuildConfigStore> = Arc::new(PgGuildConfigStore::new(
        pool.clone(),
        config.bot.default_downvote_limit,
    ));
    let (config_store, redis) = match &config.redis {
        Some(redis_config) => {
            info!("Connecting to Redis...");
            let redis = RedisPool::from_config(redis_config)
                .map_err(|e| AppError::Cache(e.to_string()))?;
            let store: Arc<dyn GuildConfigStore> = Arc::new(CachedGuildConfigStore::with_ttl(
                pg_store,
                redis.clone(),
                redis_config.guild_config_ttl_secs,
            ));
            (store, Some(redis))
        }
        None => {
            info!("REDIS_URL not set; guild settings are read from PostgreSQL directly");
            (pg_store, None)
        }
    };

    let ctx = Arc::new(
        ServiceContext::builder()
            .registry(Arc::new(PgMemeRegistry::new(pool.clone())))
            .config_store(config_store)
            .transport(Arc::new(HttpTransport::from_config(&config)?))
            .settings(BotSettings::from(&config.bot))
            .build()?,
    );

    let engine = MemeWatchEngine::new(&ctx);
    let report = resume_watches(&ctx, &engine).await?;
    let retry = if report.is_complete() {
        None
    } else {
        let engine = engine.clone();
        let posts = report.abandoned_posts();
        Some(tokio::spawn(async move {
            let report = retry_abandoned(&engine, posts, ABANDONED_RETRY_DELAY).await;
            info!(resumed = report.resumed.len(), "Retried abandoned meme posts");
        }))
    };

    let client = GatewayClient::new(GatewayClientConfig::from_app(&config));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listener = TcpListener::bind(config.health.address())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to bind {}: {e}", config.health.address())))?;
    let mut health_state = HealthState::new(engine.clone(), client.status()).with_database(pool.clone());
    if let Some(redis) = redis {
        health_state = health_state.with_redis(redis);
    }
    let mut health_shutdown = shutdown_rx.clone();
    let health = tokio::spawn(health::serve(listener, health_state, async move {
        let _ = health_shutdown.changed().await;
    }));

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let gateway_shutdown = shutdown_rx.clone();
    let gateway = tokio::spawn(async move { client.run(events_tx, gateway_shutdown).await });

    let router = Arc::new(CommandRouter::new(
        Arc::clone(&ctx),
        engine.clone(),
        config.bot.prefix.clone(),
    ));
    let event_loop = EventLoop::new(EventClassifier::new(&config.bot.prefix), router, engine.clone());

    info!(prefix = %config.bot.prefix, "MemeBot running");
    tokio::select! {
        () = event_loop.run(events_rx) => warn!("Gateway event stream ended"),
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C; shutting down"),
        },
    }

    // Gateway first so no new events arrive, then let retractions finish
    let _ = shutdown_tx.send(true);
    let gateway_result = match gateway.await {
        Ok(result) => result.map_err(AppError::gateway),
        Err(e) => Err(AppError::internal(e)),
    };

    if !engine.shutdown(ENGINE_SHUTDOWN_TIMEOUT).await {
        warn!("Watch engine did not drain in time; pending retractions were aborted");
    }
    if let Some(retry) = retry {
        retry.abort();
    }
    match health.await {
        Ok(Err(e)) => warn!(error = %e, "Health server stopped with an error"),
        Err(e) => warn!(error = %e, "Health server task failed"),
        Ok(Ok(())) => {}
    }
    pool.close().await;

    info!("MemeBot stopped");
    gateway_result
}
