//! MemeBot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p meme-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use meme_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if try_init_tracing().is_ok() {
                error!(error = %e, "Failed to load configuration");
            } else {
                eprintln!("Failed to load configuration: {e}");
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        guild = %config.bot.target_guild_id,
        gateway = %config.gateway.url,
        "Configuration loaded"
    );

    if let Err(e) = meme_gateway::run(config).await {
        error!(code = e.error_code(), transient = e.is_transient(), error = %e, "MemeBot stopped with an error");
        std::process::exit(1);
    }
}
