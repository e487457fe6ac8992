//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use meme_core::{GuildConfig, Snowflake};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub gateway: GatewayConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    /// Redis is optional; without it guild settings are read straight from Postgres
    pub redis: Option<RedisConfig>,
    pub health: HealthConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Bot identity and behaviour
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    pub token: String,
    /// Command prefix, also the program name of the command grammar
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Guild that memes submitted by direct message are posted to
    pub target_guild_id: Snowflake,
    #[serde(default = "default_downvote_limit")]
    pub default_downvote_limit: u32,
    /// Whether `post` credits the submitter unless told otherwise
    #[serde(default = "default_attribution")]
    pub attribution_default: bool,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("prefix", &self.prefix)
            .field("target_guild_id", &self.target_guild_id)
            .field("default_downvote_limit", &self.default_downvote_limit)
            .field("attribution_default", &self.attribution_default)
            .finish()
    }
}

/// Gateway (WebSocket) connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    #[serde(default = "default_reconnect_max_backoff")]
    pub reconnect_max_backoff_secs: u64,
}

/// REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the version prefix, e.g. `https://chat.example.com/api/v1`
    pub base_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
    /// TTL of cached guild settings
    #[serde(default = "default_guild_config_ttl")]
    pub guild_config_ttl_secs: u64,
}

/// Health endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_health_port")]
    pub port: u16,
}

impl HealthConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Default value functions
fn default_app_name() -> String {
    "memebot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_prefix() -> String {
    "mb".to_string()
}

fn default_downvote_limit() -> u32 {
    GuildConfig::DEFAULT_DOWNVOTE_LIMIT
}

fn default_attribution() -> bool {
    true
}

fn default_reconnect_max_backoff() -> u64 {
    60
}

fn default_api_timeout() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_health_port() -> u16 {
    8081
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_redis_max_connections() -> u32 {
    8
}

fn default_guild_config_ttl() -> u64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let default_downvote_limit =
            vars.parsed("BOT_DEFAULT_DOWNVOTE_LIMIT", default_downvote_limit())?;
        if default_downvote_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "BOT_DEFAULT_DOWNVOTE_LIMIT",
                "0".to_string(),
            ));
        }

        let redis = match vars.get("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: vars
                    .parsed("REDIS_MAX_CONNECTIONS", default_redis_max_connections())?,
                guild_config_ttl_secs: vars
                    .parsed("GUILD_CONFIG_CACHE_TTL_SECS", default_guild_config_ttl())?,
            }),
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            bot: BotConfig {
                token: vars.required("BOT_TOKEN")?,
                prefix: vars.get("BOT_PREFIX").unwrap_or_else(default_prefix),
                target_guild_id: vars.required_parsed("BOT_TARGET_GUILD_ID")?,
                default_downvote_limit,
                attribution_default: vars.parsed("BOT_ATTRIBUTION_DEFAULT", default_attribution())?,
            },
            gateway: GatewayConfig {
                url: vars.required("GATEWAY_URL")?,
                reconnect_max_backoff_secs: vars.parsed(
                    "GATEWAY_RECONNECT_MAX_BACKOFF_SECS",
                    default_reconnect_max_backoff(),
                )?,
            },
            api: ApiConfig {
                base_url: vars
                    .required("API_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: vars.parsed("API_TIMEOUT_SECS", default_api_timeout())?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars
                    .parsed("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: vars
                    .parsed("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
            },
            redis,
            health: HealthConfig {
                host: vars.get("HEALTH_HOST").unwrap_or_else(default_host),
                port: vars.parsed("HEALTH_PORT", default_health_port())?,
            },
        })
    }
}

/// Typed access over a raw key lookup
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn required_parsed<T: FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.required(key)?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw))
    }

    fn parsed<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
