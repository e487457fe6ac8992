//! Process-level failures: startup, connections, and domain errors that
//! escaped a handler.

use std::fmt;

use meme_core::DomainError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Postgres unavailable: {0}")]
    Database(String),

    #[error("Redis unavailable: {0}")]
    Cache(String),

    #[error("Gateway session failed: {0}")]
    Gateway(String),

    #[error("REST transport failed: {0}")]
    Transport(String),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Stable code for log fields
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Whether retrying the same operation later could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(_) | Self::Cache(_) | Self::Gateway(_) | Self::Transport(_) => true,
            Self::Config(_) | Self::Internal(_) => false,
            Self::Domain(e) => e.is_transient(),
        }
    }

    #[must_use]
    pub fn database(msg: impl fmt::Display) -> Self {
        Self::Database(msg.to_string())
    }

    #[must_use]
    pub fn gateway(msg: impl fmt::Display) -> Self {
        Self::Gateway(msg.to_string())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
