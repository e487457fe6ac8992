//! # meme-db
//!
//! Database layer implementing the registry and guild settings ports with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meme_db::{create_pool, run_migrations, DatabaseConfig, PgMemeRegistry};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = meme_common::AppConfig::from_env()?;
//!     let pool = create_pool(&DatabaseConfig::from(&app.database)).await?;
//!     run_migrations(&pool).await?;
//!     let registry = PgMemeRegistry::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, health_check, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgGuildConfigStore, PgMemeRegistry};
