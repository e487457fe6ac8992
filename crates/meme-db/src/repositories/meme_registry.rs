//! PostgreSQL implementation of MemeRegistry

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use meme_core::entities::MemePost;
use meme_core::traits::{MemeRegistry, RepoResult};
use meme_core::value_objects::Snowflake;

use crate::models::MemePostModel;

use super::error::{map_db_error, map_insert_error};

/// PostgreSQL implementation of MemeRegistry
#[derive(Clone)]
pub struct PgMemeRegistry {
    pool: PgPool,
}

impl PgMemeRegistry {
    /// Create a new PgMemeRegistry
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemeRegistry for PgMemeRegistry {
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn add(&self, post: &MemePost) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO meme_posts (id, channel_id, guild_id, submitter_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post.id.into_inner())
        .bind(post.channel_id.into_inner())
        .bind(post.guild_id.into_inner())
        .bind(post.submitter_id.into_inner())
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error(post.id))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM meme_posts WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn all(&self) -> RepoResult<Vec<MemePost>> {
        let results = sqlx::query_as::<_, MemePostModel>(
            r#"
            SELECT id, channel_id, guild_id, submitter_id, created_at
            FROM meme_posts
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MemePost::from).collect())
    }
}
