//! sqlx errors as domain errors

use meme_core::error::DomainError;
use meme_core::Snowflake;
use sqlx::Error as SqlxError;

pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// A unique violation on insert means the post is already tracked
pub fn map_insert_error(post_id: Snowflake) -> impl FnOnce(SqlxError) -> DomainError {
    move |e| {
        let duplicate = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if duplicate {
            DomainError::DuplicateId(post_id)
        } else {
            map_db_error(e)
        }
    }
}

pub fn map_lookup_error(e: SqlxError) -> DomainError {
    DomainError::ConfigLookupFailed(e.to_string())
}
