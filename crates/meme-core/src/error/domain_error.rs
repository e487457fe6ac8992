//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Submission Errors
    // =========================================================================
    #[error("Meme posting is disabled: no meme channel configured")]
    PostingDisabled,

    #[error("Expected exactly one attachment, found {found}")]
    AttachmentCountMismatch { found: usize },

    // =========================================================================
    // Registry Errors
    // =========================================================================
    #[error("Meme post already tracked: {0}")]
    DuplicateId(Snowflake),

    // =========================================================================
    // Reference / Validation Errors
    // =========================================================================
    #[error("Invalid channel or role reference: {0:?}")]
    InvalidReference(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Moderation Errors
    // =========================================================================
    #[error("Failed to retract meme post {post_id}: {reason}")]
    RetractionFailed { post_id: Snowflake, reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Guild configuration lookup failed: {0}")]
    ConfigLookupFailed(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::PostingDisabled => "POSTING_DISABLED",
            Self::AttachmentCountMismatch { .. } => "ATTACHMENT_COUNT_MISMATCH",
            Self::DuplicateId(_) => "DUPLICATE_ID",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::RetractionFailed { .. } => "RETRACTION_FAILED",
            Self::ConfigLookupFailed(_) => "CONFIG_LOOKUP_FAILED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::TransportError(_) => "TRANSPORT_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Submission failures carry a precise, user-facing explanation
    pub fn is_submission(&self) -> bool {
        matches!(
            self,
            Self::PostingDisabled | Self::AttachmentCountMismatch { .. }
        )
    }

    /// Check if this is a transient failure (no automatic retry, but worth trying again later)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConfigLookupFailed(_)
                | Self::DatabaseError(_)
                | Self::CacheError(_)
                | Self::TransportError(_)
        )
    }
}
