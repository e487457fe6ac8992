//! Errors raised by the moderation services

use meme_common::AppError;
use meme_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Watch engine is stopped")]
    EngineStopped,

    /// The member lacks moderation rights
    #[error("Missing moderation rights")]
    PermissionDenied,

    /// Rejected before any port was touched
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable code for log fields
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::EngineStopped => "ENGINE_STOPPED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Text shown to the user when `action` failed
    ///
    /// Submission failures are explained precisely; everything else gets the
    /// generic reply so no internal detail leaks into the chat.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            Self::Domain(e) if e.is_submission() => match e {
                DomainError::PostingDisabled => "We couldn't post your meme for the guild \
                     you specified doesn't allow for memes to be posted."
                    .to_string(),
                _ => "The previous message needs to contain exactly one attachment".to_string(),
            },
            Self::PermissionDenied => {
                format!("You need the admin role to {action}.")
            }
            _ => format!("We couldn't {action}.\nThat's all we know."),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            other => AppError::internal(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
