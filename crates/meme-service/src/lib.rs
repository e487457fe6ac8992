//! # meme-service
//!
//! Application layer: the downvote moderation engine, restart recovery, the
//! submission pipeline, guild settings use cases, and command reply texts.

pub mod engine;
pub mod services;


pub use engine::{resume_watches, retry_abandoned, BootstrapReport, MemeWatchEngine, WatchOutcome};
pub use services::{
    AccessGuard, BotSettings, CommandReply, GuildSettingsService, GuildStatus, ReplyStatus,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SubmissionRequest,
    SubmissionService,
};
