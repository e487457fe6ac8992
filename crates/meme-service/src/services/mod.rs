//! Use-case services
//!
//! Services borrow a [`ServiceContext`] and orchestrate the domain ports.

pub mod access;
pub mod context;
pub mod error;
pub mod reply;
pub mod settings;
pub mod submission;

pub use access::AccessGuard;
pub use context::{BotSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reply::{CommandReply, ReplyStatus};
pub use settings::{GuildSettingsService, GuildStatus};
pub use submission::{SubmissionRequest, SubmissionService};
