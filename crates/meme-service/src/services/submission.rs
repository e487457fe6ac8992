//! Submission pipeline
//!
//! Reposts the attachment a user sent right before their `post` command into
//! the target guild's meme channel and starts watching the repost.

use meme_core::{DomainError, MemePost, Snowflake, Vote};
use tracing::{info, instrument, warn};

use crate::engine::MemeWatchEngine;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// A `post` command received in a direct message
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// Conversation the command was sent in
    pub channel_id: Snowflake,
    /// The command message itself; the attachment is looked up right before it
    pub message_id: Snowflake,
    pub author_id: Snowflake,
    pub author_name: String,
    /// Whether to credit the author in the repost; `None` uses the deployment default
    pub attribution: Option<bool>,
}

/// Caption crediting the submitter
pub fn attribution_caption(author_name: &str) -> String {
    format!("Meme by {author_name}")
}

/// Submission service
pub struct SubmissionService<'a> {
    ctx: &'a ServiceContext,
    engine: &'a MemeWatchEngine,
}

impl<'a> SubmissionService<'a> {
    /// Create a new SubmissionService
    pub fn new(ctx: &'a ServiceContext, engine: &'a MemeWatchEngine) -> Self {
        Self { ctx, engine }
    }

    /// Post a meme to the target guild
    ///
    /// # Errors
    /// `PostingDisabled` when the guild has no meme channel,
    /// `AttachmentCountMismatch` when the previous message doesn't carry
    /// exactly one attachment, or any port failure.
    #[instrument(skip(self, request), fields(author_id = %request.author_id))]
    pub async fn post_meme(&self, request: &SubmissionRequest) -> ServiceResult<MemePost> {
        let guild_id = self.ctx.settings().target_guild_id;
        let meme_channel = self
            .ctx
            .config_store()
            .get_meme_channel(guild_id)
            .await?
            .ok_or(DomainError::PostingDisabled)?;

        let previous = self
            .ctx
            .transport()
            .previous_message(request.channel_id, request.message_id)
            .await?
            .ok_or(DomainError::AttachmentCountMismatch { found: 0 })?;
        let attachment = previous
            .single_attachment()
            .map_err(|found| DomainError::AttachmentCountMismatch { found })?;

        let caption = request
            .attribution
            .unwrap_or(self.ctx.settings().attribution_default)
            .then(|| attribution_caption(&request.author_name));

        let transport = self.ctx.transport();
        let post_id = transport
            .post_attachment(meme_channel, attachment, caption.as_deref())
            .await?;

        for vote in Vote::SEED_ORDER {
            if let Err(e) = transport.add_reaction(meme_channel, post_id, vote).await {
                warn!(post_id = %post_id, vote = %vote, error = %e, "Failed to seed reaction");
            }
        }

        let post = MemePost::new(post_id, meme_channel, guild_id, request.author_id);
        if let Err(e) = self.ctx.registry().add(&post).await {
            // An untracked repost could never be voted down; a duplicate id is
            // already tracked and stays up
            if !matches!(e, DomainError::DuplicateId(_)) {
                self.withdraw(&post).await;
            }
            return Err(e.into());
        }
        self.engine.watch(&post)?;

        info!(post_id = %post.id, guild_id = %guild_id, channel_id = %meme_channel, "Meme posted");
        Ok(post)
    }

    async fn withdraw(&self, post: &MemePost) {
        match self.ctx.transport().delete_message(post.channel_id, post.id).await {
            Ok(()) => warn!(post_id = %post.id, "Repost withdrawn after registry write failed"),
            Err(e) => warn!(
                post_id = %post.id,
                transient = e.is_transient(),
                error = %e,
                "Failed to withdraw untracked repost"
            ),
        }
    }
}
