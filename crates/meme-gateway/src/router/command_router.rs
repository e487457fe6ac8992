//! Chat command router
//!
//! Parses a prefixed message with the shared command grammar, applies the
//! cmd-channel and admin-role checks, runs the command and answers in the
//! channel it came from.

use std::sync::Arc;

use clap::error::ErrorKind;
use meme_cli::{build_command, parse_chat_command, ChannelAction, Cli, Command};
use meme_core::{format_role_ref, MessageReceivedEvent, Snowflake};
use meme_service::{
    AccessGuard, CommandReply, GuildSettingsService, GuildStatus, MemeWatchEngine, ServiceError,
    ServiceContext, SubmissionRequest, SubmissionService,
};
use tracing::{debug, info, instrument, warn};

/// Runs chat commands
pub struct CommandRouter {
    ctx: Arc<ServiceContext>,
    engine: MemeWatchEngine,
    prefix: String,
}

impl CommandRouter {
    pub fn new(ctx: Arc<ServiceContext>, engine: MemeWatchEngine, prefix: impl Into<String>) -> Self {
        Self {
            ctx,
            engine,
            prefix: prefix.into(),
        }
    }

    /// Run a command message and send the reply, if any
    pub async fn handle(&self, message: &MessageReceivedEvent) {
        let Some(reply) = self.respond(message).await else {
            return;
        };
        if let Err(e) = self
            .ctx
            .transport()
            .send_message(message.channel_id, &reply.to_string())
            .await
        {
            warn!(channel_id = %message.channel_id, error = %e, "Failed to send command reply");
        }
    }

    /// Run a command message and compute its reply
    ///
    /// `None` means the message is ignored: it isn't a command, or it was sent
    /// outside the guild's cmd channel.
    #[instrument(skip(self, message), fields(channel_id = %message.channel_id, author_id = %message.author_id))]
    pub async fn respond(&self, message: &MessageReceivedEvent) -> Option<CommandReply> {
        let parsed = parse_chat_command(&self.prefix, &message.content)?;

        match message.guild_id {
            Some(guild_id) => self.respond_in_guild(guild_id, message, parsed).await,
            None => Some(self.respond_in_direct(message, parsed).await),
        }
    }

    async fn respond_in_guild(
        &self,
        guild_id: Snowflake,
        message: &MessageReceivedEvent,
        parsed: Result<Cli, clap::Error>,
    ) -> Option<CommandReply> {
        let command = parsed.as_ref().ok().and_then(|cli| cli.command.as_ref());

        // `init` is how a guild picks its cmd channel, so it works anywhere
        if !matches!(command, Some(Command::Init { .. })) {
            match AccessGuard::new(&self.ctx)
                .is_authorized_channel(guild_id, message.channel_id)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    debug!(guild_id = %guild_id, "Command outside the cmd channel ignored");
                    return None;
                }
                Err(e) => return Some(CommandReply::error(e.user_message("run that command"))),
            }
        }

        let cli = match parsed {
            Ok(cli) => cli,
            Err(e) => return Some(usage_reply(&e)),
        };
        let Some(command) = cli.command else {
            return Some(self.help_reply(cli.example));
        };

        if command.is_mutating() {
            let member = message.member.clone().unwrap_or_default();
            if let Err(e) = AccessGuard::new(&self.ctx)
                .require_moderation_rights(guild_id, message.author_id, &member)
                .await
            {
                return Some(CommandReply::error(e.user_message(action(&command))));
            }
        }

        info!(guild_id = %guild_id, command = command.name(), "Running guild command");
        let reply = self
            .run_guild_command(guild_id, message.channel_id, &command)
            .await
            .unwrap_or_else(|e| {
                warn!(guild_id = %guild_id, command = command.name(), code = e.error_code(), error = %e, "Guild command failed");
                CommandReply::error(e.user_message(action(&command)))
            });
        Some(reply)
    }

    async fn run_guild_command(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        command: &Command,
    ) -> Result<CommandReply, ServiceError> {
        let settings = GuildSettingsService::new(&self.ctx);

        let reply = match command {
            Command::Init { admin_role } => {
                let role_id = settings.init(guild_id, channel_id, admin_role).await?;
                let channel_name = settings.channel_label(channel_id).await;
                CommandReply::initialized(&format_role_ref(role_id), &channel_name)
            }
            Command::Meme { .. } => match command.channel_action() {
                Some(ChannelAction::Set(channel_ref)) => {
                    let id = settings.set_meme_channel(guild_id, &channel_ref).await?;
                    CommandReply::meme_channel_set(&settings.channel_label(id).await)
                }
                Some(ChannelAction::Disable) => {
                    settings.disable_meme_channel(guild_id).await?;
                    CommandReply::meme_channel_disabled()
                }
                _ => {
                    let name = match settings.meme_channel(guild_id).await? {
                        Some(id) => Some(settings.channel_label(id).await),
                        None => None,
                    };
                    CommandReply::meme_channel_status(name.as_deref())
                }
            },
            Command::Cmd { .. } => match command.channel_action() {
                Some(ChannelAction::Set(channel_ref)) => {
                    let id = settings.set_cmd_channel(guild_id, &channel_ref).await?;
                    CommandReply::cmd_channel_set(&settings.channel_label(id).await)
                }
                Some(ChannelAction::Disable) => {
                    settings.disable_cmd_channel(guild_id).await?;
                    CommandReply::cmd_channel_disabled()
                }
                _ => {
                    let name = match settings.cmd_channel(guild_id).await? {
                        Some(id) => Some(settings.channel_label(id).await),
                        None => None,
                    };
                    CommandReply::cmd_channel_status(name.as_deref())
                }
            },
            Command::Limit { limit: Some(limit) } => {
                settings.set_downvote_limit(guild_id, *limit).await?;
                CommandReply::downvote_limit_set(*limit)
            }
            Command::Limit { limit: None } => {
                CommandReply::downvote_limit_status(settings.downvote_limit(guild_id).await?)
            }
            Command::Status => {
                let status = settings.status(guild_id).await?;
                self.status_reply(&settings, &status).await
            }
            Command::Post { .. } => CommandReply::direct_message_only(),
        };
        Ok(reply)
    }

    async fn respond_in_direct(
        &self,
        message: &MessageReceivedEvent,
        parsed: Result<Cli, clap::Error>,
    ) -> CommandReply {
        let cli = match parsed {
            Ok(cli) => cli,
            Err(e) => return usage_reply(&e),
        };

        match cli.command {
            None => self.help_reply(cli.example),
            Some(Command::Post { no_attribution }) => {
                let request = SubmissionRequest {
                    channel_id: message.channel_id,
                    message_id: message.message_id,
                    author_id: message.author_id,
                    author_name: message.author_name.clone(),
                    attribution: no_attribution.then_some(false),
                };
                match SubmissionService::new(&self.ctx, &self.engine)
                    .post_meme(&request)
                    .await
                {
                    Ok(post) => {
                        info!(post_id = %post.id, submitter_id = %post.submitter_id, "Meme submitted");
                        CommandReply::meme_posted()
                    }
                    Err(e) => {
                        warn!(author_id = %message.author_id, error = %e, "Meme submission failed");
                        CommandReply::error(e.user_message("post your meme"))
                    }
                }
            }
            Some(_) => CommandReply::guild_only(),
        }
    }

    fn help_reply(&self, with_examples: bool) -> CommandReply {
        let help = build_command(&self.prefix, with_examples).render_help();
        CommandReply::info(format!("```\n{help}\n```"))
    }

    async fn status_reply(
        &self,
        settings: &GuildSettingsService<'_>,
        status: &GuildStatus,
    ) -> CommandReply {
        let meme_channel = match status.meme_channel {
            Some(id) => settings.channel_label(id).await,
            None => "disabled".to_string(),
        };
        let cmd_channel = match status.cmd_channel {
            Some(id) => settings.channel_label(id).await,
            None => "any channel".to_string(),
        };
        let admin_role = status
            .admin_role
            .map_or_else(|| "administrators".to_string(), format_role_ref);
        let limit_note = if status.limit_is_default { " (default)" } else { "" };

        CommandReply::info(format!(
            "Meme channel: {meme_channel}\nCmd channel: {cmd_channel}\nAdmin role: {admin_role}\nDownvote limit: {}{limit_note}",
            status.downvote_limit
        ))
    }
}

/// What the user tried to do, for failure replies
fn action(command: &Command) -> &'static str {
    match (command, command.channel_action()) {
        (Command::Init { .. }, _) => "initialize this guild",
        (Command::Meme { .. }, Some(ChannelAction::Set(_))) => "set the meme channel",
        (Command::Meme { .. }, Some(ChannelAction::Disable)) => "disable the meme channel",
        (Command::Meme { .. }, _) => "get the meme channel",
        (Command::Cmd { .. }, Some(ChannelAction::Set(_))) => "set the cmd channel",
        (Command::Cmd { .. }, Some(ChannelAction::Disable)) => "disable the cmd channel",
        (Command::Cmd { .. }, _) => "get the cmd channel",
        (Command::Limit { limit: Some(_) }, _) => "set the downvote limit",
        (Command::Limit { limit: None }, _) => "get the downvote limit",
        (Command::Status, _) => "get this guild's settings",
        (Command::Post { .. }, _) => "post your meme",
    }
}

/// Help, version and usage errors are answered with clap's own rendering
fn usage_reply(error: &clap::Error) -> CommandReply {
    let text = format!("```\n{}\n```", error.render());
    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => CommandReply::info(text),
        _ => CommandReply::error(text),
    }
}
