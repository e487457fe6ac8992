//! In-memory ports and test data
//!
//! Everything here stays in process so the moderation flow can be exercised
//! without PostgreSQL, Redis or a chat platform.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use meme_core::{
    Attachment, BotEvent, ChatMessage, ChatTransport, DomainError, GuildConfig, GuildConfigStore,
    MemberInfo, MemePost, MemeRegistry, MessageReceivedEvent, Permissions, ReactionEvent,
    RepoResult, Snowflake, Vote,
};
use meme_service::{BotSettings, ServiceContext};
use parking_lot::Mutex;

pub const GUILD: Snowflake = Snowflake::new(100);
pub const CMD_CHANNEL: Snowflake = Snowflake::new(200);
pub const MEME_CHANNEL: Snowflake = Snowflake::new(201);
pub const OTHER_CHANNEL: Snowflake = Snowflake::new(202);
pub const DM_CHANNEL: Snowflake = Snowflake::new(300);
pub const ADMIN_ROLE: Snowflake = Snowflake::new(900);
pub const BOT_USER: Snowflake = Snowflake::new(1);
pub const SUBMITTER: Snowflake = Snowflake::new(7);

// ============================================================================
// Meme registry
// ============================================================================

#[derive(Default)]
pub struct InMemoryRegistry {
    posts: Mutex<BTreeMap<Snowflake, MemePost>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryRegistry {
    pub fn contains(&self, id: Snowflake) -> bool {
        self.posts.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.posts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.lock().is_empty()
    }

    /// Make `all()` fail, as an unreachable database would
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `add()` fail, as a database outage mid-submission would
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MemeRegistry for InMemoryRegistry {
    async fn add(&self, post: &MemePost) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection reset".to_string()));
        }
        let mut posts = self.posts.lock();
        if posts.contains_key(&post.id) {
            return Err(DomainError::DuplicateId(post.id));
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn remove(&self, id: Snowflake) -> RepoResult<()> {
        self.posts.lock().remove(&id);
        Ok(())
    }

    async fn all(&self) -> RepoResult<Vec<MemePost>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        Ok(self.posts.lock().values().cloned().collect())
    }
}

// ============================================================================
// Guild config store
// ============================================================================

pub struct InMemoryConfigStore {
    configs: Mutex<HashMap<Snowflake, GuildConfig>>,
    default_limit: u32,
}

impl InMemoryConfigStore {
    pub fn new(default_limit: u32) -> Self {
        Self {
            configs: Mutex::new(HashMap::new()),
            default_limit,
        }
    }

    pub fn config(&self, guild_id: Snowflake) -> GuildConfig {
        self.configs
            .lock()
            .get(&guild_id)
            .cloned()
            .unwrap_or_else(|| GuildConfig::unconfigured(guild_id))
    }

    fn update(&self, guild_id: Snowflake, f: impl FnOnce(&mut GuildConfig)) {
        let mut configs = self.configs.lock();
        let config = configs
            .entry(guild_id)
            .or_insert_with(|| GuildConfig::unconfigured(guild_id));
        f(config);
        config.updated_at = Utc::now();
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new(GuildConfig::DEFAULT_DOWNVOTE_LIMIT)
    }
}

#[async_trait]
impl GuildConfigStore for InMemoryConfigStore {
    async fn get_config(&self, guild_id: Snowflake) -> RepoResult<GuildConfig> {
        Ok(self.config(guild_id))
    }

    fn default_downvote_limit(&self) -> u32 {
        self.default_limit
    }

    async fn set_meme_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.update(guild_id, |c| c.meme_channel_id = Some(channel_id));
        Ok(())
    }

    async fn disable_meme_channel(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.update(guild_id, |c| c.meme_channel_id = None);
        Ok(())
    }

    async fn set_downvote_limit(&self, guild_id: Snowflake, limit: u32) -> RepoResult<()> {
        GuildConfig::validate_downvote_limit(limit)?;
        self.update(guild_id, |c| c.downvote_limit = Some(limit));
        Ok(())
    }

    async fn set_cmd_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.update(guild_id, |c| c.cmd_channel_id = Some(channel_id));
        Ok(())
    }

    async fn disable_cmd_channel(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.update(guild_id, |c| c.cmd_channel_id = None);
        Ok(())
    }

    async fn set_admin_role(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        self.update(guild_id, |c| c.admin_role_id = Some(role_id));
        Ok(())
    }
}

// ============================================================================
// Chat transport
// ============================================================================

/// A repost made through the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repost {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub attachment_id: Snowflake,
    pub caption: Option<String>,
}

/// Transport that records every call instead of talking to a platform
pub struct RecordingTransport {
    next_id: AtomicI64,
    previous: Mutex<HashMap<Snowflake, ChatMessage>>,
    reposts: Mutex<Vec<Repost>>,
    reactions: Mutex<Vec<(Snowflake, Vote)>>,
    deleted: Mutex<Vec<Snowflake>>,
    sent: Mutex<Vec<(Snowflake, String)>>,
    refuse_deletes: AtomicBool,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            next_id: AtomicI64::new(50_000),
            previous: Mutex::new(HashMap::new()),
            reposts: Mutex::new(Vec::new()),
            reactions: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            refuse_deletes: AtomicBool::new(false),
        }
    }
}

impl RecordingTransport {
    /// Make `message` the one found right before any command in its channel
    pub fn set_previous(&self, message: ChatMessage) {
        self.previous.lock().insert(message.channel_id, message);
    }

    /// Answer every delete with a platform refusal
    pub fn refuse_deletes(&self, refuse: bool) {
        self.refuse_deletes.store(refuse, Ordering::SeqCst);
    }

    pub fn reposts(&self) -> Vec<Repost> {
        self.reposts.lock().clone()
    }

    pub fn reactions(&self) -> Vec<(Snowflake, Vote)> {
        self.reactions.lock().clone()
    }

    pub fn deleted(&self) -> Vec<Snowflake> {
        self.deleted.lock().clone()
    }

    pub fn sent(&self) -> Vec<(Snowflake, String)> {
        self.sent.lock().clone()
    }

    /// Text of the last message sent to `channel_id`
    pub fn last_sent(&self, channel_id: Snowflake) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(channel, _)| *channel == channel_id)
            .map(|(_, text)| text.clone())
    }

    /// Hand out `id` again for the next repost
    pub fn reuse_post_id(&self, id: Snowflake) {
        self.next_id.store(id.into_inner(), Ordering::SeqCst);
    }

    fn next_id(&self) -> Snowflake {
        Snowflake::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn post_attachment(
        &self,
        channel_id: Snowflake,
        attachment: &Attachment,
        caption: Option<&str>,
    ) -> RepoResult<Snowflake> {
        let message_id = self.next_id();
        self.reposts.lock().push(Repost {
            channel_id,
            message_id,
            attachment_id: attachment.id,
            caption: caption.map(str::to_string),
        });
        Ok(message_id)
    }

    async fn add_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        vote: Vote,
    ) -> RepoResult<()> {
        self.reactions.lock().push((message_id, vote));
        Ok(())
    }

    async fn delete_message(&self, _channel_id: Snowflake, message_id: Snowflake) -> RepoResult<()> {
        if self.refuse_deletes.load(Ordering::SeqCst) {
            return Err(DomainError::RetractionFailed {
                post_id: message_id,
                reason: "platform answered 403 Forbidden".to_string(),
            });
        }
        self.deleted.lock().push(message_id);
        Ok(())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RepoResult<Snowflake> {
        self.sent.lock().push((channel_id, content.to_string()));
        Ok(self.next_id())
    }

    async fn previous_message(
        &self,
        channel_id: Snowflake,
        _before: Snowflake,
    ) -> RepoResult<Option<ChatMessage>> {
        Ok(self.previous.lock().get(&channel_id).cloned())
    }

    async fn channel_name(&self, channel_id: Snowflake) -> RepoResult<Option<String>> {
        Ok(match channel_id {
            CMD_CHANNEL => Some("bot-commands".to_string()),
            MEME_CHANNEL => Some("memes".to_string()),
            _ => None,
        })
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// A service context over in-memory ports, with handles to each port
pub struct TestBot {
    pub registry: Arc<InMemoryRegistry>,
    pub store: Arc<InMemoryConfigStore>,
    pub transport: Arc<RecordingTransport>,
    pub ctx: Arc<ServiceContext>,
}

impl TestBot {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(InMemoryRegistry::default()))
    }

    /// Share a registry between bots, as two runs of the same deployment would
    pub fn with_registry(registry: Arc<InMemoryRegistry>) -> Self {
        let store = Arc::new(InMemoryConfigStore::default());
        let transport = Arc::new(RecordingTransport::default());
        let ctx = Arc::new(ServiceContext::new(
            registry.clone(),
            store.clone(),
            transport.clone(),
            BotSettings {
                target_guild_id: GUILD,
                attribution_default: true,
            },
        ));
        Self {
            registry,
            store,
            transport,
            ctx,
        }
    }
}

impl Default for TestBot {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test data
// ============================================================================

pub fn attachment(id: i64) -> Attachment {
    Attachment {
        id: Snowflake::new(id),
        filename: format!("meme{id}.png"),
        content_type: Some("image/png".to_string()),
        size: 4096,
        url: format!("https://cdn.example.com/attachments/{id}/meme{id}.png"),
    }
}

/// A direct message from the submitter carrying `attachments` files
pub fn dm_with_attachments(attachments: usize) -> ChatMessage {
    ChatMessage {
        id: Snowflake::new(600),
        channel_id: DM_CHANNEL,
        author_id: SUBMITTER,
        content: String::new(),
        attachments: (0..attachments).map(|i| attachment(700 + i as i64)).collect(),
        created_at: Utc::now(),
    }
}

pub fn meme_post(id: i64) -> MemePost {
    MemePost::new(Snowflake::new(id), MEME_CHANNEL, GUILD, SUBMITTER)
}

pub fn downvote(post_id: Snowflake, user: i64) -> ReactionEvent {
    reaction(post_id, user, Vote::Down.symbol())
}

pub fn reaction(post_id: Snowflake, user: i64, emoji: &str) -> ReactionEvent {
    ReactionEvent {
        message_id: post_id,
        channel_id: MEME_CHANNEL,
        guild_id: Some(GUILD),
        user_id: Snowflake::new(user),
        emoji: emoji.to_string(),
    }
}

/// Guild member holding the admin role
pub fn admin() -> MemberInfo {
    MemberInfo {
        roles: vec![ADMIN_ROLE],
        permissions: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
    }
}

/// Guild member with the platform ADMINISTRATOR permission but no role
pub fn platform_admin() -> MemberInfo {
    MemberInfo {
        roles: Vec::new(),
        permissions: Permissions::ADMINISTRATOR,
    }
}

pub fn regular_member() -> MemberInfo {
    MemberInfo {
        roles: vec![Snowflake::new(901)],
        permissions: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
    }
}

/// A command typed in a guild channel
pub fn guild_command(channel_id: Snowflake, member: MemberInfo, content: &str) -> MessageReceivedEvent {
    MessageReceivedEvent {
        message_id: Snowflake::new(800),
        channel_id,
        guild_id: Some(GUILD),
        author_id: Snowflake::new(8),
        author_name: "mod".to_string(),
        author_is_bot: false,
        content: content.to_string(),
        member: Some(member),
    }
}

/// A command sent to the bot by direct message
pub fn direct_command(content: &str) -> MessageReceivedEvent {
    MessageReceivedEvent {
        message_id: Snowflake::new(601),
        channel_id: DM_CHANNEL,
        guild_id: None,
        author_id: SUBMITTER,
        author_name: "alice".to_string(),
        author_is_bot: false,
        content: content.to_string(),
        member: None,
    }
}

pub fn bot_event(message: MessageReceivedEvent) -> BotEvent {
    BotEvent::MessageReceived(message)
}
