//! Command routing tests
//!
//! Chat commands through the router and the event loop, over in-memory ports.
//!
//! Run with: cargo test -p integration-tests --test router_tests

use std::sync::Arc;
use std::time::Duration;

use integration_tests::*;
use meme_core::{BotEvent, GuildConfigStore, MemeRegistry};
use meme_gateway::client::ClientEvent;
use meme_gateway::{CommandRouter, EventClassifier, EventLoop};
use meme_service::{MemeWatchEngine, ReplyStatus};

const PREFIX: &str = "mb";

fn router(bot: &TestBot, engine: &MemeWatchEngine) -> CommandRouter {
    CommandRouter::new(Arc::clone(&bot.ctx), engine.clone(), PREFIX)
}

async fn initialized_bot() -> TestBot {
    let bot = TestBot::new();
    bot.store.set_admin_role(GUILD, ADMIN_ROLE).await.unwrap();
    bot.store.set_cmd_channel(GUILD, CMD_CHANNEL).await.unwrap();
    bot
}

// ============================================================================
// Guild commands
// ============================================================================

#[tokio::test]
async fn test_init_sets_role_and_cmd_channel() {
    let bot = TestBot::new();
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, platform_admin(), "mb init <@&900>"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(
        reply.text,
        "We've set the admin role to <@&900> and the cmd channel to #bot-commands"
    );
    let config = bot.store.config(GUILD);
    assert_eq!(config.admin_role_id, Some(ADMIN_ROLE));
    assert_eq!(config.cmd_channel_id, Some(CMD_CHANNEL));
}

#[tokio::test]
async fn test_init_works_outside_the_cmd_channel() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(OTHER_CHANNEL, admin(), "mb i <@&900>"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(bot.store.config(GUILD).cmd_channel_id, Some(OTHER_CHANNEL));
}

#[tokio::test]
async fn test_commands_outside_cmd_channel_are_ignored() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);
    let router = router(&bot, &engine);

    assert!(router
        .respond(&guild_command(OTHER_CHANNEL, admin(), "mb limit 3"))
        .await
        .is_none());
    assert!(router
        .respond(&guild_command(OTHER_CHANNEL, admin(), "mb status"))
        .await
        .is_none());
    assert_eq!(bot.store.config(GUILD).downvote_limit, None);
}

#[tokio::test]
async fn test_mutations_need_moderation_rights() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);
    let router = router(&bot, &engine);

    let reply = router
        .respond(&guild_command(CMD_CHANNEL, regular_member(), "mb limit 3"))
        .await
        .unwrap();
    assert_eq!(reply.status, ReplyStatus::Error);
    assert_eq!(reply.text, "You need the admin role to set the downvote limit.");
    assert_eq!(bot.store.config(GUILD).downvote_limit, None);

    // Reading needs no rights
    let reply = router
        .respond(&guild_command(CMD_CHANNEL, regular_member(), "mb limit"))
        .await
        .unwrap();
    assert_eq!(reply.text, "The downvote limit is 5");
}

#[tokio::test]
async fn test_platform_administrators_bypass_the_role() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, platform_admin(), "mb meme <#201>"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(reply.text, "We've set the meme channel to #memes");
    assert_eq!(bot.store.config(GUILD).meme_channel_id, Some(MEME_CHANNEL));
}

#[tokio::test]
async fn test_channel_show_set_disable() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);
    let router = router(&bot, &engine);
    let run = |line: &'static str| {
        let router = &router;
        async move {
            router
                .respond(&guild_command(CMD_CHANNEL, admin(), line))
                .await
                .unwrap()
                .text
        }
    };

    assert_eq!(run("mb meme").await, "The meme channel is disabled.");
    assert_eq!(run("mb m <#201>").await, "We've set the meme channel to #memes");
    assert_eq!(run("mb meme").await, "The meme channel is set to #memes");
    // A channel the bot cannot name is shown as a mention
    assert_eq!(run("mb m <#202>").await, "We've set the meme channel to <#202>");
    assert_eq!(run("mb meme --disable").await, "We successfully disabled the meme channel.");
    assert_eq!(run("mb meme").await, "The meme channel is disabled.");

    assert_eq!(run("mb cmd").await, "The cmd channel is set to #bot-commands");
    assert_eq!(run("mb c -d").await, "We successfully disabled the cmd channel.");
    assert_eq!(bot.store.config(GUILD).cmd_channel_id, None);
}

#[tokio::test]
async fn test_commands_anywhere_once_cmd_channel_disabled() {
    let bot = initialized_bot().await;
    bot.store.disable_cmd_channel(GUILD).await.unwrap();
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(OTHER_CHANNEL, admin(), "mb limit 2"))
        .await
        .unwrap();

    assert_eq!(reply.text, "We've set the downvote limit to 2");
    assert_eq!(bot.store.config(GUILD).downvote_limit, Some(2));
}

#[tokio::test]
async fn test_invalid_channel_reference() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, admin(), "mb meme memes"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Error);
    assert_eq!(reply.text, "We couldn't set the meme channel.\nThat's all we know.");
    assert_eq!(bot.store.config(GUILD).meme_channel_id, None);
}

#[tokio::test]
async fn test_zero_limit_is_a_usage_error() {
    let bot = initialized_bot().await;
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, admin(), "mb limit 0"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Error);
    assert!(reply.text.starts_with("```"));
    assert_eq!(bot.store.config(GUILD).downvote_limit, None);
}

#[tokio::test]
async fn test_status_lists_every_setting() {
    let bot = initialized_bot().await;
    bot.store.set_meme_channel(GUILD, MEME_CHANNEL).await.unwrap();
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, regular_member(), "mb status"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Info);
    assert!(reply.text.contains("Meme channel: #memes"));
    assert!(reply.text.contains("Cmd channel: #bot-commands"));
    assert!(reply.text.contains("Admin role: <@&900>"));
    assert!(reply.text.contains("Downvote limit: 5 (default)"));
}

#[tokio::test]
async fn test_help_without_subcommand() {
    let bot = TestBot::new();
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, regular_member(), "mb"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Info);
    assert!(reply.text.contains("init"));
    assert!(reply.text.contains("limit"));
}

#[tokio::test]
async fn test_non_commands_are_not_answered() {
    let bot = TestBot::new();
    let engine = MemeWatchEngine::new(&bot.ctx);
    let router = router(&bot, &engine);

    for content in ["hello there", "mbstatus", "please mb status"] {
        assert!(router
            .respond(&guild_command(CMD_CHANNEL, admin(), content))
            .await
            .is_none());
    }
}

#[tokio::test]
async fn test_post_in_guild_points_to_direct_messages() {
    let bot = TestBot::new();
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&guild_command(CMD_CHANNEL, admin(), "mb post"))
        .await
        .unwrap();

    assert_eq!(reply.text, "Send this command to us in a direct message.");
}

// ============================================================================
// Direct messages
// ============================================================================

#[tokio::test]
async fn test_post_by_direct_message() {
    let bot = TestBot::new();
    bot.store.set_meme_channel(GUILD, MEME_CHANNEL).await.unwrap();
    bot.transport.set_previous(dm_with_attachments(1));
    let engine = MemeWatchEngine::new(&bot.ctx);

    router(&bot, &engine).handle(&direct_command("mb post")).await;

    assert_eq!(
        bot.transport.last_sent(DM_CHANNEL).as_deref(),
        Some("✅ Your meme has been posted.")
    );
    let reposts = bot.transport.reposts();
    assert_eq!(reposts.len(), 1);
    assert!(bot.registry.contains(reposts[0].message_id));
    assert!(engine.is_watching(reposts[0].message_id));
}

#[tokio::test]
async fn test_post_with_no_attribution_flag() {
    let bot = TestBot::new();
    bot.store.set_meme_channel(GUILD, MEME_CHANNEL).await.unwrap();
    bot.transport.set_previous(dm_with_attachments(1));
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&direct_command("mb p --no-attribution"))
        .await
        .unwrap();

    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(bot.transport.reposts()[0].caption, None);
}

#[tokio::test]
async fn test_post_failures_are_explained() {
    let bot = TestBot::new();
    bot.transport.set_previous(dm_with_attachments(1));
    let engine = MemeWatchEngine::new(&bot.ctx);
    let router = router(&bot, &engine);

    let reply = router.respond(&direct_command("mb post")).await.unwrap();
    assert_eq!(reply.status, ReplyStatus::Error);
    assert!(reply.text.contains("doesn't allow for memes"));

    bot.store.set_meme_channel(GUILD, MEME_CHANNEL).await.unwrap();
    bot.transport.set_previous(dm_with_attachments(3));
    let reply = router.respond(&direct_command("mb post")).await.unwrap();
    assert_eq!(
        reply.text,
        "The previous message needs to contain exactly one attachment"
    );
    assert!(bot.registry.is_empty());
}

#[tokio::test]
async fn test_guild_commands_refused_in_direct_messages() {
    let bot = TestBot::new();
    let engine = MemeWatchEngine::new(&bot.ctx);

    let reply = router(&bot, &engine)
        .respond(&direct_command("mb limit 3"))
        .await
        .unwrap();

    assert_eq!(reply.text, "This command only works in a guild channel.");
    assert_eq!(bot.store.config(GUILD).downvote_limit, None);
}

// ============================================================================
// Event loop
// ============================================================================

#[tokio::test]
async fn test_event_loop_routes_commands_and_votes() {
    let bot = initialized_bot().await;
    bot.store.set_meme_channel(GUILD, MEME_CHANNEL).await.unwrap();
    bot.store.set_downvote_limit(GUILD, 1).await.unwrap();
    bot.transport.set_previous(dm_with_attachments(1));
    let engine = MemeWatchEngine::new(&bot.ctx);
    let mut event_loop = EventLoop::new(
        EventClassifier::new(PREFIX),
        Arc::new(router(&bot, &engine)),
        engine.clone(),
    );

    assert!(event_loop
        .handle(ClientEvent::Ready {
            user_id: BOT_USER,
            session_id: "s".to_string(),
        })
        .is_none());

    let task = event_loop
        .handle(ClientEvent::Event(bot_event(direct_command("mb post"))))
        .unwrap();
    task.await.unwrap();
    let post_id = bot.transport.reposts()[0].message_id;
    assert!(engine.is_watching(post_id));

    for user in [11, 12] {
        let event = ClientEvent::Event(BotEvent::ReactionAdded(downvote(post_id, user)));
        assert!(event_loop.handle(event).is_none());
    }

    assert!(wait_until(Duration::from_secs(2), || bot.registry.is_empty()).await);
    assert_eq!(bot.transport.deleted(), vec![post_id]);
}

#[tokio::test]
async fn test_event_loop_ignores_the_bot_itself() {
    let bot = TestBot::new();
    bot.store.set_downvote_limit(GUILD, 1).await.unwrap();
    let engine = MemeWatchEngine::new(&bot.ctx);
    let post = meme_post(42);
    bot.registry.add(&post).await.unwrap();
    engine.watch(&post).unwrap();

    let mut event_loop = EventLoop::new(
        EventClassifier::new(PREFIX),
        Arc::new(router(&bot, &engine)),
        engine.clone(),
    );
    event_loop.handle(ClientEvent::Ready {
        user_id: BOT_USER,
        session_id: "s".to_string(),
    });

    // The bot's own seeded reactions must not count
    for _ in 0..3 {
        let event = ClientEvent::Event(BotEvent::ReactionAdded(downvote(post.id, BOT_USER.into_inner())));
        event_loop.handle(event);
    }
    let mut own_message = direct_command("mb status");
    own_message.author_id = BOT_USER;
    assert!(event_loop
        .handle(ClientEvent::Event(bot_event(own_message)))
        .is_none());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(bot.transport.deleted().is_empty());
    assert!(engine.is_watching(post.id));
    assert!(bot.transport.sent().is_empty());
    assert_eq!(engine.watched_count(), 1);
}
