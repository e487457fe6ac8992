//! Gateway client tests
//!
//! `GatewayClient` against a scripted mock gateway, plus the health endpoints
//! reporting its session.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::*;
use meme_core::{BotEvent, Snowflake};
use meme_gateway::client::{ClientEvent, GatewayClient, GatewayClientConfig, GatewayError};
use meme_gateway::health::{self, HealthState};
use meme_gateway::protocol::CloseCode;
use meme_service::MemeWatchEngine;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};

const TOKEN: &str = "gateway-test-token";
const TIMEOUT: Duration = Duration::from_secs(5);

fn client(gateway: &MockGateway) -> GatewayClient {
    GatewayClient::new(GatewayClientConfig {
        url: gateway.url(),
        token: TOKEN.to_string(),
        initial_backoff: Duration::from_millis(20),
        max_backoff: Duration::from_millis(100),
    })
}

fn message_create(content: &str) -> Value {
    json!({
        "id": "800",
        "channel_id": "200",
        "guild_id": "100",
        "author": { "id": "8", "username": "mod" },
        "member": { "roles": ["900"], "permissions": "256" },
        "content": content,
        "timestamp": "2024-05-01T12:00:00Z",
    })
}

fn reaction_add(user_id: &str) -> Value {
    json!({
        "user_id": user_id,
        "channel_id": "201",
        "message_id": "55",
        "guild_id": "100",
        "emoji": { "id": null, "name": "👎" },
    })
}

#[tokio::test]
async fn test_session_delivers_ready_and_events() {
    let gateway = MockGateway::start(
        SessionScript::Serve,
        vec![
            ("MESSAGE_CREATE", message_create("mb status")),
            ("TYPING_START", json!({ "user_id": "8" })),
            ("MESSAGE_REACTION_ADD", reaction_add("11")),
        ],
    )
    .await
    .expect("Failed to start mock gateway");
    let client = client(&gateway);
    let status = client.status();
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = tokio::spawn(async move { client.run(events_tx, shutdown_rx).await });

    match within(TIMEOUT, events_rx.recv()).await {
        Some(ClientEvent::Ready { user_id, session_id }) => {
            assert_eq!(user_id, Snowflake::new(1));
            assert_eq!(session_id, "session-1");
        }
        other => panic!("expected Ready, got {other:?}"),
    }
    assert!(status.is_connected());

    match within(TIMEOUT, events_rx.recv()).await {
        Some(ClientEvent::Event(BotEvent::MessageReceived(message))) => {
            assert_eq!(message.content, "mb status");
            assert_eq!(message.guild_id, Some(Snowflake::new(100)));
            let member = message.member.unwrap();
            assert!(member.permissions.is_admin());
            assert!(member.roles.contains(&Snowflake::new(900)));
        }
        other => panic!("expected MessageReceived, got {other:?}"),
    }

    // Unknown dispatches are skipped
    match within(TIMEOUT, events_rx.recv()).await {
        Some(ClientEvent::Event(BotEvent::ReactionAdded(reaction))) => {
            assert_eq!(reaction.user_id, Snowflake::new(11));
            assert_eq!(reaction.message_id, Snowflake::new(55));
            assert!(reaction.is_downvote());
        }
        other => panic!("expected ReactionAdded, got {other:?}"),
    }

    let identifies = gateway.identifies();
    assert_eq!(identifies.len(), 1);
    assert_eq!(identifies[0]["token"], TOKEN);

    shutdown_tx.send(true).unwrap();
    let result = within(TIMEOUT, run).await.unwrap();
    assert!(result.is_ok());
    assert!(!status.is_connected());
}

#[tokio::test]
async fn test_heartbeats_are_sent_and_acknowledged() {
    let gateway = MockGateway::start_with_heartbeat(SessionScript::Serve, Vec::new(), 50)
        .await
        .expect("Failed to start mock gateway");
    let client = client(&gateway);
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = tokio::spawn(async move { client.run(events_tx, shutdown_rx).await });

    assert!(matches!(
        within(TIMEOUT, events_rx.recv()).await,
        Some(ClientEvent::Ready { .. })
    ));
    assert!(wait_until(TIMEOUT, || gateway.heartbeats() >= 3).await);
    // Acknowledged heartbeats keep the first session alive
    assert_eq!(gateway.sessions(), 1);

    shutdown_tx.send(true).unwrap();
    assert!(within(TIMEOUT, run).await.unwrap().is_ok());
}

#[tokio::test]
async fn test_reconnects_after_recoverable_close() {
    let gateway = MockGateway::start(SessionScript::CloseAfterIdentify(4000), Vec::new())
        .await
        .expect("Failed to start mock gateway");
    let client = client(&gateway);
    let (events_tx, _events_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = tokio::spawn(async move { client.run(events_tx, shutdown_rx).await });

    assert!(wait_until(TIMEOUT, || gateway.sessions() >= 3).await);

    shutdown_tx.send(true).unwrap();
    assert!(within(TIMEOUT, run).await.unwrap().is_ok());
}

#[tokio::test]
async fn test_authentication_failure_stops_the_client() {
    let gateway = MockGateway::start(SessionScript::CloseAfterIdentify(4004), Vec::new())
        .await
        .expect("Failed to start mock gateway");
    let client = client(&gateway);
    let (events_tx, _events_rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let result = within(TIMEOUT, client.run(events_tx, shutdown_rx)).await;

    assert!(matches!(
        result,
        Err(GatewayError::Closed(CloseCode::AuthenticationFailed))
    ));
    assert_eq!(gateway.sessions(), 1);
}

// ============================================================================
// Health endpoints
// ============================================================================

#[tokio::test]
async fn test_readiness_follows_the_gateway_session() {
    let gateway = MockGateway::start(SessionScript::Serve, Vec::new())
        .await
        .expect("Failed to start mock gateway");
    let client = client(&gateway);

    let bot = TestBot::new();
    let engine = MemeWatchEngine::new(&bot.ctx);
    engine.watch(&meme_post(1)).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let health_url = format!("http://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut health_shutdown = shutdown_rx.clone();
    let health = tokio::spawn(health::serve(
        listener,
        HealthState::new(engine.clone(), client.status()),
        async move {
            let _ = health_shutdown.changed().await;
        },
    ));

    let http = reqwest::Client::new();
    let live = http.get(format!("{health_url}/health")).send().await.unwrap();
    assert_eq!(live.status(), reqwest::StatusCode::OK);

    let ready = http.get(format!("{health_url}/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = ready.json().await.unwrap();
    assert_eq!(body["checks"]["gateway"], "unhealthy");
    assert_eq!(body["checks"]["database"], "not_configured");

    let (events_tx, mut events_rx) = mpsc::channel(16);
    let gateway_shutdown = shutdown_rx.clone();
    let run = tokio::spawn(async move { client.run(events_tx, gateway_shutdown).await });
    assert!(matches!(
        within(TIMEOUT, events_rx.recv()).await,
        Some(ClientEvent::Ready { .. })
    ));

    let ready = http.get(format!("{health_url}/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), reqwest::StatusCode::OK);
    let body: Value = ready.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["watched_posts"], 1);

    drop(http);
    shutdown_tx.send(true).unwrap();
    assert!(within(TIMEOUT, run).await.unwrap().is_ok());
    assert!(within(TIMEOUT, health).await.unwrap().is_ok());
}
