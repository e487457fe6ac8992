//! MemeWatchEngine - per-post workers applying the removal policy

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use meme_core::entities::MemePost;
use meme_core::error::DomainError;
use meme_core::events::ReactionEvent;
use meme_core::traits::{ChatTransport, GuildConfigStore, MemeRegistry};
use meme_core::value_objects::Snowflake;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::services::{ServiceContext, ServiceError, ServiceResult};

use super::outcome::WatchOutcome;

/// One queued reaction, optionally with a channel for its outcome
struct WatchCommand {
    event: ReactionEvent,
    reply: Option<oneshot::Sender<WatchOutcome>>,
}

/// Map entry for a watched post
struct WatchHandle {
    generation: u64,
    tx: mpsc::UnboundedSender<WatchCommand>,
}

struct EngineInner {
    watches: DashMap<Snowflake, WatchHandle>,
    registry: Arc<dyn MemeRegistry>,
    config_store: Arc<dyn GuildConfigStore>,
    transport: Arc<dyn ChatTransport>,
    next_generation: AtomicU64,
    stopped: AtomicBool,
    workers: Mutex<JoinSet<()>>,
}

/// Watches tracked posts and retracts those voted down
///
/// Cloning is cheap; clones share the same set of watches.
#[derive(Clone)]
pub struct MemeWatchEngine {
    inner: Arc<EngineInner>,
}

impl MemeWatchEngine {
    /// Create an engine over the context's ports
    pub fn new(ctx: &ServiceContext) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                watches: DashMap::new(),
                registry: ctx.registry_arc(),
                config_store: ctx.config_store_arc(),
                transport: ctx.transport_arc(),
                next_generation: AtomicU64::new(1),
                stopped: AtomicBool::new(false),
                workers: Mutex::new(JoinSet::new()),
            }),
        }
    }

    /// Start watching a post
    ///
    /// Returns `false` if the post is already watched. Must be called from
    /// within a Tokio runtime.
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    pub fn watch(&self, post: &MemePost) -> ServiceResult<bool> {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return Err(ServiceError::EngineStopped);
        }
        if post.id.is_zero() {
            return Err(ServiceError::validation("meme post id must be non-zero"));
        }

        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let rx = match self.inner.watches.entry(post.id) {
            Entry::Occupied(_) => {
                debug!("Meme post already watched");
                return Ok(false);
            }
            Entry::Vacant(slot) => {
                let (tx, rx) = mpsc::unbounded_channel();
                slot.insert(WatchHandle { generation, tx });
                rx
            }
        };

        let inner = Arc::clone(&self.inner);
        let post = post.clone();
        let mut workers = self.inner.workers.lock();
        while workers.try_join_next().is_some() {}
        workers.spawn(run_worker(inner, post, generation, rx));

        info!("Meme post watch established");
        Ok(true)
    }

    /// Feed a reaction and wait for its outcome
    pub async fn process(&self, event: ReactionEvent) -> ServiceResult<WatchOutcome> {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return Err(ServiceError::EngineStopped);
        }

        let (tx, rx) = oneshot::channel();
        if !self.enqueue(event, Some(tx)) {
            return Ok(WatchOutcome::Unwatched);
        }
        // A dropped sender means the watch ended before this event was evaluated
        Ok(rx.await.unwrap_or(WatchOutcome::Unwatched))
    }

    /// Feed a reaction without waiting; returns whether it was queued
    pub fn dispatch(&self, event: ReactionEvent) -> bool {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return false;
        }
        self.enqueue(event, None)
    }

    fn enqueue(&self, event: ReactionEvent, reply: Option<oneshot::Sender<WatchOutcome>>) -> bool {
        let Some(handle) = self.inner.watches.get(&event.message_id) else {
            return false;
        };
        handle.tx.send(WatchCommand { event, reply }).is_ok()
    }

    /// Check if a post is currently watched
    pub fn is_watching(&self, post_id: Snowflake) -> bool {
        self.inner.watches.contains_key(&post_id)
    }

    /// Number of watched posts
    pub fn watched_count(&self) -> usize {
        self.inner.watches.len()
    }

    /// Check if the engine still accepts work
    pub fn is_running(&self) -> bool {
        !self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Stop accepting events and wait for queued work to finish
    ///
    /// Returns `false` if workers were still busy when `timeout` elapsed; those
    /// are aborted.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        if self.inner.stopped.swap(true, Ordering::SeqCst) {
            return true;
        }

        // Dropping the senders lets each worker drain its queue and exit
        self.inner.watches.clear();
        let mut workers = std::mem::take(&mut *self.inner.workers.lock());
        let pending = workers.len();

        let drained = tokio::time::timeout(timeout, async {
            while workers.join_next().await.is_some() {}
        })
        .await
        .is_ok();

        if drained {
            info!(workers = pending, "Watch engine stopped");
        } else {
            warn!(workers = workers.len(), "Watch engine shutdown timed out, aborting workers");
            workers.abort_all();
        }
        drained
    }
}

impl std::fmt::Debug for MemeWatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeWatchEngine")
            .field("watched", &self.watched_count())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_worker(
    inner: Arc<EngineInner>,
    post: MemePost,
    generation: u64,
    mut rx: mpsc::UnboundedReceiver<WatchCommand>,
) {
    let mut downvoters = HashSet::new();

    while let Some(command) = rx.recv().await {
        let outcome = inner
            .evaluate(&post, generation, &mut downvoters, &command.event)
            .await;
        if let Some(reply) = command.reply {
            let _ = reply.send(outcome);
        }
        if outcome.is_retracted() {
            break;
        }
    }
}

impl EngineInner {
    async fn evaluate(
        &self,
        post: &MemePost,
        generation: u64,
        downvoters: &mut HashSet<Snowflake>,
        event: &ReactionEvent,
    ) -> WatchOutcome {
        if !event.is_downvote() {
            return WatchOutcome::Ignored;
        }
        if !downvoters.insert(event.user_id) {
            return WatchOutcome::Duplicate;
        }
        let tally = downvoters.len();

        let limit = match self.config_store.get_downvote_limit(post.guild_id).await {
            Ok(limit) => limit,
            Err(e) => {
                warn!(
                    post_id = %post.id,
                    guild_id = %post.guild_id,
                    tally,
                    error = %e,
                    "Downvote limit lookup failed, threshold check skipped"
                );
                return WatchOutcome::Counted { tally, limit: None };
            }
        };

        debug!(post_id = %post.id, user_id = %event.user_id, tally, limit, "Downvote counted");

        if u32::try_from(tally).map_or(true, |tally| tally > limit) {
            info!(post_id = %post.id, tally, limit, "Downvote limit exceeded");
            self.retract(post, generation).await;
            WatchOutcome::Retracted
        } else {
            WatchOutcome::Counted {
                tally,
                limit: Some(limit),
            }
        }
    }

    /// Best-effort delete, then unconditional registry removal
    async fn retract(&self, post: &MemePost, generation: u64) {
        // Later events for this id must see the watch gone before we yield
        self.watches
            .remove_if(&post.id, |_, handle| handle.generation == generation);

        if let Err(e) = self.transport.delete_message(post.channel_id, post.id).await {
            let e = match e {
                e @ DomainError::RetractionFailed { .. } => e,
                other => DomainError::RetractionFailed {
                    post_id: post.id,
                    reason: other.to_string(),
                },
            };
            warn!(post_id = %post.id, error = %e, "Retraction failed");
        }

        match self.registry.remove(post.id).await {
            Ok(()) => info!(post_id = %post.id, "Meme post retracted and removed from registry"),
            Err(e) => error!(
                post_id = %post.id,
                transient = e.is_transient(),
                error = %e,
                "Failed to remove meme post from registry"
            ),
        }
    }
}
