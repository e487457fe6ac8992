//! Restart recovery - resume watching every post tracked before shutdown

use std::time::Duration;

use meme_core::entities::MemePost;
use meme_core::value_objects::Snowflake;
use tracing::{info, instrument, warn};

use crate::services::{ServiceContext, ServiceResult};

use super::watch_engine::MemeWatchEngine;

/// Result of a bootstrap pass
#[derive(Debug, Default)]
pub struct BootstrapReport {
    /// Posts now watched
    pub resumed: Vec<Snowflake>,
    /// Posts that already had a watch
    pub already_watched: usize,
    /// Posts whose watch could not be established, with the reason
    pub abandoned: Vec<(MemePost, String)>,
}

impl BootstrapReport {
    /// Check if every post is watched
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.abandoned.is_empty()
    }

    /// The abandoned posts, for a later retry
    pub fn abandoned_posts(&self) -> Vec<MemePost> {
        self.abandoned.iter().map(|(post, _)| post.clone()).collect()
    }
}

/// Re-establish a watch for every post in the registry
///
/// A failure for one post is logged and recorded; it never stops the others.
///
/// # Errors
/// Fails only if the registry itself cannot be read.
#[instrument(skip_all)]
pub async fn resume_watches(
    ctx: &ServiceContext,
    engine: &MemeWatchEngine,
) -> ServiceResult<BootstrapReport> {
    let posts = ctx.registry().all().await?;
    let report = watch_all(engine, posts);

    info!(
        resumed = report.resumed.len(),
        already_watched = report.already_watched,
        abandoned = report.abandoned.len(),
        "Meme post watches resumed"
    );
    Ok(report)
}

/// Wait `delay`, then try once more to watch previously abandoned posts
pub async fn retry_abandoned(
    engine: &MemeWatchEngine,
    posts: Vec<MemePost>,
    delay: Duration,
) -> BootstrapReport {
    tokio::time::sleep(delay).await;
    let report = watch_all(engine, posts);

    for (post, reason) in &report.abandoned {
        warn!(post_id = %post.id, reason = %reason, "Meme post left unwatched after retry");
    }
    report
}

fn watch_all(engine: &MemeWatchEngine, posts: Vec<MemePost>) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    for post in posts {
        match engine.watch(&post) {
            Ok(true) => report.resumed.push(post.id),
            Ok(false) => report.already_watched += 1,
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "Meme post watch abandoned");
                report.abandoned.push((post, e.to_string()));
            }
        }
    }
    report
}
