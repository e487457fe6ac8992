//! Downvote moderation engine
//!
//! One worker task per watched post consumes that post's reactions in arrival
//! order and retracts the post once its distinct down-voters exceed the
//! guild's limit.

mod bootstrap;
mod outcome;
mod watch_engine;

pub use bootstrap::{resume_watches, retry_abandoned, BootstrapReport};
pub use outcome::WatchOutcome;
pub use watch_engine::MemeWatchEngine;
