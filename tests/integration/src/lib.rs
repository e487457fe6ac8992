//! Integration test utilities for MemeBot
//!
//! In-memory ports for driving the moderation flow end to end, plus mock
//! REST and gateway servers for the platform adapter.

pub mod fixtures;

pub use fixtures::*;
pub use helpers::*;
