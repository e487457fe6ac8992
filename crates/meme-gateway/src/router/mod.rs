//! Incoming event routing
//!
//! The classifier decides which path an event takes; the command router runs
//! chat commands against the service layer and answers them.

mod classifier;
mod command_router;

pub use classifier::{EventClassifier, Route};
pub use command_router::CommandRouter;
