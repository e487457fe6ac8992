//! Result of feeding one reaction to the engine

use std::fmt;

/// What the engine did with a reaction event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The post is not watched (never was, already retracted, or unwatched)
    Unwatched,
    /// Not the down-vote symbol
    Ignored,
    /// The reactor had already down-voted this post
    Duplicate,
    /// A new down-voter was counted; `limit` is `None` when the lookup failed
    Counted { tally: usize, limit: Option<u32> },
    /// The tally exceeded the limit and the post was retracted
    Retracted,
}

impl WatchOutcome {
    /// Check if this outcome ended the watch
    #[inline]
    pub fn is_retracted(&self) -> bool {
        matches!(self, Self::Retracted)
    }
}

impl fmt::Display for WatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unwatched => write!(f, "unwatched"),
            Self::Ignored => write!(f, "ignored"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::Counted { tally, limit: Some(limit) } => write!(f, "counted {tally}/{limit}"),
            Self::Counted { tally, limit: None } => write!(f, "counted {tally}/?"),
            Self::Retracted => write!(f, "retracted"),
        }
    }
}
