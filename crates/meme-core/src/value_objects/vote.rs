//! Vote reactions seeded on every meme post

use std::fmt;

/// The two reactions the bot seeds on a meme post
///
/// Only [`Vote::Down`] counts toward retraction; [`Vote::Up`] is for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Seeding order on a fresh post
    pub const SEED_ORDER: [Vote; 2] = [Vote::Up, Vote::Down];

    /// The emoji the platform reports for this vote
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Up => "👍",
            Self::Down => "👎",
        }
    }

    /// Recognize a reaction symbol; any other emoji is not a vote
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "👍" => Some(Self::Up),
            "👎" => Some(Self::Down),
            _ => None,
        }
    }

    /// Check whether a raw reaction symbol is the down-vote
    #[inline]
    #[must_use]
    pub fn is_downvote(symbol: &str) -> bool {
        Self::from_symbol(symbol) == Some(Self::Down)
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
