//! Win/loss classification after a travel action.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::HOME_AIRPORT;
use crate::state::PlayerState;

/// Advisory game status. Nothing in the core stops play after a terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
}

impl Outcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// Banner text for terminal outcomes.
    #[must_use]
    pub const fn headline(self) -> Option<&'static str> {
        match self {
            Self::Ongoing => None,
            Self::Won => Some("You collected all shards and returned home. YOU WIN!"),
            Self::Lost => Some("You ran out of credits or range. GAME OVER!"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// Classify `state`. A win takes priority over a loss.
#[must_use]
pub fn evaluate(state: &PlayerState) -> Outcome {
    if state.shards.is_complete() && state.is_at(HOME_AIRPORT) {
        Outcome::Won
    } else if state.credits <= 0 || state.range <= 0 {
        Outcome::Lost
    } else {
        Outcome::Ongoing
    }
}
