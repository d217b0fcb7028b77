//! Travel events reported back to the presentation layer.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::state::ShardId;

/// Inline storage for the at most three events a single trip can produce.
pub type TravelEvents = SmallVec<[TravelEvent; 3]>;

/// Something that happened on the way to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TravelEvent {
    #[serde(rename = "shard")]
    ShardFound { shard: ShardId },
    /// `amount` is the drawn loss, even when the balance was clipped at zero.
    #[serde(rename = "bandit")]
    BanditLoss { amount: i64 },
    #[serde(rename = "credit")]
    CreditGain { amount: i64 },
}

impl fmt::Display for TravelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShardFound { shard } => write!(f, "You found a ChronoShard ({shard})!"),
            Self::BanditLoss { amount } => write!(f, "Lost {amount} credits to bandits."),
            Self::CreditGain { amount } => write!(f, "Gained {amount} credits."),
        }
    }
}

/// Why a travel request did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BlockReason {
    InsufficientRange { required: i64, available: i64 },
    NoCredits,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientRange {
                required,
                available,
            } => write!(
                f,
                "Not enough range. Required {required}, you have {available}."
            ),
            Self::NoCredits => f.write_str("You have 0 credits."),
        }
    }
}
