//! Centralized rule constants for ChronoShard travel logic.
//!
//! These are the defaults behind [`crate::config::GameConfig`]. A loaded
//! configuration may override the tuning values. The shard universe and the
//! home airport are part of the saved-game format, so `GameConfig` has no
//! field for them.

// Player start -------------------------------------------------------------
pub const STARTING_CREDITS: i64 = 1_000;
pub const STARTING_RANGE: i64 = 1_000;
pub const HOME_AIRPORT: &str = "EFHK";

// Shards -------------------------------------------------------------------
pub const SHARD_COUNT: usize = 5;

// Travel draws -------------------------------------------------------------
pub const TRAVEL_COST_MIN: i64 = 20;
pub const TRAVEL_COST_MAX: i64 = 200;
pub const SHARD_CHANCE: f64 = 0.5;
pub const BANDIT_CHANCE: f64 = 0.1;
pub const BANDIT_LOSS_MIN: i64 = 20;
pub const BANDIT_LOSS_MAX: i64 = 150;
pub const CREDIT_GAIN_CHANCE: f64 = 0.6;
pub const CREDIT_GAIN_MIN: i64 = 0;
pub const CREDIT_GAIN_MAX: i64 = 100;

// Purchases ----------------------------------------------------------------
pub const RANGE_PER_CREDIT: i64 = 2;

// RNG stream domain tags ---------------------------------------------------
pub(crate) const STREAM_COST: &[u8] = b"travel-cost";
pub(crate) const STREAM_SHARD: &[u8] = b"shard";
pub(crate) const STREAM_BANDIT: &[u8] = b"bandit";
pub(crate) const STREAM_CREDIT: &[u8] = b"credit";
