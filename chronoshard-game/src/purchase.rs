//! Range-for-credits exchange.
use thiserror::Error;

use crate::config::GameConfig;
use crate::state::PlayerState;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("please enter a positive number of credits (got {0})")]
    InvalidAmount(i64),
    #[error("not enough credits: wanted {requested}, have {available}")]
    InsufficientCredits { requested: i64, available: i64 },
}

/// Spend credits for range at the configured rate (1 credit buys 2 range by default).
///
/// # Errors
///
/// Returns `PurchaseError::InvalidAmount` for a non-positive amount and
/// `PurchaseError::InsufficientCredits` when the amount exceeds the balance.
/// The input state is never modified.
pub fn buy_range(
    state: &PlayerState,
    credits_to_spend: i64,
    cfg: &GameConfig,
) -> Result<PlayerState, PurchaseError> {
    if credits_to_spend <= 0 {
        return Err(PurchaseError::InvalidAmount(credits_to_spend));
    }
    if credits_to_spend > state.credits {
        return Err(PurchaseError::InsufficientCredits {
            requested: credits_to_spend,
            available: state.credits,
        });
    }
    let mut next = state.clone();
    next.credits -= credits_to_spend;
    next.range = next
        .range
        .saturating_add(credits_to_spend.saturating_mul(cfg.range_per_credit));
    Ok(next)
}

/// Parse raw purchase input the way the buy dialog does, then purchase.
///
/// Only the leading integer counts: `"12.5"` and `"12 credits"` spend 12.
///
/// # Errors
///
/// Input without a leading integer is reported as `InvalidAmount(0)`.
pub fn buy_range_from_input(
    state: &PlayerState,
    input: &str,
    cfg: &GameConfig,
) -> Result<PlayerState, PurchaseError> {
    buy_range(state, leading_integer(input), cfg)
}

/// Optional sign followed by digits; anything after is ignored. Values too
/// large for `i64` clamp to the nearest bound.
fn leading_integer(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 0;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}
