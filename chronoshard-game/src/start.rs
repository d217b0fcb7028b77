//! Name entry and new-game construction.
use thiserror::Error;

use crate::config::GameConfig;
use crate::constants::HOME_AIRPORT;
use crate::state::{PlayerState, ShardSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("enter a name to start the game")]
    Empty,
    #[error("enter a valid name (letters required)")]
    NoLetters,
}

/// Trim a player name and require at least one ASCII letter.
///
/// # Errors
///
/// Returns `NameError::Empty` for blank input and `NameError::NoLetters`
/// when no ASCII letter is present.
pub fn validate_player_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(NameError::NoLetters);
    }
    Ok(name.to_string())
}

/// Build the opening state for a validated player.
///
/// # Errors
///
/// Propagates `NameError` from [`validate_player_name`].
pub fn start_game(raw_name: &str, cfg: &GameConfig) -> Result<PlayerState, NameError> {
    let name = validate_player_name(raw_name)?;
    Ok(PlayerState {
        name,
        credits: cfg.starting_credits,
        range: cfg.starting_range,
        shards: ShardSet::new(),
        current_location: HOME_AIRPORT.to_string(),
    })
}
