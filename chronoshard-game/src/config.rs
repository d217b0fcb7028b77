//! Tunable rules for travel draws, purchases, and new games.
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::constants::{
    BANDIT_CHANCE, BANDIT_LOSS_MAX, BANDIT_LOSS_MIN, CREDIT_GAIN_CHANCE, CREDIT_GAIN_MAX,
    CREDIT_GAIN_MIN, RANGE_PER_CREDIT, SHARD_CHANCE, STARTING_CREDITS,
    STARTING_RANGE, TRAVEL_COST_MAX, TRAVEL_COST_MIN,
};

/// Inclusive integer bounds for a uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawBounds {
    pub min: i64,
    pub max: i64,
}

impl DrawBounds {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn range(self) -> RangeInclusive<i64> {
        self.min..=self.max
    }

    #[must_use]
    pub const fn contains(self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} must be between 0 and 1 (got {value:.3})")]
    Probability { field: &'static str, value: f64 },
    #[error("travel cost minimum must be at least 1 (got {0})")]
    FreeTravel(i64),
    #[error("range per credit must be positive (got {0})")]
    ExchangeRate(i64),
}

/// Rule set consumed by the resolver, evaluator, and purchase logic.
///
/// The home airport is not configurable; see [`crate::constants::HOME_AIRPORT`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_starting_credits")]
    pub starting_credits: i64,
    #[serde(default = "GameConfig::default_starting_range")]
    pub starting_range: i64,
    #[serde(default = "GameConfig::default_travel_cost")]
    pub travel_cost: DrawBounds,
    #[serde(default = "GameConfig::default_shard_chance")]
    pub shard_chance: f64,
    #[serde(default = "GameConfig::default_bandit_chance")]
    pub bandit_chance: f64,
    #[serde(default = "GameConfig::default_bandit_loss")]
    pub bandit_loss: DrawBounds,
    #[serde(default = "GameConfig::default_credit_gain_chance")]
    pub credit_gain_chance: f64,
    #[serde(default = "GameConfig::default_credit_gain")]
    pub credit_gain: DrawBounds,
    #[serde(default = "GameConfig::default_range_per_credit")]
    pub range_per_credit: i64,
}

impl GameConfig {
    #[must_use]
    pub const fn default_starting_credits() -> i64 {
        STARTING_CREDITS
    }

    #[must_use]
    pub const fn default_starting_range() -> i64 {
        STARTING_RANGE
    }

    #[must_use]
    pub const fn default_travel_cost() -> DrawBounds {
        DrawBounds::new(TRAVEL_COST_MIN, TRAVEL_COST_MAX)
    }

    #[must_use]
    pub const fn default_shard_chance() -> f64 {
        SHARD_CHANCE
    }

    #[must_use]
    pub const fn default_bandit_chance() -> f64 {
        BANDIT_CHANCE
    }

    #[must_use]
    pub const fn default_bandit_loss() -> DrawBounds {
        DrawBounds::new(BANDIT_LOSS_MIN, BANDIT_LOSS_MAX)
    }

    #[must_use]
    pub const fn default_credit_gain_chance() -> f64 {
        CREDIT_GAIN_CHANCE
    }

    #[must_use]
    pub const fn default_credit_gain() -> DrawBounds {
        DrawBounds::new(CREDIT_GAIN_MIN, CREDIT_GAIN_MAX)
    }

    #[must_use]
    pub const fn default_range_per_credit() -> i64 {
        RANGE_PER_CREDIT
    }

    /// Parse a configuration document and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or a value is out of bounds.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate bounds and probabilities.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates its documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_non_negative("starting_credits", self.starting_credits)?;
        Self::validate_non_negative("starting_range", self.starting_range)?;
        Self::validate_bounds("travel_cost", self.travel_cost)?;
        if self.travel_cost.min < 1 {
            return Err(ConfigError::FreeTravel(self.travel_cost.min));
        }
        Self::validate_bounds("bandit_loss", self.bandit_loss)?;
        Self::validate_bounds("credit_gain", self.credit_gain)?;
        Self::validate_probability("shard_chance", self.shard_chance)?;
        Self::validate_probability("bandit_chance", self.bandit_chance)?;
        Self::validate_probability("credit_gain_chance", self.credit_gain_chance)?;
        if self.range_per_credit <= 0 {
            return Err(ConfigError::ExchangeRate(self.range_per_credit));
        }
        Ok(())
    }

    fn validate_bounds(field: &'static str, bounds: DrawBounds) -> Result<(), ConfigError> {
        Self::validate_non_negative(field, bounds.min)?;
        if bounds.min > bounds.max {
            return Err(ConfigError::InvertedBounds {
                field,
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(())
    }

    fn validate_non_negative(field: &'static str, value: i64) -> Result<(), ConfigError> {
        if value < 0 {
            return Err(ConfigError::Negative { field, value });
        }
        Ok(())
    }

    fn validate_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Probability { field, value });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_credits: Self::default_starting_credits(),
            starting_range: Self::default_starting_range(),
            travel_cost: Self::default_travel_cost(),
            shard_chance: Self::default_shard_chance(),
            bandit_chance: Self::default_bandit_chance(),
            bandit_loss: Self::default_bandit_loss(),
            credit_gain_chance: Self::default_credit_gain_chance(),
            credit_gain: Self::default_credit_gain(),
            range_per_credit: Self::default_range_per_credit(),
        }
    }
}
