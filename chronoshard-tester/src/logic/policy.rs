use std::fmt;

use chronoshard_game::constants::HOME_AIRPORT;
use chronoshard_game::{AirportCatalog, GameConfig, PlayerState};
use clap::ValueEnum;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// What an automated player wants to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyAction {
    Travel(String),
    BuyRange(i64),
}

/// Policy interface for automated play strategies.
pub trait TravelPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Decide the next action for the current state.
    fn decide(
        &mut self,
        state: &PlayerState,
        catalog: &AirportCatalog,
        cfg: &GameConfig,
    ) -> PolicyAction;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TravelStrategy {
    /// Tour every airport in catalog order, refuel with half the wallet
    Greedy,
    /// Pick destinations at random, refuel on a coin flip
    Random,
    /// Shuttle to the nearest airport and buy only the range a trip can cost
    Cautious,
}

impl TravelStrategy {
    pub const ALL: [Self; 3] = [Self::Greedy, Self::Random, Self::Cautious];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greedy => "Greedy",
            Self::Random => "Random",
            Self::Cautious => "Cautious",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn TravelPolicy> {
        match self {
            Self::Greedy => Box::new(GreedyPolicy::default()),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Cautious => Box::new(CautiousPolicy),
        }
    }
}

impl fmt::Display for TravelStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Home once the collection is complete, otherwise `None`.
fn head_home(state: &PlayerState) -> Option<String> {
    state
        .shards
        .is_complete()
        .then(|| HOME_AIRPORT.to_string())
}

#[derive(Default)]
struct GreedyPolicy {
    cursor: usize,
}

impl TravelPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn decide(
        &mut self,
        state: &PlayerState,
        catalog: &AirportCatalog,
        cfg: &GameConfig,
    ) -> PolicyAction {
        if state.range < cfg.travel_cost.max && state.credits > 1 {
            return PolicyAction::BuyRange(state.credits / 2);
        }
        if let Some(home) = head_home(state) {
            return PolicyAction::Travel(home);
        }
        let destinations: Vec<&str> = catalog
            .destinations_from(&state.current_location)
            .map(|airport| airport.code.as_str())
            .collect();
        let code = destinations
            .get(self.cursor % destinations.len().max(1))
            .map_or_else(|| HOME_AIRPORT.to_string(), |code| (*code).to_string());
        self.cursor = self.cursor.wrapping_add(1);
        PolicyAction::Travel(code)
    }
}

struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl TravelPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn decide(
        &mut self,
        state: &PlayerState,
        catalog: &AirportCatalog,
        cfg: &GameConfig,
    ) -> PolicyAction {
        if state.range < cfg.travel_cost.max && state.credits > 0 && self.rng.gen_bool(0.5) {
            let spend = self.rng.gen_range(1..=state.credits);
            return PolicyAction::BuyRange(spend);
        }
        if let Some(home) = head_home(state) {
            return PolicyAction::Travel(home);
        }
        catalog
            .destinations_from(&state.current_location)
            .choose(&mut self.rng)
            .map_or_else(
                || PolicyAction::Travel(HOME_AIRPORT.to_string()),
                |airport| PolicyAction::Travel(airport.code.clone()),
            )
    }
}

struct CautiousPolicy;

impl CautiousPolicy {
    /// Credits kept back so a bandit cannot end the run outright.
    const RESERVE: i64 = 150;
}

impl TravelPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn decide(
        &mut self,
        state: &PlayerState,
        catalog: &AirportCatalog,
        cfg: &GameConfig,
    ) -> PolicyAction {
        let shortfall = cfg.travel_cost.max - state.range;
        if shortfall > 0 {
            let needed = (shortfall + cfg.range_per_credit - 1) / cfg.range_per_credit;
            let spendable = if state.credits > Self::RESERVE {
                state.credits - Self::RESERVE
            } else {
                state.credits - 1
            };
            let spend = needed.min(spendable);
            if spend > 0 {
                return PolicyAction::BuyRange(spend);
            }
        }
        if let Some(home) = head_home(state) {
            return PolicyAction::Travel(home);
        }
        if !state.is_at(HOME_AIRPORT) {
            return PolicyAction::Travel(HOME_AIRPORT.to_string());
        }
        catalog
            .destinations_from(&state.current_location)
            .min_by(|a, b| {
                a.distance_km
                    .unwrap_or(f64::MAX)
                    .total_cmp(&b.distance_km.unwrap_or(f64::MAX))
            })
            .map_or_else(
                || PolicyAction::Travel(HOME_AIRPORT.to_string()),
                |airport| PolicyAction::Travel(airport.code.clone()),
            )
    }
}
