//! A single playthrough: state, reference data, rules, and randomness together.
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::airports::AirportCatalog;
use crate::config::GameConfig;
use crate::events::{BlockReason, TravelEvent};
use crate::outcome::{Outcome, evaluate};
use crate::purchase::{PurchaseError, buy_range};
use crate::rng::{RandomSource, RngBundle};
use crate::start::{NameError, validate_player_name};
use crate::state::PlayerState;
use crate::travel::{TravelReport, resolve_travel};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown airport {0}")]
    UnknownAirport(String),
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Name(#[from] NameError),
}

/// Travel report paired with the classification of the resulting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelStep {
    pub report: TravelReport,
    pub outcome: Outcome,
}

/// Running tallies for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub trips: u32,
    pub blocked: u32,
    pub range_spent: i64,
    pub credits_stolen: i64,
    pub credits_gained: i64,
    pub range_bought: i64,
}

/// Owns the player state between actions and applies resolver results.
///
/// Outcomes are advisory: travel is still accepted after a win or loss.
#[derive(Debug, Clone)]
pub struct GameSession<R = RngBundle> {
    state: PlayerState,
    catalog: AirportCatalog,
    cfg: GameConfig,
    rng: R,
    stats: SessionStats,
}

impl<R: RandomSource> GameSession<R> {
    #[must_use]
    pub fn new(state: PlayerState, catalog: AirportCatalog, cfg: GameConfig, rng: R) -> Self {
        Self {
            state,
            catalog,
            cfg,
            rng,
            stats: SessionStats::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &AirportCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.state)
    }

    /// Resolve travel to the airport with `code` and adopt the new state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownAirport` when the code is not in the
    /// catalog. A blocked trip is not an error.
    pub fn travel_to(&mut self, code: &str) -> Result<TravelStep, SessionError> {
        let destination = self
            .catalog
            .get(code)
            .ok_or_else(|| SessionError::UnknownAirport(code.trim().to_ascii_uppercase()))?;
        let report = resolve_travel(&self.state, destination, &self.cfg, &mut self.rng);
        if let Some(reason) = report.blocked {
            self.stats.blocked += 1;
            if matches!(reason, BlockReason::NoCredits) {
                info!("{} cannot travel without credits", self.state.name);
            }
        } else {
            self.record_trip(&report);
            self.state = report.state.clone();
        }

        let outcome = self.outcome();
        if outcome.is_terminal() && report.can_travel() {
            info!(
                "{} reached outcome {outcome} at {} (credits {}, range {}, shards {})",
                self.state.name,
                self.state.current_location,
                self.state.credits,
                self.state.range,
                self.state.shard_count()
            );
        }
        Ok(TravelStep { report, outcome })
    }

    /// Exchange credits for range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Purchase` when the amount is rejected; the
    /// state is left as it was.
    pub fn buy_range(&mut self, credits: i64) -> Result<&PlayerState, SessionError> {
        let next = buy_range(&self.state, credits, &self.cfg)?;
        self.stats.range_bought += next.range - self.state.range;
        self.state = next;
        Ok(&self.state)
    }

    /// Replace the live state, e.g. after loading a save.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownAirport` when the location is not in the
    /// catalog and `SessionError::Name` for an invalid name. The live state is
    /// kept on error.
    pub fn restore(&mut self, mut state: PlayerState) -> Result<(), SessionError> {
        state.name = validate_player_name(&state.name)?;
        let Some(airport) = self.catalog.get(&state.current_location) else {
            return Err(SessionError::UnknownAirport(state.current_location));
        };
        state.current_location.clone_from(&airport.code);
        self.state = state;
        Ok(())
    }

    #[must_use]
    pub fn into_state(self) -> PlayerState {
        self.state
    }

    fn record_trip(&mut self, report: &TravelReport) {
        self.stats.trips += 1;
        self.stats.range_spent += report.cost;
        for event in &report.events {
            match event {
                TravelEvent::BanditLoss { amount } => self.stats.credits_stolen += amount,
                TravelEvent::CreditGain { amount } => self.stats.credits_gained += amount,
                TravelEvent::ShardFound { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::Airport;
    use crate::state::ShardId;

    fn catalog() -> AirportCatalog {
        AirportCatalog::new(
            vec![
                Airport::new("EFHK", "Helsinki-Vantaa", "Finland", Some(0.0)),
                Airport::new("EVRA", "Riga", "Latvia", Some(390.0)),
            ],
            "EFHK",
        )
        .unwrap()
    }

    fn session(seed: u64) -> GameSession {
        GameSession::new(
            PlayerState::new("Aino"),
            catalog(),
            GameConfig::default(),
            RngBundle::from_user_seed(seed),
        )
    }

    #[test]
    fn unknown_airport_is_rejected_without_draws() {
        let mut session = session(1);
        assert_eq!(
            session.travel_to("kjfk"),
            Err(SessionError::UnknownAirport("KJFK".to_string()))
        );
        assert_eq!(session.rng().draws().total(), 0);
        assert_eq!(session.state(), &PlayerState::new("Aino"));
    }

    #[test]
    fn successful_travel_updates_state_and_stats() {
        let mut session = session(42);
        let step = session.travel_to("evra").unwrap();
        assert!(step.report.can_travel());
        assert_eq!(session.state().current_location, "EVRA");
        assert_eq!(session.state().range, 1_000 - step.report.cost);
        assert_eq!(session.stats().trips, 1);
        assert_eq!(session.stats().range_spent, step.report.cost);
        assert_eq!(step.outcome, Outcome::Ongoing);
    }

    #[test]
    fn blocked_travel_leaves_state_alone() {
        let mut session = session(3);
        let mut low = PlayerState::new("Aino");
        low.range = 15;
        low.credits = 50;
        session.restore(low.clone()).unwrap();
        let step = session.travel_to("EVRA").unwrap();
        assert!(!step.report.can_travel());
        assert_eq!(session.state(), &low);
        assert_eq!(session.stats().blocked, 1);
    }

    #[test]
    fn restore_rejects_unknown_location_and_blank_name() {
        let mut session = session(4);
        let mut lost = PlayerState::new("Aino");
        lost.current_location = "NOWHERE".to_string();
        assert_eq!(
            session.restore(lost),
            Err(SessionError::UnknownAirport("NOWHERE".to_string()))
        );

        let mut nameless = PlayerState::new("");
        nameless.current_location = "EVRA".to_string();
        assert_eq!(
            session.restore(nameless),
            Err(SessionError::Name(NameError::Empty))
        );
        assert_eq!(session.state(), &PlayerState::new("Aino"));

        let mut padded = PlayerState::new("  Aino ");
        padded.current_location = "evra".to_string();
        session.restore(padded).unwrap();
        assert_eq!(session.state().name, "Aino");
        assert_eq!(session.state().current_location, "EVRA");
    }

    #[test]
    fn purchase_errors_keep_state() {
        let mut session = session(5);
        assert_eq!(
            session.buy_range(0),
            Err(SessionError::Purchase(PurchaseError::InvalidAmount(0)))
        );
        let state = session.buy_range(100).unwrap();
        assert_eq!(state.credits, 900);
        assert_eq!(session.stats().range_bought, 200);
    }

    #[test]
    fn travel_continues_after_a_win() {
        let mut session = session(9);
        let mut done = PlayerState::new("Aino");
        done.shards = ShardId::ALL.into_iter().collect();
        session.restore(done).unwrap();
        assert_eq!(session.outcome(), Outcome::Won);
        let step = session.travel_to("EVRA").unwrap();
        assert!(step.report.can_travel());
        assert_eq!(step.outcome, Outcome::Ongoing);
    }
}
