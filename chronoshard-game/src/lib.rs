//! ChronoShard Game Engine
//!
//! Platform-agnostic core logic for the ChronoShard airport travel game.
//! This crate resolves travel events, classifies win/loss, and handles the
//! range exchange without any UI or platform-specific dependencies.

pub mod airports;
pub mod config;
pub mod constants;
pub mod data;
pub mod events;
pub mod outcome;
pub mod purchase;
pub mod rng;
pub mod session;
pub mod start;
pub mod state;
pub mod storage;
pub mod travel;

use log::{info, warn};

use crate::constants::HOME_AIRPORT;
use serde::de::DeserializeOwned;

// Re-export commonly used types
pub use airports::{Airport, AirportCatalog, CatalogError};
pub use config::{ConfigError, DrawBounds, GameConfig};
pub use data::{DataError, EmbeddedDataLoader};
pub use events::{BlockReason, TravelEvent, TravelEvents};
pub use outcome::{Outcome, evaluate};
pub use purchase::{PurchaseError, buy_range, buy_range_from_input};
pub use rng::{DrawCounts, DrawKind, RandomSource, RngBundle, RngSource};
pub use session::{GameSession, SessionError, SessionStats, TravelStep};
pub use start::{NameError, start_game, validate_player_name};
pub use state::{PlayerState, ShardId, ShardSet};
pub use storage::MemoryStorage;
pub use travel::{TravelReport, resolve_travel};

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the airport catalog, validated against `home`.
    ///
    /// # Errors
    ///
    /// Returns an error if the airport data cannot be loaded or is invalid.
    fn load_airports(&self, home: &str) -> Result<AirportCatalog, Self::Error>;

    /// Load configuration data by name
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: DeserializeOwned;
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save player state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    fn save_game(&self, slot: &str, state: &PlayerState) -> Result<(), Self::Error>;

    /// Load player state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded.
    fn load_game(&self, slot: &str) -> Result<Option<PlayerState>, Self::Error>;

    /// Delete saved state
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, slot: &str) -> Result<(), Self::Error>;
}

/// Main game engine for creating sessions and persisting player state
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    data_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    /// Create a new game engine with the provided data loader and storage
    pub const fn new(data_loader: L, storage: S) -> Self {
        Self {
            data_loader,
            storage,
        }
    }

    /// Load and validate the rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the config asset is missing, malformed, or invalid.
    pub fn load_config(&self) -> anyhow::Result<GameConfig> {
        let cfg: GameConfig = self.data_loader.load_config("game")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Start a new seeded session for `player_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if reference data cannot be loaded or the name is invalid.
    pub fn create_session(&self, player_name: &str, seed: u64) -> anyhow::Result<GameSession> {
        let cfg = self.load_config()?;
        self.create_session_with(player_name, seed, cfg)
    }

    /// Start a new seeded session with an explicit rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the airport data cannot be
    /// loaded, or the name is invalid.
    pub fn create_session_with(
        &self,
        player_name: &str,
        seed: u64,
        cfg: GameConfig,
    ) -> anyhow::Result<GameSession> {
        cfg.validate()?;
        let catalog = self.data_loader.load_airports(HOME_AIRPORT)?;
        let state = start_game(player_name, &cfg)?;
        info!(
            "new game for {} at {} (seed {seed})",
            state.name, state.current_location
        );
        Ok(GameSession::new(
            state,
            catalog,
            cfg,
            RngBundle::from_user_seed(seed),
        ))
    }

    /// Save player state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn save_game(&self, slot: &str, state: &PlayerState) -> Result<(), S::Error> {
        self.storage.save_game(slot, state)
    }

    /// Best-effort save: failures are logged and never propagated.
    ///
    /// Returns whether the save succeeded.
    pub fn autosave(&self, slot: &str, state: &PlayerState) -> bool {
        match self.storage.save_game(slot, state) {
            Ok(()) => true,
            Err(err) => {
                warn!("autosave to slot {slot} failed: {err}");
                false
            }
        }
    }

    /// Load a saved snapshot merged over a fresh start state.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or save cannot be read, the saved name
    /// is invalid (`NameError`), or the saved location is not a catalog
    /// airport (`SessionError::UnknownAirport`).
    pub fn load_game(&self, slot: &str) -> anyhow::Result<Option<PlayerState>> {
        let Some(snapshot) = self.storage.load_game(slot)? else {
            return Ok(None);
        };
        let cfg = self.load_config()?;
        let catalog = self.data_loader.load_airports(HOME_AIRPORT)?;
        let base = start_game(&snapshot.name, &cfg)?;
        let name = base.name.clone();
        let mut state = base.merge_snapshot(snapshot);
        state.name = name;
        let Some(airport) = catalog.get(&state.current_location) else {
            return Err(SessionError::UnknownAirport(state.current_location).into());
        };
        state.current_location.clone_from(&airport.code);
        Ok(Some(state))
    }

    /// Rebuild a session from a save slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the save or reference data cannot be loaded.
    pub fn resume_session(&self, slot: &str, seed: u64) -> anyhow::Result<Option<GameSession>> {
        let Some(state) = self.load_game(slot)? else {
            return Ok(None);
        };
        let cfg = self.load_config()?;
        let catalog = self.data_loader.load_airports(HOME_AIRPORT)?;
        let mut session = GameSession::new(
            PlayerState::default(),
            catalog,
            cfg,
            RngBundle::from_user_seed(seed),
        );
        session.restore(state)?;
        Ok(Some(session))
    }

    /// Delete a save slot
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, slot: &str) -> Result<(), S::Error> {
        self.storage.delete_save(slot)
    }
}
