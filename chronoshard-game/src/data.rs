//! Bundled reference data.
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::DataLoader;
use crate::airports::{AirportCatalog, CatalogError};

const AIRPORTS_JSON: &str = include_str!("../data/airports.json");
const GAME_JSON: &str = include_str!("../data/game.json");

#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown data asset: {0}")]
    UnknownAsset(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Loader serving the JSON assets compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDataLoader;

impl DataLoader for EmbeddedDataLoader {
    type Error = DataError;

    fn load_airports(&self, home: &str) -> Result<AirportCatalog, Self::Error> {
        let airports = serde_json::from_str(AIRPORTS_JSON)?;
        Ok(AirportCatalog::new(airports, home)?)
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: DeserializeOwned,
    {
        let json = match config_name {
            "game" => GAME_JSON,
            "airports" => AIRPORTS_JSON,
            _ => return Err(DataError::UnknownAsset(config_name.to_string())),
        };
        Ok(serde_json::from_str(json)?)
    }
}
