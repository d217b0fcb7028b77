//! Airport reference data loaded once per session.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A travel destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(rename = "ICAO", alias = "code")]
    pub code: String,
    pub name: String,
    pub country: String,
    /// Distance from the home airport. Shown to players, never used for cost.
    #[serde(
        rename = "distance",
        alias = "distanceFromEFHK",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_km: Option<f64>,
}

impl Airport {
    #[must_use]
    pub fn new(code: &str, name: &str, country: &str, distance_km: Option<f64>) -> Self {
        Self {
            code: code.trim().to_ascii_uppercase(),
            name: name.to_string(),
            country: country.to_string(),
            distance_km,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("airport catalog is empty")]
    Empty,
    #[error("airport code must not be empty ({name})")]
    MissingCode { name: String },
    #[error("duplicate airport code {0}")]
    Duplicate(String),
    #[error("home airport {0} missing from catalog")]
    MissingHome(String),
}

/// Immutable, validated list of airports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AirportCatalog {
    airports: Vec<Airport>,
}

impl AirportCatalog {
    /// Validate and normalize a list of airports.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for an empty list, blank or duplicate codes, or
    /// when `home` is not one of the airports.
    pub fn new(airports: Vec<Airport>, home: &str) -> Result<Self, CatalogError> {
        if airports.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(airports.len());
        for mut airport in airports {
            airport.code = airport.code.trim().to_ascii_uppercase();
            if airport.code.is_empty() {
                return Err(CatalogError::MissingCode { name: airport.name });
            }
            if !seen.insert(airport.code.clone()) {
                return Err(CatalogError::Duplicate(airport.code));
            }
            normalized.push(airport);
        }
        let home = home.trim().to_ascii_uppercase();
        if !seen.contains(&home) {
            return Err(CatalogError::MissingHome(home));
        }
        Ok(Self {
            airports: normalized,
        })
    }

    /// Parse a JSON array of airports.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails catalog validation.
    pub fn from_json(json: &str, home: &str) -> anyhow::Result<Self> {
        let airports: Vec<Airport> = serde_json::from_str(json)?;
        Ok(Self::new(airports, home)?)
    }

    /// Case-insensitive lookup by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Airport> {
        let code = code.trim();
        self.airports
            .iter()
            .find(|airport| airport.code.eq_ignore_ascii_case(code))
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }

    /// Airports other than `code`, in catalog order.
    pub fn destinations_from<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Airport> {
        self.airports
            .iter()
            .filter(move |airport| !airport.code.eq_ignore_ascii_case(code))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
