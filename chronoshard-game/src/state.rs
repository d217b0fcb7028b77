//! Player state store: the mutable player record and the shard universe.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{HOME_AIRPORT, SHARD_COUNT, STARTING_CREDITS, STARTING_RANGE};

/// One of the five fixed collectible shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardId {
    Shard1,
    Shard2,
    Shard3,
    Shard4,
    Shard5,
}

impl ShardId {
    /// Every shard, in slot order.
    pub const ALL: [Self; SHARD_COUNT] = [
        Self::Shard1,
        Self::Shard2,
        Self::Shard3,
        Self::Shard4,
        Self::Shard5,
    ];

    /// Stable key used in saved snapshots (`shard1`..`shard5`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Shard1 => "shard1",
            Self::Shard2 => "shard2",
            Self::Shard3 => "shard3",
            Self::Shard4 => "shard4",
            Self::Shard5 => "shard5",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shard| shard.key() == key)
    }

    const fn index(self) -> usize {
        match self {
            Self::Shard1 => 0,
            Self::Shard2 => 1,
            Self::Shard3 => 2,
            Self::Shard4 => 3,
            Self::Shard5 => 4,
        }
    }

    const fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Set of collected shards, stored as a bitmask over the fixed universe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShardSet(u8);

impl ShardSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn contains(self, shard: ShardId) -> bool {
        self.0 & shard.bit() != 0
    }

    /// Adds a shard; returns `true` when it was not already present.
    pub fn insert(&mut self, shard: ShardId) -> bool {
        let fresh = !self.contains(shard);
        self.0 |= shard.bit();
        fresh
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.len() >= SHARD_COUNT
    }

    /// Collected shards in slot order.
    pub fn iter(self) -> impl Iterator<Item = ShardId> {
        ShardId::ALL
            .into_iter()
            .filter(move |shard| self.contains(*shard))
    }

    /// Shards not yet collected, in slot order.
    #[must_use]
    pub fn remaining(self) -> SmallVec<[ShardId; SHARD_COUNT]> {
        ShardId::ALL
            .into_iter()
            .filter(|shard| !self.contains(*shard))
            .collect()
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl FromIterator<ShardId> for ShardSet {
    fn from_iter<I: IntoIterator<Item = ShardId>>(iter: I) -> Self {
        let mut set = Self::new();
        for shard in iter {
            set.insert(shard);
        }
        set
    }
}

/// The player record threaded through every travel and purchase action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlayerSnapshot", into = "PlayerSnapshot")]
pub struct PlayerState {
    pub name: String,
    pub credits: i64,
    /// Travel resource, labelled "energy" by the browser client.
    pub range: i64,
    pub shards: ShardSet,
    pub current_location: String,
}

impl PlayerState {
    /// Fresh state at the home airport with the default starting balances.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credits: STARTING_CREDITS,
            range: STARTING_RANGE,
            shards: ShardSet::new(),
            current_location: HOME_AIRPORT.to_string(),
        }
    }

    #[must_use]
    pub const fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[must_use]
    pub fn is_at(&self, code: &str) -> bool {
        self.current_location.eq_ignore_ascii_case(code)
    }

    /// Overlay a persisted snapshot onto this state.
    ///
    /// Scalar fields come from the snapshot; shard flags are unioned so a
    /// stale snapshot can never take away a collected shard.
    #[must_use]
    pub fn merge_snapshot(self, snapshot: Self) -> Self {
        Self {
            shards: self.shards.union(snapshot.shards),
            ..snapshot
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new("Player")
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} | Credits: {} | Range: {} | Shards: {}/{} | At: {}",
            self.name,
            self.credits,
            self.range,
            self.shard_count(),
            SHARD_COUNT,
            self.current_location
        )
    }
}

/// Wire shape shared with the browser client's `playerState` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerSnapshot {
    #[serde(default = "default_name")]
    player_name: String,
    #[serde(default = "default_credits")]
    credits: i64,
    #[serde(default = "default_range")]
    energy: i64,
    #[serde(default)]
    shards: BTreeMap<String, bool>,
    #[serde(default)]
    count_shards: usize,
    #[serde(default = "default_location")]
    current_location: String,
}

fn default_name() -> String {
    "Player".to_string()
}

const fn default_credits() -> i64 {
    STARTING_CREDITS
}

const fn default_range() -> i64 {
    STARTING_RANGE
}

fn default_location() -> String {
    HOME_AIRPORT.to_string()
}

impl From<PlayerSnapshot> for PlayerState {
    fn from(snapshot: PlayerSnapshot) -> Self {
        let shards = snapshot
            .shards
            .iter()
            .filter(|(_, collected)| **collected)
            .filter_map(|(key, _)| ShardId::from_key(key))
            .collect();
        Self {
            name: snapshot.player_name,
            credits: snapshot.credits.max(0),
            range: snapshot.energy.max(0),
            shards,
            current_location: snapshot.current_location.to_ascii_uppercase(),
        }
    }
}

impl From<PlayerState> for PlayerSnapshot {
    fn from(state: PlayerState) -> Self {
        let shards = ShardId::ALL
            .into_iter()
            .map(|shard| (shard.key().to_string(), state.shards.contains(shard)))
            .collect();
        Self {
            player_name: state.name,
            credits: state.credits,
            energy: state.range,
            shards,
            count_shards: state.shards.len(),
            current_location: state.current_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_state_uses_starting_values() {
        let state = PlayerState::new("Aino");
        assert_eq!(state.credits, 1_000);
        assert_eq!(state.range, 1_000);
        assert_eq!(state.shard_count(), 0);
        assert_eq!(state.current_location, "EFHK");
    }

    #[test]
    fn shard_set_tracks_membership_and_remaining() {
        let mut set = ShardSet::new();
        assert!(set.insert(ShardId::Shard3));
        assert!(!set.insert(ShardId::Shard3));
        assert!(set.contains(ShardId::Shard3));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.remaining().as_slice(),
            &[
                ShardId::Shard1,
                ShardId::Shard2,
                ShardId::Shard4,
                ShardId::Shard5
            ]
        );
        let full: ShardSet = ShardId::ALL.into_iter().collect();
        assert!(full.is_complete());
        assert!(full.remaining().is_empty());
    }

    #[test]
    fn snapshot_matches_browser_shape() {
        let mut state = PlayerState::new("Aino");
        state.shards.insert(ShardId::Shard2);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["playerName"], json!("Aino"));
        assert_eq!(value["energy"], json!(1_000));
        assert_eq!(value["countShards"], json!(1));
        assert_eq!(value["shards"]["shard2"], json!(true));
        assert_eq!(value["shards"]["shard5"], json!(false));
        assert_eq!(value["currentLocation"], json!("EFHK"));
    }

    #[test]
    fn snapshot_read_recomputes_count_and_ignores_unknown_keys() {
        let raw = json!({
            "playerName": "Mikko",
            "credits": -5,
            "energy": 240,
            "shards": {"shard1": true, "shard4": true, "shard9": true, "shard2": false},
            "countShards": 5,
            "currentLocation": "ehAM"
        });
        let state: PlayerState = serde_json::from_value(raw).unwrap();
        assert_eq!(state.shard_count(), 2);
        assert_eq!(state.credits, 0);
        assert_eq!(state.current_location, "EHAM");
    }

    #[test]
    fn merge_keeps_previously_collected_shards() {
        let mut live = PlayerState::new("Aino");
        live.shards.insert(ShardId::Shard1);
        let mut saved = PlayerState::new("Aino");
        saved.credits = 420;
        saved.shards.insert(ShardId::Shard5);

        let merged = live.merge_snapshot(saved);
        assert_eq!(merged.credits, 420);
        assert!(merged.shards.contains(ShardId::Shard1));
        assert!(merged.shards.contains(ShardId::Shard5));
    }
}
