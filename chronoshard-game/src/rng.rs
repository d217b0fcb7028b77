//! Injectable randomness for travel resolution.
//!
//! The resolver never touches a global generator. It asks a [`RandomSource`]
//! for each draw and names the kind of draw, so seeded sources can keep an
//! independent stream per kind and a bandit roll never shifts the credit roll.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::DrawBounds;
use crate::constants::{STREAM_BANDIT, STREAM_COST, STREAM_CREDIT, STREAM_SHARD};

/// Which part of a travel action a draw belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawKind {
    Cost,
    Shard,
    Bandit,
    Credit,
}

/// Source of every random decision made while resolving travel.
pub trait RandomSource {
    /// Uniform integer in `bounds`, both ends inclusive.
    fn roll(&mut self, kind: DrawKind, bounds: DrawBounds) -> i64;

    /// Bernoulli trial succeeding with `probability`.
    fn chance(&mut self, kind: DrawKind, probability: f64) -> bool;

    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, kind: DrawKind, len: usize) -> usize;
}

/// Adapter exposing any `rand` generator as a single-stream source.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<SmallRng> {
    /// Unseeded source for casual play.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll(&mut self, _kind: DrawKind, bounds: DrawBounds) -> i64 {
        self.0.gen_range(bounds.range())
    }

    fn chance(&mut self, _kind: DrawKind, probability: f64) -> bool {
        self.0.gen_bool(probability)
    }

    fn pick(&mut self, _kind: DrawKind, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Per-stream draw counters, handy for replay diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCounts {
    pub cost: u64,
    pub shard: u64,
    pub bandit: u64,
    pub credit: u64,
}

impl DrawCounts {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.cost + self.shard + self.bandit + self.credit
    }
}

/// Independent seeded streams, one per [`DrawKind`], derived from a user seed.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    cost: CountingRng<SmallRng>,
    shard: CountingRng<SmallRng>,
    bandit: CountingRng<SmallRng>,
    credit: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            cost: CountingRng::seeded(derive_stream_seed(seed, STREAM_COST)),
            shard: CountingRng::seeded(derive_stream_seed(seed, STREAM_SHARD)),
            bandit: CountingRng::seeded(derive_stream_seed(seed, STREAM_BANDIT)),
            credit: CountingRng::seeded(derive_stream_seed(seed, STREAM_CREDIT)),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn draws(&self) -> DrawCounts {
        DrawCounts {
            cost: self.cost.draws(),
            shard: self.shard.draws(),
            bandit: self.bandit.draws(),
            credit: self.credit.draws(),
        }
    }

    fn stream(&mut self, kind: DrawKind) -> &mut CountingRng<SmallRng> {
        match kind {
            DrawKind::Cost => &mut self.cost,
            DrawKind::Shard => &mut self.shard,
            DrawKind::Bandit => &mut self.bandit,
            DrawKind::Credit => &mut self.credit,
        }
    }
}

impl RandomSource for RngBundle {
    fn roll(&mut self, kind: DrawKind, bounds: DrawBounds) -> i64 {
        self.stream(kind).gen_range(bounds.range())
    }

    fn chance(&mut self, kind: DrawKind, probability: f64) -> bool {
        self.stream(kind).gen_bool(probability)
    }

    fn pick(&mut self, kind: DrawKind, len: usize) -> usize {
        self.stream(kind).gen_range(0..len)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("HMAC takes any key size");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
