//! Deterministic per-truck and run-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each truck gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (truck_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive truck IDs uniformly across the seed space.
//! Appending trucks to a fleet therefore never changes the draws of the
//! trucks already in it.
//!
//! Run-level randomness (zone propensities, hub placement, slot table) comes
//! from a [`SimRng`] per generator, derived with [`SimRng::child`] so the
//! generators never consume each other's streams.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::TruckId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── SeedSource ────────────────────────────────────────────────────────────────

/// Where a run's seed comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeedSource {
    /// Reproducible runs (tests, datasets).
    Fixed(u64),
    /// Derived from the system clock at resolution time.
    #[default]
    Clock,
}

impl SeedSource {
    /// Resolve to a concrete seed.
    pub fn resolve(self) -> u64 {
        match self {
            SeedSource::Fixed(seed) => seed,
            SeedSource::Clock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(MIXING_CONSTANT),
        }
    }
}

impl From<Option<u64>> for SeedSource {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(SeedSource::Clock, SeedSource::Fixed)
    }
}

// ── TruckRng ──────────────────────────────────────────────────────────────────

/// Per-truck deterministic RNG.
pub struct TruckRng(SmallRng);

impl TruckRng {
    /// Seed deterministically from the run seed and a truck ID.
    pub fn new(run_seed: u64, truck: TruckId) -> Self {
        let seed = run_seed ^ (truck.0 as u64).wrapping_mul(MIXING_CONSTANT);
        TruckRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for global generation steps.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
