//! Hour-of-day slots and their congestion profile.
//!
//! # Design
//!
//! A run covers one simulated day split into hourly [`TimeSlot`]s.  Each slot
//! carries a congestion multiplier drawn once per run into a [`SlotTable`];
//! designated peak slots are drawn from a higher band and scaled by the
//! request's peak multiplier.  All congestion accounting downstream reads the
//! table, never the raw profile.

use std::fmt;

use crate::config::SlotProfile;
use crate::SimRng;

// ── TimeSlot ─────────────────────────────────────────────────────────────────

/// An hour-of-day bucket in `[0, 23]`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TimeSlot(pub u8);

impl TimeSlot {
    /// Upper bound on slots per run.
    pub const PER_DAY: u8 = 24;

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Simulated hour of day.  Slots are hourly, so this is the slot id.
    #[inline]
    pub fn hour(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

// ── SlotTable ────────────────────────────────────────────────────────────────

/// Per-slot congestion multipliers and peak flags for one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotTable {
    multipliers: Vec<f64>,
    peak:        Vec<bool>,
}

impl SlotTable {
    /// Draw a table from `profile`.
    ///
    /// Peak slots: uniform in `profile.peak_band` times `peak_multiplier`.
    /// Off-peak slots: uniform in `profile.off_peak_band`.
    pub fn generate(profile: &SlotProfile, peak_multiplier: f64, rng: &mut SimRng) -> Self {
        let count = profile.slot_count as usize;
        let mut multipliers = Vec::with_capacity(count);
        let mut peak = Vec::with_capacity(count);
        for s in 0..profile.slot_count {
            let is_peak = profile.is_peak(TimeSlot(s));
            let m = if is_peak {
                rng.gen_range(profile.peak_band.0..profile.peak_band.1) * peak_multiplier
            } else {
                rng.gen_range(profile.off_peak_band.0..profile.off_peak_band.1)
            };
            multipliers.push(m);
            peak.push(is_peak);
        }
        Self { multipliers, peak }
    }

    /// Build a table from explicit values (tests, fixtures).
    ///
    /// # Panics
    /// Panics if the two vectors differ in length or exceed
    /// [`TimeSlot::PER_DAY`].
    pub fn from_parts(multipliers: Vec<f64>, peak: Vec<bool>) -> Self {
        assert_eq!(multipliers.len(), peak.len(), "slot table length mismatch");
        assert!(multipliers.len() <= TimeSlot::PER_DAY as usize);
        Self { multipliers, peak }
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// All slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        (0..self.multipliers.len() as u8).map(TimeSlot)
    }

    #[inline]
    pub fn multiplier(&self, slot: TimeSlot) -> f64 {
        self.multipliers[slot.index()]
    }

    #[inline]
    pub fn is_peak(&self, slot: TimeSlot) -> bool {
        self.peak[slot.index()]
    }
}
