//! Seeded fleet synthesis.
//!
//! # Streams
//!
//! Truck `i` draws from `TruckRng::new(seed, TruckId(i))`, in the fixed
//! order origin zone, origin cell, energy need.  Fleets generated with the
//! same seed therefore share their common prefix: asking for 20 trucks
//! yields the 10-truck fleet plus ten more.

use tracing::debug;

use evl_core::{DemandProfile, OriginWeighting, TruckId, TruckRng, ZoneId};
use evl_spatial::GridNetwork;

use crate::{DemandError, DemandResult, Fleet};

/// Synthesizes a [`Fleet`] over a grid.
#[derive(Clone, Debug)]
pub struct DemandGenerator {
    profile: DemandProfile,
    seed:    u64,
}

impl DemandGenerator {
    pub fn new(profile: DemandProfile, seed: u64) -> Self {
        Self { profile, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate `count` trucks with origins on open cells of `grid`.
    pub fn generate(&self, grid: &GridNetwork, count: usize) -> DemandResult<Fleet> {
        let (lo, hi) = self.profile.energy_band_kwh;
        if !(lo < hi) {
            return Err(DemandError::InvalidEnergyBand { lo, hi });
        }

        // Zones with at least one open cell, with cumulative open-cell
        // weights for area weighting.
        let eligible: Vec<ZoneId> =
            grid.zones.iter().filter(|z| z.open_cells > 0).map(|z| z.id).collect();
        if eligible.is_empty() {
            return Err(DemandError::NoOpenCells);
        }
        let mut cumulative = Vec::with_capacity(eligible.len());
        let mut total = 0usize;
        for &z in &eligible {
            total += grid.zone(z).open_cells;
            cumulative.push(total);
        }

        let mut fleet = Fleet::with_capacity(count);
        for i in 0..count {
            let mut rng = TruckRng::new(self.seed, TruckId(i as u32));

            let zone = match self.profile.origin_weighting {
                OriginWeighting::Uniform => eligible[rng.gen_range(0..eligible.len())],
                OriginWeighting::ByZoneArea => {
                    let pick = rng.gen_range(0..total);
                    eligible[cumulative.partition_point(|&c| c <= pick)]
                }
            };

            let nth = rng.gen_range(0..grid.zone(zone).open_cells);
            let Some(origin) = grid.open_cells_in(zone).nth(nth) else {
                return Err(DemandError::NoOpenCells);
            };

            let energy = rng.gen_range(lo..hi);
            fleet.push(origin, zone, energy);
        }

        debug!(trucks = fleet.len(), seed = self.seed, "fleet generated");
        Ok(fleet)
    }
}
