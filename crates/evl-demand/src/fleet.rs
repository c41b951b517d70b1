//! Structure-of-Arrays truck storage.
//!
//! Every `Vec` field has exactly `count` elements and the `TruckId` value is
//! the index into all of them:
//!
//! ```ignore
//! let cell = fleet.origin[truck.index()];
//! ```
//!
//! A `Fleet` lives for one optimize run.  It is created fresh by
//! [`DemandGenerator`](crate::DemandGenerator) and never mutated by the
//! stages downstream of it.

use evl_core::{Cell, DriverId, TruckId, ZoneId};
use evl_spatial::GridNetwork;

use crate::{DemandError, DemandResult};

/// Energy need assigned to hand-placed trucks.
pub const DEFAULT_ENERGY_KWH: f32 = 80.0;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fleet {
    /// Number of trucks.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Starting cell.  Always open on the grid the fleet was built for.
    pub origin: Vec<Cell>,

    /// Zone of `origin`, cached.
    pub origin_zone: Vec<ZoneId>,

    pub driver: Vec<DriverId>,

    /// Energy to recharge at the hub, in kWh.
    pub energy_need_kwh: Vec<f32>,
}

impl Fleet {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            count:           0,
            origin:          Vec::with_capacity(n),
            origin_zone:     Vec::with_capacity(n),
            driver:          Vec::with_capacity(n),
            energy_need_kwh: Vec::with_capacity(n),
        }
    }

    /// Fleet with trucks at the given origins, one driver per truck, in
    /// order.  Used for fixtures and replayed scenarios.
    pub fn from_origins(grid: &GridNetwork, origins: &[Cell]) -> DemandResult<Self> {
        let mut fleet = Self::with_capacity(origins.len());
        for &cell in origins {
            if !grid.is_open(cell) {
                return Err(DemandError::InvalidOrigin(cell));
            }
            fleet.push(cell, grid.zone_of(cell), DEFAULT_ENERGY_KWH);
        }
        Ok(fleet)
    }

    /// Append one truck and return its id.  The driver id equals the truck
    /// id.
    pub fn push(&mut self, origin: Cell, zone: ZoneId, energy_need_kwh: f32) -> TruckId {
        let id = TruckId(self.count as u32);
        self.origin.push(origin);
        self.origin_zone.push(zone);
        self.driver.push(DriverId(id.0));
        self.energy_need_kwh.push(energy_need_kwh);
        self.count += 1;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `TruckId`s in ascending order.
    pub fn truck_ids(&self) -> impl Iterator<Item = TruckId> + '_ {
        (0..self.count as u32).map(TruckId)
    }

    /// Trucks whose origin lies in `zone`.
    #[cfg(test)]
    pub(crate) fn count_in_zone(&self, zone: ZoneId) -> usize {
        self.origin_zone.iter().filter(|&&z| z == zone).count()
    }
}
