//! Congestion and pollution estimator.
//!
//! Pure aggregation over an [`Outcome`]'s assignments.  Every table is
//! recomputed from scratch; nothing here keeps state between runs.
//!
//! | Table                  | Row                | Key              |
//! |------------------------|--------------------|------------------|
//! | [`congestion_per_time`]| [`SlotCongestion`] | slot             |
//! | [`pollution_per_zone`] | [`ZonePollution`]  | zone             |
//! | [`hub_usage`]          | [`HubUsage`]       | hub              |
//! | [`hub_slot_usage`]     | [`HubSlotUsage`]   | `(hub, slot)`    |

use rustc_hash::FxHashMap;

use evl_core::{PollutionModel, SlotTable, ZoneId};
use evl_optimize::Outcome;
use evl_spatial::GridNetwork;

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Trucks scheduled in one slot across all hubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotCongestion {
    pub slot_id: u8,
    pub hour:    u8,
    pub trucks:  u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZonePollution {
    pub zone_id:         u16,
    /// Always in `[0, 1]`.
    pub pollution_level: f64,
    /// Trucks assigned to hubs located in the zone.
    pub truck_count:     u32,
    pub is_green:        bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HubUsage {
    pub hub_id:                u32,
    pub zone_id:               u16,
    /// Trucks assigned over the whole day.
    pub assigned:              u32,
    /// Per-slot capacity.
    pub capacity:              u32,
    /// Busiest slot's load.
    pub peak_slot_load:        u32,
    /// `assigned / capacity` in percent, one decimal.  Exceeds 100 once the
    /// day's total passes one slot's worth of capacity.
    pub utilization_pct:       f64,
    /// `assigned / (capacity × slots)` in percent, one decimal.
    pub daily_utilization_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HubSlotUsage {
    pub hub_id:          u32,
    pub slot_id:         u8,
    pub trucks:          u32,
    pub capacity:        u32,
    /// `trucks / capacity` in percent, one decimal.
    pub utilization_pct: f64,
}

// ── Tables ────────────────────────────────────────────────────────────────────

/// One row per slot of `slots`, in slot order.
pub fn congestion_per_time(outcome: &Outcome, slots: &SlotTable) -> Vec<SlotCongestion> {
    let mut trucks = vec![0u32; slots.len()];
    for a in &outcome.assignments {
        if let Some(n) = trucks.get_mut(a.slot.index()) {
            *n += 1;
        }
    }
    slots
        .slots()
        .map(|s| SlotCongestion { slot_id: s.0, hour: s.hour(), trucks: trucks[s.index()] })
        .collect()
}

/// Pollution of a zone with base propensity `base`, `trucks` incoming
/// trucks and `cells` member cells.
///
/// `clamp((base + traffic_weight · trucks / cells) · damp, 0, 1)` where
/// `damp` is `green_dampening` for green zones and 1 otherwise.
pub fn pollution_level(base: f64, trucks: u32, cells: usize, is_green: bool, model: &PollutionModel) -> f64 {
    let traffic = if cells == 0 { 0.0 } else { model.traffic_weight * trucks as f64 / cells as f64 };
    let damp = if is_green { model.green_dampening } else { 1.0 };
    let level = (base + traffic) * damp;
    if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) }
}

/// Assigned trucks per zone of the hub they were sent to.
pub fn trucks_by_hub_zone(grid: &GridNetwork, outcome: &Outcome) -> FxHashMap<ZoneId, u32> {
    let mut counts: FxHashMap<ZoneId, u32> = FxHashMap::default();
    for a in &outcome.assignments {
        *counts.entry(grid.hub(a.hub).zone).or_default() += 1;
    }
    counts
}

/// One row per zone, in zone order.
pub fn pollution_per_zone(grid: &GridNetwork, outcome: &Outcome, model: &PollutionModel) -> Vec<ZonePollution> {
    let counts = trucks_by_hub_zone(grid, outcome);
    grid.zones
        .iter()
        .map(|z| {
            let trucks = counts.get(&z.id).copied().unwrap_or(0);
            ZonePollution {
                zone_id:         z.id.0,
                pollution_level: pollution_level(z.base_pollution, trucks, z.cells.len(), z.is_green, model),
                truck_count:     trucks,
                is_green:        z.is_green,
            }
        })
        .collect()
}

/// Per-`(hub, slot)` loads, hub-major.
fn load_table(grid: &GridNetwork, outcome: &Outcome, slot_count: usize) -> Vec<u32> {
    let mut load = vec![0u32; grid.hub_count() * slot_count];
    for a in &outcome.assignments {
        if a.hub.index() < grid.hub_count() && a.slot.index() < slot_count {
            load[a.hub.index() * slot_count + a.slot.index()] += 1;
        }
    }
    load
}

/// One row per hub, in hub order.
pub fn hub_usage(grid: &GridNetwork, outcome: &Outcome, slots: &SlotTable) -> Vec<HubUsage> {
    let n = slots.len();
    let load = load_table(grid, outcome, n);
    grid.hubs
        .iter()
        .map(|h| {
            let row = &load[h.id.index() * n..(h.id.index() + 1) * n];
            let assigned: u32 = row.iter().sum();
            HubUsage {
                hub_id:                h.id.0,
                zone_id:               h.zone.0,
                assigned,
                capacity:              h.capacity,
                peak_slot_load:        row.iter().copied().max().unwrap_or(0),
                utilization_pct:       percent(assigned, h.capacity as f64),
                daily_utilization_pct: percent(assigned, h.capacity as f64 * n as f64),
            }
        })
        .collect()
}

/// One row per `(hub, slot)`, hub-major, including empty slots.
pub fn hub_slot_usage(grid: &GridNetwork, outcome: &Outcome, slots: &SlotTable) -> Vec<HubSlotUsage> {
    let n = slots.len();
    let load = load_table(grid, outcome, n);
    grid.hubs
        .iter()
        .flat_map(|h| {
            let load = &load;
            slots.slots().map(move |s| {
                let trucks = load[h.id.index() * n + s.index()];
                HubSlotUsage {
                    hub_id:          h.id.0,
                    slot_id:         s.0,
                    trucks,
                    capacity:        h.capacity,
                    utilization_pct: percent(trucks, h.capacity as f64),
                }
            })
        })
        .collect()
}

#[inline]
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// `100 · n / of`, one decimal; zero for an empty denominator.
#[inline]
fn percent(n: u32, of: f64) -> f64 {
    if of > 0.0 { round1(100.0 * n as f64 / of) } else { 0.0 }
}

// ── Estimate ──────────────────────────────────────────────────────────────────

/// All estimator tables of one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate {
    pub congestion_per_time: Vec<SlotCongestion>,
    pub pollution_per_zone:  Vec<ZonePollution>,
    pub hub_usage:           Vec<HubUsage>,
    pub hub_slot_usage:      Vec<HubSlotUsage>,
}

impl Estimate {
    pub fn compute(grid: &GridNetwork, slots: &SlotTable, outcome: &Outcome, model: &PollutionModel) -> Self {
        Self {
            congestion_per_time: congestion_per_time(outcome, slots),
            pollution_per_zone:  pollution_per_zone(grid, outcome, model),
            hub_usage:           hub_usage(grid, outcome, slots),
            hub_slot_usage:      hub_slot_usage(grid, outcome, slots),
        }
    }
}
