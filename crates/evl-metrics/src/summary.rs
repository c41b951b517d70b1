//! Platform summary and driver tips.
//!
//! Everything here is a pure function of the assignment set plus the static
//! grid and slot table; the summary has no state of its own.

use rustc_hash::FxHashMap;

use evl_core::{FeeModel, SlotTable, SummaryOptions, TimeSlot, ZoneId};
use evl_optimize::{Assignment, Outcome};
use evl_spatial::GridNetwork;

use crate::estimator::round1;

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverTip {
    pub truck_id: u32,
    pub hub_id:   u32,
    pub slot_id:  u8,
    pub off_peak: bool,
    pub tip:      String,
}

/// Trucks arriving at hubs of one zone in one slot.  Only non-zero counts
/// are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSlotCount {
    pub zone_id: u16,
    pub slot_id: u8,
    pub trucks:  u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuietSlots {
    pub zone_id:         u16,
    /// Least busy slots first; ties by slot id.
    pub suggested_slots: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlatformTotals {
    /// Σ route hops × cell length.
    pub total_distance_km:     f64,
    /// Σ congestion over `(hub, slot)` groups.
    pub total_congestion_cost: f64,
    pub revenue:               f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlatformSummary {
    pub totals:              PlatformTotals,
    pub driver_tips:         Vec<DriverTip>,
    pub incoming_by_zone:    Vec<ZoneSlotCount>,
    pub quiet_slots_by_zone: Vec<QuietSlots>,
    pub green_zones:         Vec<u16>,
    pub n_trucks_assigned:   usize,
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Energy tip for one assignment.
pub fn driver_tip(a: &Assignment, slots: &SlotTable) -> DriverTip {
    let off_peak = !slots.is_peak(a.slot);
    let advice = if off_peak {
        "Off-peak: good for energy saving."
    } else {
        "Peak hour: consider pre-charging to save energy."
    };
    DriverTip {
        truck_id: a.truck.0,
        hub_id:   a.hub.0,
        slot_id:  a.slot.0,
        off_peak,
        tip:      format!("Charge at Hub {}, {}. {advice}", a.hub.0, a.slot),
    }
}

/// Incoming trucks per `(zone, slot)`, keyed by the hub's zone.
pub fn incoming_by_zone(grid: &GridNetwork, outcome: &Outcome) -> Vec<ZoneSlotCount> {
    let mut counts: FxHashMap<(ZoneId, TimeSlot), u32> = FxHashMap::default();
    for a in &outcome.assignments {
        *counts.entry((grid.hub(a.hub).zone, a.slot)).or_default() += 1;
    }
    let mut rows: Vec<ZoneSlotCount> = counts
        .into_iter()
        .map(|((z, s), trucks)| ZoneSlotCount { zone_id: z.0, slot_id: s.0, trucks })
        .collect();
    rows.sort_by_key(|r| (r.zone_id, r.slot_id));
    rows
}

/// The `count` least busy slots for every zone.
///
/// A zone without hubs sees no traffic, so its suggestion is simply the
/// first `count` slots.
pub fn quiet_slots(
    grid: &GridNetwork,
    slots: &SlotTable,
    incoming: &[ZoneSlotCount],
    count: usize,
) -> Vec<QuietSlots> {
    let n = slots.len();
    let mut table = vec![0u32; grid.zone_count() * n];
    for r in incoming {
        if (r.zone_id as usize) < grid.zone_count() && (r.slot_id as usize) < n {
            table[r.zone_id as usize * n + r.slot_id as usize] = r.trucks;
        }
    }
    grid.zones
        .iter()
        .map(|z| {
            let row = &table[z.id.index() * n..(z.id.index() + 1) * n];
            let mut order: Vec<TimeSlot> = slots.slots().collect();
            order.sort_by_key(|s| (row[s.index()], *s));
            QuietSlots {
                zone_id:         z.id.0,
                suggested_slots: order.into_iter().take(count).map(|s| s.0).collect(),
            }
        })
        .collect()
}

pub fn totals(outcome: &Outcome, fees: &FeeModel, options: &SummaryOptions) -> PlatformTotals {
    let hops: u64 = outcome.assignments.iter().map(|a| a.hops as u64).sum();
    PlatformTotals {
        total_distance_km:     round1(hops as f64 * options.cell_length_km),
        total_congestion_cost: round1(outcome.breakdown.congestion),
        revenue:               round1(outcome.n_assigned() as f64 * fees.revenue_per_assignment),
    }
}

impl PlatformSummary {
    pub fn build(
        grid: &GridNetwork,
        slots: &SlotTable,
        outcome: &Outcome,
        fees: &FeeModel,
        options: &SummaryOptions,
    ) -> Self {
        let incoming = incoming_by_zone(grid, outcome);
        let quiet = quiet_slots(grid, slots, &incoming, options.quiet_slot_count);
        Self {
            totals:              totals(outcome, fees, options),
            driver_tips:         outcome.assignments.iter().map(|a| driver_tip(a, slots)).collect(),
            incoming_by_zone:    incoming,
            quiet_slots_by_zone: quiet,
            green_zones:         grid.green_zones().into_iter().map(|z| z.0).collect(),
            n_trucks_assigned:   outcome.n_assigned(),
        }
    }
}
