//! Response payload handed to the presentation layer.

use geojson::FeatureCollection;
use jiff::Timestamp;
use serde::Serialize;

use evl_demand::Fleet;
use evl_metrics::{
    Delivery, HubSlotUsage, HubUsage, PlatformSummary, SlotCongestion, ZonePollution,
};
use evl_optimize::{Outcome, SolveStatus, UnassignedTruck};

use crate::{ArtificialMap, HubPosition, OptimizeRequest};

/// One accepted `(truck, hub, slot)` binding, flattened for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TruckAssignment {
    pub truck_id:        u32,
    pub hub_id:          u32,
    pub slot_id:         u8,
    pub origin_zone_id:  u16,
    pub hops:            u32,
    pub monetary:        f64,
    /// Charge the truck needs at the hub.
    pub energy_need_kwh: f32,
}

impl TruckAssignment {
    /// Flatten `outcome`'s assignments, in truck order.
    pub fn from_outcome(fleet: &Fleet, outcome: &Outcome) -> Vec<Self> {
        outcome
            .assignments
            .iter()
            .map(|a| TruckAssignment {
                truck_id:        a.truck.0,
                hub_id:          a.hub.0,
                slot_id:         a.slot.0,
                origin_zone_id:  fleet.origin_zone[a.truck.index()].0,
                hops:            a.hops,
                monetary:        a.monetary,
                energy_need_kwh: fleet.energy_need_kwh[a.truck.index()],
            })
            .collect()
    }
}

/// Full result of one run.
///
/// Every table is derived from the outcome's assignments; nothing here is
/// authoritative on its own.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    /// Parameters the run used.
    pub request:             OptimizeRequest,
    /// Resolved seed; replaying with it reproduces the run.
    pub seed:                u64,
    pub status:              SolveStatus,
    pub strategy:            String,
    pub objective_value:     Option<f64>,
    pub n_assigned:          usize,
    pub truck_assignments:   Vec<TruckAssignment>,
    pub unassigned:          Vec<UnassignedTruck>,
    pub hub_usage:           Vec<HubUsage>,
    pub hub_slot_usage:      Vec<HubSlotUsage>,
    pub congestion_per_time: Vec<SlotCongestion>,
    pub pollution_per_zone:  Vec<ZonePollution>,
    pub green_zones:         Vec<u16>,
    pub zones_geojson:       FeatureCollection,
    pub hubs:                Vec<HubPosition>,
    pub artificial_map:      ArtificialMap,
    pub platform_summary:    PlatformSummary,
    pub deliveries:          Vec<Delivery>,
    /// When the payload was handed out.  The pipeline leaves it unset so a
    /// replayed seed yields the same payload; clients stamp it on delivery.
    pub last_updated:        Option<Timestamp>,
}

impl OptimizeResponse {
    pub fn with_last_updated(mut self, at: Timestamp) -> Self {
        self.last_updated = Some(at);
        self
    }

    /// Total charge requested by the assigned trucks.
    pub fn assigned_energy_kwh(&self) -> f64 {
        self.truck_assignments.iter().map(|a| f64::from(a.energy_need_kwh)).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
