//! Process-wide configuration, passed explicitly into every pipeline stage.
//!
//! Nothing in the engine reads ambient state: grid sizing heuristics, the fee
//! model, objective weights and solver limits all travel in a
//! [`PlatformConfig`].  Applications typically load it from a JSON file (with
//! the `serde` feature) or start from [`PlatformConfig::default`].

use std::time::Duration;

use crate::{CoreError, CoreResult, MapBounds, TimeSlot};

// ── Grid sizing ──────────────────────────────────────────────────────────────

/// Heuristic that derives a square grid side from the scenario size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSizing {
    pub cells_per_truck: f64,
    pub cells_per_hub:   f64,
    pub min_side:        u16,
    pub max_side:        u16,
}

impl GridSizing {
    /// Side length for `num_trucks` trucks and `num_hubs` hubs.
    ///
    /// `ceil(sqrt(trucks * cells_per_truck + hubs * cells_per_hub))` clamped
    /// to `[min_side, max_side]`, but never smaller than what is needed to
    /// give every hub its own cell.  The result may still be too small for
    /// the hubs when `max_side` caps it; the grid builder reports that.
    pub fn side_for(&self, num_trucks: usize, num_hubs: usize) -> u16 {
        let demand = num_trucks as f64 * self.cells_per_truck + num_hubs as f64 * self.cells_per_hub;
        let side = demand.sqrt().ceil() as u64;
        let side = side.clamp(self.min_side as u64, self.max_side as u64);
        let hub_floor = (num_hubs as f64).sqrt().ceil() as u64;
        side.max(hub_floor.min(self.max_side as u64)) as u16
    }
}

impl Default for GridSizing {
    fn default() -> Self {
        Self { cells_per_truck: 1.0, cells_per_hub: 4.0, min_side: 12, max_side: 48 }
    }
}

// ── Zones ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoneLayout {
    /// Number of zones.  Independent of the hub count.
    pub zone_count:  u16,
    /// Zone ids divisible by this value are green.  0 disables green zones.
    pub green_every: u16,
    /// Base pollution propensity band for ordinary zones.
    pub base_band:   (f64, f64),
    /// Base pollution propensity band for green zones.
    pub green_band:  (f64, f64),
}

impl ZoneLayout {
    #[inline]
    pub fn is_green(&self, zone: u16) -> bool {
        self.green_every != 0 && zone % self.green_every == 0
    }
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            zone_count:  10,
            green_every: 3,
            base_band:   (0.2, 0.7),
            green_band:  (0.05, 0.35),
        }
    }
}

// ── Slots ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlotProfile {
    pub slot_count:    u8,
    /// Designated peak hours.
    pub peak_slots:    Vec<u8>,
    pub peak_band:     (f64, f64),
    pub off_peak_band: (f64, f64),
}

impl SlotProfile {
    #[inline]
    pub fn is_peak(&self, slot: TimeSlot) -> bool {
        self.peak_slots.contains(&slot.0)
    }
}

impl Default for SlotProfile {
    fn default() -> Self {
        Self {
            slot_count:    TimeSlot::PER_DAY,
            peak_slots:    vec![7, 8, 9, 17, 18, 19],
            peak_band:     (1.2, 2.0),
            off_peak_band: (0.5, 1.0),
        }
    }
}

// ── Hubs and demand ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HubProfile {
    /// Inclusive per-slot capacity range a hub's capacity is drawn from.
    pub capacity_min: u32,
    pub capacity_max: u32,
}

impl Default for HubProfile {
    fn default() -> Self {
        Self { capacity_min: 10, capacity_max: 50 }
    }
}

/// How truck origin zones are drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OriginWeighting {
    #[default]
    Uniform,
    /// Weight each zone by its open cell count (a population proxy).
    ByZoneArea,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DemandProfile {
    pub origin_weighting: OriginWeighting,
    pub energy_band_kwh:  (f32, f32),
}

impl Default for DemandProfile {
    fn default() -> Self {
        Self { origin_weighting: OriginWeighting::Uniform, energy_band_kwh: (40.0, 120.0) }
    }
}

// ── Costs ────────────────────────────────────────────────────────────────────

/// Monetary model.  Costs are consumed from the request budget; revenue is a
/// flat fee per accepted assignment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeeModel {
    pub charge_fee:             f64,
    pub hop_fee:                f64,
    /// Added in peak slots, scaled by the peak multiplier.
    pub peak_surcharge:         f64,
    pub revenue_per_assignment: f64,
}

impl Default for FeeModel {
    fn default() -> Self {
        Self {
            charge_fee:             5.0,
            hop_fee:                0.25,
            peak_surcharge:         2.0,
            revenue_per_assignment: 85.0,
        }
    }
}

/// Objective weights for distance, congestion and monetary terms.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostWeights {
    pub distance:   f64,
    pub congestion: f64,
    pub monetary:   f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self { distance: 1.0, congestion: 2.0, monetary: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PollutionModel {
    /// Added per incoming truck per zone cell.
    pub traffic_weight:  f64,
    /// Multiplier applied to green zones.
    pub green_dampening: f64,
}

impl Default for PollutionModel {
    fn default() -> Self {
        Self { traffic_weight: 0.5, green_dampening: 0.6 }
    }
}

// ── Solver, summary ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverLimits {
    /// Upper bound on local-search passes.
    pub max_passes:  u32,
    /// Wall-clock budget for one solve.  `None` means unbounded (the solver
    /// is polynomial, so runs still terminate).
    pub deadline_ms: Option<u64>,
}

impl SolverLimits {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self { max_passes: 50, deadline_ms: Some(30_000) }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SummaryOptions {
    pub quiet_slot_count: usize,
    pub cell_length_km:   f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self { quiet_slot_count: 5, cell_length_km: 0.5 }
    }
}

// ── PlatformConfig ───────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlatformConfig {
    pub grid:       GridSizing,
    pub zones:      ZoneLayout,
    pub slots:      SlotProfile,
    pub hubs:       HubProfile,
    pub demand:     DemandProfile,
    pub fees:       FeeModel,
    pub weights:    CostWeights,
    pub pollution:  PollutionModel,
    pub solver:     SolverLimits,
    pub summary:    SummaryOptions,
    pub map_bounds: MapBounds,
}

impl PlatformConfig {
    /// Reject configurations no run could use.
    pub fn validate(&self) -> CoreResult<()> {
        let g = &self.grid;
        if g.min_side == 0 || g.min_side > g.max_side {
            return Err(CoreError::Config(format!(
                "grid side bounds {}..={} are empty",
                g.min_side, g.max_side
            )));
        }
        if !(g.cells_per_truck >= 0.0 && g.cells_per_hub >= 0.0) {
            return Err(CoreError::Config("grid density factors must be non-negative".into()));
        }
        if self.zones.zone_count == 0 {
            return Err(CoreError::Config("zone_count must be positive".into()));
        }
        check_band("zones.base_band", self.zones.base_band)?;
        check_band("zones.green_band", self.zones.green_band)?;

        let s = &self.slots;
        if s.slot_count == 0 || s.slot_count > TimeSlot::PER_DAY {
            return Err(CoreError::Config(format!(
                "slot_count {} outside 1..={}",
                s.slot_count,
                TimeSlot::PER_DAY
            )));
        }
        if let Some(bad) = s.peak_slots.iter().find(|&&p| p >= s.slot_count) {
            return Err(CoreError::Config(format!("peak slot {bad} >= slot_count")));
        }
        check_band("slots.peak_band", s.peak_band)?;
        check_band("slots.off_peak_band", s.off_peak_band)?;

        if self.hubs.capacity_min == 0 || self.hubs.capacity_min > self.hubs.capacity_max {
            return Err(CoreError::Config(format!(
                "hub capacity range {}..={} is invalid",
                self.hubs.capacity_min, self.hubs.capacity_max
            )));
        }
        let (lo, hi) = self.demand.energy_band_kwh;
        if !(lo >= 0.0 && lo < hi) {
            return Err(CoreError::Config("demand.energy_band_kwh is invalid".into()));
        }

        let f = &self.fees;
        for (name, v) in [
            ("fees.charge_fee", f.charge_fee),
            ("fees.hop_fee", f.hop_fee),
            ("fees.peak_surcharge", f.peak_surcharge),
            ("fees.revenue_per_assignment", f.revenue_per_assignment),
            ("weights.distance", self.weights.distance),
            ("weights.congestion", self.weights.congestion),
            ("weights.monetary", self.weights.monetary),
            ("pollution.traffic_weight", self.pollution.traffic_weight),
            ("summary.cell_length_km", self.summary.cell_length_km),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(CoreError::Config(format!("{name} must be finite and non-negative")));
            }
        }
        if !(0.0..=1.0).contains(&self.pollution.green_dampening) {
            return Err(CoreError::Config("pollution.green_dampening must lie in [0, 1]".into()));
        }
        Ok(())
    }
}

fn check_band(name: &str, (lo, hi): (f64, f64)) -> CoreResult<()> {
    if lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo < hi {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} ({lo}, {hi}) is not a valid band")))
    }
}
