//! Objective terms.
//!
//! For truck `t` at hub `h` in slot `s`:
//!
//! ```text
//! distance   d = hops(t, h)
//! monetary   m = charge_fee + hop_fee·d + [peak(s)]·peak_surcharge·peak_multiplier
//! congestion C(n) = mult(s) · (n + n(n−1) / (2·capacity(h)))   per (h, s) group of n trucks
//!
//! objective  = w_d·Σd + w_c·ΣC + w_m·Σm
//! ```
//!
//! Adding the k-th truck to a group therefore costs
//! `mult(s) · (1 + (k−1)/capacity(h))` in congestion, which is what the
//! construction heuristics and local search price moves with.

use evl_core::{HubId, TimeSlot, TruckId};

use crate::{AssignmentProblem, Plan};

/// Tolerance for move acceptance and per-assignment cost checks.
pub const EPS: f64 = 1e-9;

/// Summed objective terms of a plan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    /// Σ hops over assigned trucks.
    pub distance:   f64,
    /// Σ C(n) over (hub, slot) groups.
    pub congestion: f64,
    /// Σ monetary cost; never exceeds the budget in a returned outcome.
    pub monetary:   f64,
    /// Weighted total.
    pub objective:  f64,
}

impl AssignmentProblem<'_> {
    /// Monetary cost of serving a truck `hops` away from its hub in `slot`.
    #[inline]
    pub fn monetary_cost(&self, hops: u32, slot: TimeSlot) -> f64 {
        let f = &self.params.fees;
        let peak = if self.slots.is_peak(slot) {
            f.peak_surcharge * self.params.peak_multiplier
        } else {
            0.0
        };
        f.charge_fee + f.hop_fee * hops as f64 + peak
    }

    /// Congestion added by one more truck at `(hub, slot)` already holding
    /// `load` trucks.
    #[inline]
    pub fn congestion_step(&self, hub: HubId, slot: TimeSlot, load: u32) -> f64 {
        self.slots.multiplier(slot) * (1.0 + load as f64 / self.capacity(hub) as f64)
    }

    /// Congestion of a `(hub, slot)` group of `n` trucks.
    pub fn group_congestion(&self, hub: HubId, slot: TimeSlot, n: u32) -> f64 {
        let n = n as f64;
        self.slots.multiplier(slot) * (n + n * (n - 1.0) / (2.0 * self.capacity(hub) as f64))
    }

    /// Weighted cost of `truck` independent of group size: distance plus
    /// monetary.  `None` if the hub is unreachable.
    #[inline]
    pub fn fixed_cost(&self, truck: TruckId, hub: HubId, slot: TimeSlot) -> Option<f64> {
        let w = &self.params.weights;
        let d = self.hops.get(truck, hub)?;
        Some(w.distance * d as f64 + w.monetary * self.monetary_cost(d, slot))
    }

    /// Objective increase from placing `truck` at `(hub, slot)` holding
    /// `load` trucks.  `None` if the hub is unreachable.
    #[inline]
    pub fn insertion_cost(&self, truck: TruckId, hub: HubId, slot: TimeSlot, load: u32) -> Option<f64> {
        let fixed = self.fixed_cost(truck, hub, slot)?;
        Some(fixed + self.params.weights.congestion * self.congestion_step(hub, slot, load))
    }

    /// Recompute every objective term of `plan` from scratch.
    pub fn evaluate(&self, plan: &Plan) -> CostBreakdown {
        let mut distance = 0.0;
        let mut monetary = 0.0;
        for (truck, hub, slot) in plan.placements() {
            if let Some(d) = self.hops.get(truck, hub) {
                distance += d as f64;
                monetary += self.monetary_cost(d, slot);
            }
        }
        let congestion: f64 = self
            .options()
            .map(|(h, s)| self.group_congestion(h, s, plan.load(h, s)))
            .sum();
        let w = &self.params.weights;
        CostBreakdown {
            distance,
            congestion,
            monetary,
            objective: w.distance * distance + w.congestion * congestion + w.monetary * monetary,
        }
    }
}
