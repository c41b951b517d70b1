//! Mutable working assignment used by every strategy.
//!
//! A `Plan` tracks, per truck, its `(hub, slot)` placement and monetary cost,
//! and per `(hub, slot)` the current load.  All mutations go through
//! [`place`](Plan::place) / [`remove`](Plan::remove) so the load table and the
//! running monetary total stay in step with the placements.

use evl_core::{HubId, TimeSlot, TruckId};

use crate::{AssignmentProblem, OptimizeError, OptimizeResult};

#[derive(Clone, Debug)]
pub struct Plan {
    slot_count:     usize,
    placement:      Vec<Option<(HubId, TimeSlot)>>,
    monetary:       Vec<f64>,
    load:           Vec<u32>,
    capacity:       Vec<u32>,
    monetary_total: f64,
}

impl Plan {
    /// A plan with no truck placed.
    pub fn empty(problem: &AssignmentProblem<'_>) -> Self {
        let trucks = problem.truck_count();
        let slot_count = problem.slot_count();
        Self {
            slot_count,
            placement:      vec![None; trucks],
            monetary:       vec![0.0; trucks],
            load:           vec![0; problem.hub_count() * slot_count],
            capacity:       problem.grid.hubs.iter().map(|h| h.capacity).collect(),
            monetary_total: 0.0,
        }
    }

    #[inline]
    fn group(&self, hub: HubId, slot: TimeSlot) -> usize {
        hub.index() * self.slot_count + slot.index()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn placement(&self, truck: TruckId) -> Option<(HubId, TimeSlot)> {
        self.placement[truck.index()]
    }

    #[inline]
    pub fn is_placed(&self, truck: TruckId) -> bool {
        self.placement[truck.index()].is_some()
    }

    #[inline]
    pub fn load(&self, hub: HubId, slot: TimeSlot) -> u32 {
        self.load[self.group(hub, slot)]
    }

    #[inline]
    pub fn has_room(&self, hub: HubId, slot: TimeSlot) -> bool {
        self.load(hub, slot) < self.capacity[hub.index()]
    }

    /// Monetary cost of `truck`'s current placement, 0 if unplaced.
    #[inline]
    pub fn monetary(&self, truck: TruckId) -> f64 {
        self.monetary[truck.index()]
    }

    /// Running Σ monetary over placed trucks.
    #[inline]
    pub fn monetary_total(&self) -> f64 {
        self.monetary_total
    }

    pub fn placed_count(&self) -> usize {
        self.placement.iter().filter(|p| p.is_some()).count()
    }

    /// `(truck, hub, slot)` for every placed truck in truck id order.
    pub fn placements(&self) -> impl Iterator<Item = (TruckId, HubId, TimeSlot)> + '_ {
        self.placement
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|(h, s)| (TruckId(i as u32), h, s)))
    }

    /// Unplaced trucks in id order.
    pub fn unplaced(&self) -> impl Iterator<Item = TruckId> + '_ {
        self.placement
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| TruckId(i as u32))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Place an unplaced truck.  Fails if the truck is already placed, the
    /// hub is unreachable, or the group is full.
    pub fn place(
        &mut self,
        problem: &AssignmentProblem<'_>,
        truck: TruckId,
        hub: HubId,
        slot: TimeSlot,
    ) -> OptimizeResult<()> {
        if let Some(prev) = self.placement[truck.index()] {
            return Err(OptimizeError::Consistency(format!(
                "{truck} placed twice ({}/{} then {hub}/{slot})",
                prev.0, prev.1
            )));
        }
        let Some(hops) = problem.hops.get(truck, hub) else {
            return Err(OptimizeError::Consistency(format!("{truck} cannot reach {hub}")));
        };
        if !self.has_room(hub, slot) {
            return Err(OptimizeError::Consistency(format!("{hub} full at {slot}")));
        }
        let m = problem.monetary_cost(hops, slot);
        let g = self.group(hub, slot);
        self.load[g] += 1;
        self.placement[truck.index()] = Some((hub, slot));
        self.monetary[truck.index()] = m;
        self.monetary_total += m;
        Ok(())
    }

    /// Unplace `truck`, returning its former placement.
    pub fn remove(&mut self, truck: TruckId) -> Option<(HubId, TimeSlot)> {
        let (hub, slot) = self.placement[truck.index()].take()?;
        let g = self.group(hub, slot);
        self.load[g] -= 1;
        self.monetary_total -= self.monetary[truck.index()];
        self.monetary[truck.index()] = 0.0;
        Some((hub, slot))
    }

    /// Exchange the placements of two placed trucks.  Group loads are
    /// unchanged.
    pub fn swap(&mut self, problem: &AssignmentProblem<'_>, a: TruckId, b: TruckId) -> OptimizeResult<()> {
        let (Some((ha, sa)), Some((hb, sb))) = (self.remove(a), self.remove(b)) else {
            return Err(OptimizeError::Consistency(format!("swap of unplaced {a} or {b}")));
        };
        self.place(problem, a, hb, sb)?;
        self.place(problem, b, ha, sa)
    }

    /// Re-sum the monetary total from per-truck values, discarding
    /// accumulated rounding.
    pub fn resync(&mut self) {
        self.monetary_total = self.monetary.iter().sum();
    }
}
