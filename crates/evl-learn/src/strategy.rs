//! Assignment strategy backed by a trained [`KnnClassifier`].
//!
//! Trucks are visited in id order.  Each goes to its predicted `(hub, slot)`
//! if that hub is reachable and has room, else to the next slot with room at
//! the predicted hub (wrapping past the last slot), else to the greedy
//! choice: nearest hub with room, earliest slot.  The budget gate then runs
//! exactly as for the solver, so the same constraints hold.  No search is
//! performed, so the status is never `Optimal`.

use tracing::{debug, info};

use evl_core::{HubId, TimeSlot, TruckId};
use evl_optimize::{
    budget, validate, AssignmentProblem, AssignmentStrategy, OptimizeResult, Outcome, Plan,
    SolveLimits, UnassignedReason, UnassignedTruck,
};

use crate::knn::KnnClassifier;
use crate::record::truck_features;

pub const LEARNED: &str = "learned/knn";

#[derive(Clone, Debug)]
pub struct LearnedStrategy {
    model: KnnClassifier,
}

impl LearnedStrategy {
    pub fn new(model: KnnClassifier) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &KnnClassifier {
        &self.model
    }

    /// Free `(hub, slot)` for `truck`, following the fallback order.
    fn choose(&self, problem: &AssignmentProblem<'_>, plan: &Plan, truck: TruckId) -> Option<(HubId, TimeSlot)> {
        let slot_count = problem.slot_count();
        let predicted = truck_features(problem, truck).and_then(|x| self.model.predict(x));

        if let Some(label) = predicted {
            let hub = label.hub_id();
            if hub.index() < problem.hub_count() && problem.hops.get(truck, hub).is_some() {
                let start = label.time_slot().index() % slot_count;
                let found = (0..slot_count)
                    .map(|i| TimeSlot(((start + i) % slot_count) as u8))
                    .find(|&s| plan.has_room(hub, s));
                if let Some(s) = found {
                    return Some((hub, s));
                }
            }
        }

        let mut hubs: Vec<(u32, HubId)> = problem.hops.reachable(truck).map(|(h, d)| (d, h)).collect();
        hubs.sort_unstable();
        hubs.iter().find_map(|&(_, hub)| {
            problem.slots.slots().find(|&s| plan.has_room(hub, s)).map(|s| (hub, s))
        })
    }
}

impl AssignmentStrategy for LearnedStrategy {
    fn name(&self) -> &str {
        LEARNED
    }

    fn solve(&self, problem: &AssignmentProblem<'_>, limits: &SolveLimits) -> OptimizeResult<Outcome> {
        let mut plan = Plan::empty(problem);
        let mut unassigned = Vec::new();

        for truck in problem.fleet.truck_ids() {
            if limits.expired() {
                debug!(%truck, "deadline reached during learned placement");
                unassigned.extend(
                    (truck.0..problem.truck_count() as u32)
                        .map(|t| UnassignedTruck { truck: TruckId(t), reason: UnassignedReason::Deadline }),
                );
                break;
            }
            if problem.hops.nearest(truck).is_none() {
                unassigned.push(UnassignedTruck { truck, reason: UnassignedReason::Unreachable });
                continue;
            }
            match self.choose(problem, &plan, truck) {
                Some((hub, slot)) => plan.place(problem, truck, hub, slot)?,
                None => unassigned.push(UnassignedTruck { truck, reason: UnassignedReason::Capacity }),
            }
        }

        let dropped = budget::gate(problem, &mut plan);
        unassigned.extend(dropped.into_iter().map(|truck| UnassignedTruck { truck, reason: UnassignedReason::Budget }));

        let outcome = Outcome::from_plan(problem, &plan, unassigned, false, 0, LEARNED);
        validate(problem, &outcome)?;
        info!(
            strategy = LEARNED,
            status = %outcome.status,
            assigned = outcome.n_assigned(),
            trucks = problem.truck_count(),
            objective = ?outcome.objective,
            "assignment predicted"
        );
        Ok(outcome)
    }
}
