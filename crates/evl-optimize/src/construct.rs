//! Construction heuristics: build a plan from nothing.
//!
//! | Function             | Used by                 | Order                                   |
//! |----------------------|-------------------------|-----------------------------------------|
//! | [`regret_insertion`] | optimize, budget-free   | largest regret first                    |
//! | [`cheapest_monetary`]| optimize, over budget   | ascending cheapest monetary option      |
//! | [`nearest_first`]    | greedy mode             | truck id                                |
//!
//! None of them look at the budget; the budget gate runs afterwards.

use tracing::debug;

use evl_core::{HubId, TimeSlot, TruckId};

use crate::{AssignmentProblem, OptimizeResult, Plan, SolveLimits, UnassignedReason, UnassignedTruck};

/// Trucks the construction could not place.
#[derive(Debug, Default)]
pub struct Construction {
    pub unplaced: Vec<UnassignedTruck>,
}

impl Construction {
    fn skip(&mut self, truck: TruckId, reason: UnassignedReason) {
        self.unplaced.push(UnassignedTruck { truck, reason });
    }
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    cost: f64,
    hub:  HubId,
    slot: TimeSlot,
}

/// Best and second-best insertion for one truck.
#[derive(Copy, Clone, Debug, Default)]
struct TopTwo {
    best:   Option<Candidate>,
    second: Option<Candidate>,
}

impl TopTwo {
    fn touches(&self, hub: HubId, slot: TimeSlot) -> bool {
        [self.best, self.second]
            .into_iter()
            .flatten()
            .any(|c| c.hub == hub && c.slot == slot)
    }

    /// Gap between the two best options; infinite when only one is left.
    fn regret(&self) -> f64 {
        match (self.best, self.second) {
            (Some(b), Some(s)) => s.cost - b.cost,
            _ => f64::INFINITY,
        }
    }
}

/// Scan open `(hub, slot)` groups in hub-major order.  Strict comparison
/// keeps the lowest hub, then slot, among equal costs.
fn top_two(problem: &AssignmentProblem<'_>, plan: &Plan, truck: TruckId) -> TopTwo {
    let mut top = TopTwo::default();
    for (hub, _) in problem.hops.reachable(truck) {
        for slot in problem.slots.slots() {
            if !plan.has_room(hub, slot) {
                continue;
            }
            let Some(cost) = problem.insertion_cost(truck, hub, slot, plan.load(hub, slot)) else {
                continue;
            };
            let c = Candidate { cost, hub, slot };
            match top.best {
                Some(b) if cost >= b.cost => {
                    if top.second.is_none_or(|s| cost < s.cost) {
                        top.second = Some(c);
                    }
                }
                _ => {
                    top.second = top.best;
                    top.best = Some(c);
                }
            }
        }
    }
    top
}

/// Reason for a truck with no open option.
fn blocked_reason(problem: &AssignmentProblem<'_>, truck: TruckId) -> UnassignedReason {
    if problem.hops.nearest(truck).is_none() {
        UnassignedReason::Unreachable
    } else {
        UnassignedReason::Capacity
    }
}

// ── Regret insertion ─────────────────────────────────────────────────────────

/// Regret-2 insertion.
///
/// Repeatedly takes the unplaced truck whose best and second-best options
/// differ most (ties: lowest truck id) and places it at its best option.
/// Each truck's top two options are cached and recomputed only when the
/// group just filled was one of them: placing a truck only raises the cost
/// of its own group, so other rankings are unaffected.
pub fn regret_insertion(
    problem: &AssignmentProblem<'_>,
    plan: &mut Plan,
    limits: &SolveLimits,
) -> OptimizeResult<Construction> {
    let mut out = Construction::default();
    let mut pool: Vec<TruckId> = plan.unplaced().collect();
    let mut cache: Vec<TopTwo> = pool.iter().map(|&t| top_two(problem, plan, t)).collect();

    while !pool.is_empty() {
        if limits.expired() {
            debug!(remaining = pool.len(), "deadline reached during insertion");
            for &t in &pool {
                out.skip(t, UnassignedReason::Deadline);
            }
            break;
        }

        // Drop trucks with no open option.
        let mut i = 0;
        while i < pool.len() {
            if cache[i].best.is_none() {
                out.skip(pool[i], blocked_reason(problem, pool[i]));
                pool.remove(i);
                cache.remove(i);
            } else {
                i += 1;
            }
        }
        if pool.is_empty() {
            break;
        }

        let mut pick = 0;
        let mut pick_regret = cache[0].regret();
        for (i, top) in cache.iter().enumerate().skip(1) {
            let r = top.regret();
            if r > pick_regret {
                pick = i;
                pick_regret = r;
            }
        }

        let truck = pool.remove(pick);
        let top = cache.remove(pick);
        let Some(best) = top.best else { continue };
        plan.place(problem, truck, best.hub, best.slot)?;

        for (t, cached) in pool.iter().zip(cache.iter_mut()) {
            if cached.touches(best.hub, best.slot) {
                *cached = top_two(problem, plan, *t);
            }
        }
    }

    out.unplaced.sort_by_key(|u| u.truck);
    Ok(out)
}

// ── Cheapest monetary ────────────────────────────────────────────────────────

/// Place each truck at its cheapest monetary option.
///
/// Trucks are processed in ascending order of their cheapest conceivable
/// monetary cost (nearest hub, off-peak), ties by id, so cheap trucks get
/// first pick.  Among equally cheap open options the lowest insertion cost
/// wins, then the lowest hub and slot.
pub fn cheapest_monetary(problem: &AssignmentProblem<'_>, plan: &mut Plan) -> OptimizeResult<Construction> {
    let mut out = Construction::default();

    let mut order: Vec<(f64, TruckId)> = Vec::with_capacity(problem.truck_count());
    for truck in problem.fleet.truck_ids() {
        let floor = problem
            .hops
            .reachable(truck)
            .flat_map(|(_, d)| problem.slots.slots().map(move |s| (d, s)))
            .map(|(d, s)| problem.monetary_cost(d, s))
            .min_by(f64::total_cmp);
        match floor {
            Some(m) => order.push((m, truck)),
            None => out.skip(truck, UnassignedReason::Unreachable),
        }
    }
    order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    for &(_, truck) in &order {
        let mut best: Option<(f64, f64, HubId, TimeSlot)> = None;
        for (hub, d) in problem.hops.reachable(truck) {
            for slot in problem.slots.slots() {
                if !plan.has_room(hub, slot) {
                    continue;
                }
                let m = problem.monetary_cost(d, slot);
                let Some(c) = problem.insertion_cost(truck, hub, slot, plan.load(hub, slot)) else {
                    continue;
                };
                let better = match best {
                    None => true,
                    Some((bm, bc, _, _)) => m < bm || (m == bm && c < bc),
                };
                if better {
                    best = Some((m, c, hub, slot));
                }
            }
        }
        match best {
            Some((_, _, hub, slot)) => plan.place(problem, truck, hub, slot)?,
            None => out.skip(truck, UnassignedReason::Capacity),
        }
    }

    out.unplaced.sort_by_key(|u| u.truck);
    Ok(out)
}

// ── Nearest first ────────────────────────────────────────────────────────────

/// Greedy heuristic: trucks in id order, each to its nearest hub with room
/// (ties: lowest hub id), earliest slot with room.  No global cost
/// minimization.
pub fn nearest_first(problem: &AssignmentProblem<'_>, plan: &mut Plan) -> OptimizeResult<Construction> {
    let mut out = Construction::default();
    for truck in problem.fleet.truck_ids() {
        let mut hubs: Vec<(u32, HubId)> = problem.hops.reachable(truck).map(|(h, d)| (d, h)).collect();
        if hubs.is_empty() {
            out.skip(truck, UnassignedReason::Unreachable);
            continue;
        }
        hubs.sort_unstable();

        let slot = hubs.iter().find_map(|&(_, hub)| {
            problem.slots.slots().find(|&s| plan.has_room(hub, s)).map(|s| (hub, s))
        });
        match slot {
            Some((hub, s)) => plan.place(problem, truck, hub, s)?,
            None => out.skip(truck, UnassignedReason::Capacity),
        }
    }
    Ok(out)
}
