//! Relocate / swap local search.
//!
//! Each pass visits trucks in id order and applies, per truck, the best
//! improving relocation, then scans swaps with first-improvement.  Passes
//! repeat until one makes no move, `max_passes` is reached, or the deadline
//! passes.
//!
//! A swap leaves every group's load unchanged, so its congestion delta is
//! zero and the peak surcharges cancel.  What remains is
//! `(w_d + w_m·hop_fee) · Δhops`.

use tracing::debug;

use evl_core::{HubId, TimeSlot, TruckId};

use crate::cost::EPS;
use crate::{AssignmentProblem, OptimizeResult, Plan, SolveLimits};

/// How a search ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    pub passes:    u32,
    pub moves:     u32,
    /// `true` if the last pass found no improving move.
    pub converged: bool,
}

/// Improve `plan` in place.  With `budget_cap`, only moves that keep the
/// monetary total within the cap are taken.
pub fn improve(
    problem: &AssignmentProblem<'_>,
    plan: &mut Plan,
    limits: &SolveLimits,
    budget_cap: Option<f64>,
) -> OptimizeResult<SearchReport> {
    let mut report = SearchReport::default();
    while report.passes < limits.max_passes {
        if limits.expired() {
            debug!(passes = report.passes, "deadline reached during local search");
            return Ok(report);
        }
        report.passes += 1;
        let moved = relocate_pass(problem, plan, limits, budget_cap)?
            + swap_pass(problem, plan, limits, budget_cap)?;
        plan.resync();
        report.moves += moved;
        if moved == 0 {
            report.converged = true;
            break;
        }
    }
    debug!(passes = report.passes, moves = report.moves, converged = report.converged, "local search done");
    Ok(report)
}

#[inline]
fn within_cap(plan: &Plan, delta_monetary: f64, cap: Option<f64>) -> bool {
    cap.is_none_or(|c| plan.monetary_total() + delta_monetary <= c)
}

fn relocate_pass(
    problem: &AssignmentProblem<'_>,
    plan: &mut Plan,
    limits: &SolveLimits,
    cap: Option<f64>,
) -> OptimizeResult<u32> {
    let w_c = problem.params.weights.congestion;
    let mut moves = 0;

    for truck in problem.fleet.truck_ids() {
        if limits.expired() {
            break;
        }
        let Some((hub, slot)) = plan.placement(truck) else { continue };
        let Some(fixed) = problem.fixed_cost(truck, hub, slot) else { continue };
        let removal = fixed + w_c * problem.congestion_step(hub, slot, plan.load(hub, slot) - 1);
        let current_m = plan.monetary(truck);

        let mut best: Option<(f64, HubId, TimeSlot)> = None;
        for (h2, d2) in problem.hops.reachable(truck) {
            for s2 in problem.slots.slots() {
                if (h2, s2) == (hub, slot) || !plan.has_room(h2, s2) {
                    continue;
                }
                let Some(add) = problem.insertion_cost(truck, h2, s2, plan.load(h2, s2)) else {
                    continue;
                };
                let delta = add - removal;
                if delta >= -EPS || best.is_some_and(|(b, _, _)| delta >= b) {
                    continue;
                }
                if !within_cap(plan, problem.monetary_cost(d2, s2) - current_m, cap) {
                    continue;
                }
                best = Some((delta, h2, s2));
            }
        }

        if let Some((_, h2, s2)) = best {
            plan.remove(truck);
            plan.place(problem, truck, h2, s2)?;
            moves += 1;
        }
    }
    Ok(moves)
}

fn swap_pass(
    problem: &AssignmentProblem<'_>,
    plan: &mut Plan,
    limits: &SolveLimits,
    cap: Option<f64>,
) -> OptimizeResult<u32> {
    let w = &problem.params.weights;
    let per_hop = w.distance + w.monetary * problem.params.fees.hop_fee;
    if per_hop <= 0.0 {
        return Ok(0);
    }

    let placed: Vec<TruckId> = plan.placements().map(|(t, _, _)| t).collect();
    let mut moves = 0;

    for (i, &a) in placed.iter().enumerate() {
        if limits.expired() {
            break;
        }
        for &b in &placed[i + 1..] {
            let (Some((ha, _)), Some((hb, _))) = (plan.placement(a), plan.placement(b)) else {
                continue;
            };
            if ha == hb {
                continue;
            }
            let hops = |t: TruckId, h: HubId| problem.hops.get(t, h);
            let (Some(a_here), Some(b_here), Some(a_there), Some(b_there)) =
                (hops(a, ha), hops(b, hb), hops(a, hb), hops(b, ha))
            else {
                continue;
            };
            let dhops = (a_there + b_there) as f64 - (a_here + b_here) as f64;
            if per_hop * dhops >= -EPS {
                continue;
            }
            if !within_cap(plan, problem.params.fees.hop_fee * dhops, cap) {
                continue;
            }
            plan.swap(problem, a, b)?;
            moves += 1;
        }
    }
    Ok(moves)
}
