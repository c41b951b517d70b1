//! Budget gate.
//!
//! Keeps placed trucks in ascending `(monetary cost, truck id)` order while
//! the running total stays within the budget, and unplaces the rest.  The
//! order depends only on the plan, never on the budget, so for a fixed plan
//! the number of kept trucks is non-decreasing in the budget.
//!
//! Comparisons are exact.  The plan's total is re-summed in truck id order
//! after the cut; if that order rounds above the budget, the most expensive
//! kept trucks are dropped until it does not.

use tracing::debug;

use evl_core::TruckId;

use crate::{AssignmentProblem, Plan};

/// Apply the gate to `plan` and return the dropped trucks in id order.
pub fn gate(problem: &AssignmentProblem<'_>, plan: &mut Plan) -> Vec<TruckId> {
    let mut order: Vec<(f64, TruckId)> =
        plan.placements().map(|(t, _, _)| (plan.monetary(t), t)).collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let budget = problem.budget();
    let mut running = 0.0;
    let mut keep = order.len();
    for (i, &(m, _)) in order.iter().enumerate() {
        if running + m > budget {
            keep = i;
            break;
        }
        running += m;
    }

    for &(_, t) in &order[keep..] {
        plan.remove(t);
    }
    plan.resync();
    while keep > 0 && plan.monetary_total() > budget {
        keep -= 1;
        plan.remove(order[keep].1);
        plan.resync();
    }

    let mut dropped: Vec<TruckId> = order[keep..].iter().map(|&(_, t)| t).collect();
    dropped.sort();

    if !dropped.is_empty() {
        debug!(kept = keep, dropped = dropped.len(), budget, "budget gate applied");
    }
    dropped
}
