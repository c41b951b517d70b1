//! Post-solve consistency checks.
//!
//! Every strategy's outcome passes through [`validate`] before it leaves the
//! crate.  A violation means the strategy is defective, so the run aborts
//! with [`OptimizeError::Consistency`] instead of returning the outcome.

use crate::cost::EPS;
use crate::{AssignmentProblem, OptimizeError, OptimizeResult, Outcome, SolveStatus};

pub fn validate(problem: &AssignmentProblem<'_>, outcome: &Outcome) -> OptimizeResult<()> {
    let fail = |msg: String| Err(OptimizeError::Consistency(msg));
    let trucks = problem.truck_count();
    let slots = problem.slot_count();

    // Every truck exactly once across assigned and unassigned.
    let mut seen = vec![false; trucks];
    let mut load = vec![0u32; problem.hub_count() * slots];
    let mut monetary = 0.0;

    if outcome.assignments.windows(2).any(|w| w[0].truck >= w[1].truck) {
        return fail("assignments not sorted by truck id".into());
    }
    for a in &outcome.assignments {
        if a.truck.index() >= trucks {
            return fail(format!("{} is not in the fleet", a.truck));
        }
        if std::mem::replace(&mut seen[a.truck.index()], true) {
            return fail(format!("{} assigned twice", a.truck));
        }
        if a.hub.index() >= problem.hub_count() {
            return fail(format!("{} assigned to unknown {}", a.truck, a.hub));
        }
        if a.slot.index() >= slots {
            return fail(format!("{} assigned to slot {} of {slots}", a.truck, a.slot.0));
        }
        match problem.hops.get(a.truck, a.hub) {
            Some(h) if h == a.hops => {}
            Some(h) => return fail(format!("{} reports {} hops, route has {h}", a.truck, a.hops)),
            None => return fail(format!("{} cannot reach {}", a.truck, a.hub)),
        }
        let expected = problem.monetary_cost(a.hops, a.slot);
        if (expected - a.monetary).abs() > EPS.max(expected.abs() * EPS) {
            return fail(format!("{} monetary {} != {expected}", a.truck, a.monetary));
        }
        monetary += a.monetary;

        let g = a.hub.index() * slots + a.slot.index();
        load[g] += 1;
        if load[g] > problem.capacity(a.hub) {
            return fail(format!("{} over capacity at {}", a.hub, a.slot));
        }
    }

    for u in &outcome.unassigned {
        if u.truck.index() >= trucks {
            return fail(format!("{} is not in the fleet", u.truck));
        }
        if std::mem::replace(&mut seen[u.truck.index()], true) {
            return fail(format!("{} both assigned and unassigned, or listed twice", u.truck));
        }
    }
    if let Some(i) = seen.iter().position(|&s| !s) {
        return fail(format!("TruckId({i}) missing from outcome"));
    }

    let budget = problem.budget();
    // Same truck id order as `Plan::resync`, so the sums agree exactly.
    if monetary > budget {
        return fail(format!("monetary total {monetary} exceeds budget {budget}"));
    }

    let complete = outcome.unassigned.is_empty();
    match outcome.status {
        SolveStatus::Infeasible if complete => fail("infeasible status with every truck assigned".into()),
        SolveStatus::Optimal | SolveStatus::Feasible if !complete => {
            fail(format!("{} status with unassigned trucks", outcome.status))
        }
        _ => Ok(()),
    }
}
