//! The two solver modes.
//!
//! # Optimize
//!
//! 1. Plan A: regret insertion, then local search, ignoring the budget.
//! 2. If Plan A fits the budget, it is the result.
//! 3. Otherwise Plan B: cheapest monetary placement, then the budget gate,
//!    then local search restricted to moves that stay within budget.
//!
//! # Greedy
//!
//! Nearest hub, earliest slot with room, in truck id order, then the budget
//! gate.  Never reported as `Optimal`.

use tracing::{debug, info};

use crate::{
    budget, construct, local_search, AssignmentProblem, OptimizeResult, Outcome, Plan,
    SolveLimits, UnassignedReason, UnassignedTruck,
};

pub(crate) const OPTIMIZE: &str = "solver/optimize";
pub(crate) const GREEDY:   &str = "solver/greedy";

pub(crate) fn optimize(problem: &AssignmentProblem<'_>, limits: &SolveLimits) -> OptimizeResult<Outcome> {
    let mut plan = Plan::empty(problem);
    let built = construct::regret_insertion(problem, &mut plan, limits)?;
    let search = local_search::improve(problem, &mut plan, limits, None)?;
    plan.resync();

    if plan.monetary_total() <= problem.budget() {
        return Ok(Outcome::from_plan(
            problem,
            &plan,
            built.unplaced,
            search.converged,
            search.passes,
            OPTIMIZE,
        ));
    }

    debug!(
        monetary = plan.monetary_total(),
        budget = problem.budget(),
        "unconstrained plan over budget, rebuilding cheapest-first"
    );
    let mut plan = Plan::empty(problem);
    let built = construct::cheapest_monetary(problem, &mut plan)?;
    let dropped = budget::gate(problem, &mut plan);
    let search = local_search::improve(problem, &mut plan, limits, Some(problem.budget()))?;
    // Moves are priced on the running total; the exact re-sum gets the last word.
    let trimmed = budget::gate(problem, &mut plan);

    let mut unassigned = built.unplaced;
    unassigned.extend(
        dropped
            .into_iter()
            .chain(trimmed)
            .map(|truck| UnassignedTruck { truck, reason: UnassignedReason::Budget }),
    );
    let outcome = Outcome::from_plan(problem, &plan, unassigned, search.converged, search.passes, OPTIMIZE);
    info!(
        assigned = outcome.n_assigned(),
        budget_dropped = outcome.unassigned_for(UnassignedReason::Budget),
        "budget-constrained solve"
    );
    Ok(outcome)
}

pub(crate) fn greedy(problem: &AssignmentProblem<'_>) -> OptimizeResult<Outcome> {
    let mut plan = Plan::empty(problem);
    let built = construct::nearest_first(problem, &mut plan)?;
    let dropped = budget::gate(problem, &mut plan);

    let mut unassigned = built.unplaced;
    unassigned.extend(dropped.into_iter().map(|truck| UnassignedTruck { truck, reason: UnassignedReason::Budget }));
    Ok(Outcome::from_plan(problem, &plan, unassigned, false, 0, GREEDY))
}
