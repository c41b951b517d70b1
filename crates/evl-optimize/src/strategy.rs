//! The `AssignmentStrategy` trait and the solver-based implementation.
//!
//! Strategies are selected by configuration and called through the trait;
//! callers never inspect which implementation they hold.

use tracing::info;

use crate::{solver, validate, AssignmentProblem, OptimizeResult, Outcome, SolveLimits};

/// Pluggable assignment strategy.
///
/// Implementations must return an outcome that honours capacity, budget and
/// one-assignment-per-truck; [`validate`] checks exactly that.
///
/// # Thread safety
///
/// Strategies are shared across concurrent requests, so they must be
/// `Send + Sync` and hold no per-run state.
pub trait AssignmentStrategy: Send + Sync {
    /// Short name recorded in the outcome.
    fn name(&self) -> &str;

    fn solve(&self, problem: &AssignmentProblem<'_>, limits: &SolveLimits) -> OptimizeResult<Outcome>;
}

/// Which solver algorithm to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolveMode {
    /// Regret insertion plus local search, budget-aware fallback.
    #[default]
    Optimize,
    /// Nearest hub, earliest slot.
    Greedy,
}

impl SolveMode {
    /// `with_optimization` request flag to mode.
    pub fn from_flag(with_optimization: bool) -> Self {
        if with_optimization { SolveMode::Optimize } else { SolveMode::Greedy }
    }
}

/// Solver-based strategy.
#[derive(Copy, Clone, Debug, Default)]
pub struct SolverStrategy {
    pub mode: SolveMode,
}

impl SolverStrategy {
    pub fn new(mode: SolveMode) -> Self {
        Self { mode }
    }
}

impl AssignmentStrategy for SolverStrategy {
    fn name(&self) -> &str {
        match self.mode {
            SolveMode::Optimize => solver::OPTIMIZE,
            SolveMode::Greedy => solver::GREEDY,
        }
    }

    fn solve(&self, problem: &AssignmentProblem<'_>, limits: &SolveLimits) -> OptimizeResult<Outcome> {
        let outcome = match self.mode {
            SolveMode::Optimize => solver::optimize(problem, limits)?,
            SolveMode::Greedy => solver::greedy(problem)?,
        };
        validate(problem, &outcome)?;
        info!(
            strategy = self.name(),
            status = %outcome.status,
            assigned = outcome.n_assigned(),
            trucks = problem.truck_count(),
            objective = ?outcome.objective,
            "assignment solved"
        );
        Ok(outcome)
    }
}
