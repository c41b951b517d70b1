//! Pipeline observer trait for batch clients and data collection.

use evl_demand::Fleet;
use evl_optimize::{AssignmentProblem, Outcome};
use evl_spatial::GridNetwork;

use crate::OptimizeResponse;

/// Callbacks invoked by [`Platform::run`][crate::Platform::run] after each
/// pipeline stage.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers see read-only views and
/// cannot change the run.
///
/// # Example: assignment counter
///
/// ```rust,ignore
/// struct Counter { assigned: usize }
///
/// impl PipelineObserver for Counter {
///     fn on_outcome(&mut self, _p: &AssignmentProblem<'_>, outcome: &Outcome) {
///         self.assigned += outcome.n_assigned();
///     }
/// }
/// ```
pub trait PipelineObserver {
    /// Called once the grid and its hubs are built.
    fn on_network(&mut self, _grid: &GridNetwork) {}

    /// Called once the fleet is generated.
    fn on_fleet(&mut self, _fleet: &Fleet) {}

    /// Called after the strategy returns and its outcome has been validated.
    ///
    /// The problem exposes hop distances, which training-record writers
    /// need and the response does not carry.
    fn on_outcome(&mut self, _problem: &AssignmentProblem<'_>, _outcome: &Outcome) {}

    /// Called with the finished response.
    fn on_report(&mut self, _response: &OptimizeResponse) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
