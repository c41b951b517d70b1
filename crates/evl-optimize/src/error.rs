//! Optimizer error type.
//!
//! Infeasibility is not an error: it is reported through
//! [`SolveStatus::Infeasible`](crate::SolveStatus::Infeasible) with a partial
//! assignment.  Errors here abort the solve.

use thiserror::Error;

use evl_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum OptimizeError {
    /// Malformed problem parameters (empty fleet, no hubs, negative budget).
    #[error("invalid problem: {0}")]
    Config(String),

    /// A constraint violation detected after solving.  Indicates a defect
    /// in a strategy; the result must not be used.
    #[error("internal consistency violation: {0}")]
    Consistency(String),

    #[error("routing failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type OptimizeResult<T> = Result<T, OptimizeError>;
