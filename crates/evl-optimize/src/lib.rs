//! `evl-optimize`: truck-to-(hub, slot) assignment under capacity and budget.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                 |
//! |--------------------|----------------------------------------------------------|
//! | [`problem`]        | `AssignmentProblem`, `ProblemParams`, `HopTable`, `SolveLimits` |
//! | [`cost`]           | Objective terms, `CostBreakdown`                         |
//! | [`plan`]           | `Plan`: mutable working assignment                       |
//! | [`construct`]      | Regret insertion, cheapest-monetary, nearest-first       |
//! | [`local_search`]   | Relocate / swap improvement                              |
//! | [`budget`]         | Budget gate                                              |
//! | [`result`]         | `Outcome`, `Assignment`, `SolveStatus`, `UnassignedReason` |
//! | [`strategy`]       | `AssignmentStrategy` trait, `SolverStrategy`, `SolveMode` |
//! | [`validate`]       | Post-solve consistency checks                            |
//! | [`error`]          | `OptimizeError`, `OptimizeResult<T>`                     |
//!
//! # Guarantees
//!
//! Every outcome returned through [`AssignmentStrategy::solve`] has been
//! validated: each truck appears once (assigned or unassigned with a reason),
//! no `(hub, slot)` exceeds its capacity, and the monetary total is within
//! budget.  Outcomes are deterministic for identical inputs: every tie is
//! broken by lowest truck id, then hub id, then slot.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Per-hub hop fields computed with Rayon.                 |
//! | `serde`    | Derives `Serialize`/`Deserialize` on result types.      |

pub mod budget;
pub mod construct;
pub mod cost;
pub mod error;
pub mod local_search;
pub mod plan;
pub mod problem;
pub mod result;
pub mod strategy;
pub mod validate;

mod solver;


pub use cost::CostBreakdown;
pub use error::{OptimizeError, OptimizeResult};
pub use plan::Plan;
pub use problem::{AssignmentProblem, HopTable, ProblemParams, SolveLimits};
pub use result::{Assignment, Outcome, SolveStatus, UnassignedReason, UnassignedTruck};
pub use strategy::{AssignmentStrategy, SolveMode, SolverStrategy};
pub use validate::validate;
