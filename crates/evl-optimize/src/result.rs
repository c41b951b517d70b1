//! Solve outcomes.

use std::fmt;

use evl_core::{HubId, TimeSlot, TruckId};

use crate::{AssignmentProblem, CostBreakdown, Plan};

/// Quality tag of an outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SolveStatus {
    /// Every truck assigned and local search converged.
    Optimal,
    /// Every truck assigned, but the result was not proven locally optimal
    /// (heuristic strategy, pass limit or deadline).
    Feasible,
    /// At least one truck is unassigned.
    Infeasible,
}

impl SolveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a truck received no assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnassignedReason {
    /// Every reachable `(hub, slot)` was full.
    Capacity,
    /// Dropped by the budget gate.
    Budget,
    /// Not reached before the solve deadline.
    Deadline,
    /// No hub is reachable from the truck's origin.
    Unreachable,
}

/// The authoritative `(truck, hub, slot)` binding.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub truck:    TruckId,
    pub hub:      HubId,
    pub slot:     TimeSlot,
    /// Minimum hop count from origin to hub.
    pub hops:     u32,
    /// Monetary cost consumed from the budget.
    pub monetary: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnassignedTruck {
    pub truck:  TruckId,
    pub reason: UnassignedReason,
}

/// Result of one strategy run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub status:      SolveStatus,
    /// Sorted by truck id.
    pub assignments: Vec<Assignment>,
    /// Sorted by truck id.
    pub unassigned:  Vec<UnassignedTruck>,
    /// Weighted objective; `None` when nothing was assigned.
    pub objective:   Option<f64>,
    pub breakdown:   CostBreakdown,
    /// Local-search passes performed (0 for heuristic strategies).
    pub passes:      u32,
    /// Name of the strategy that produced this outcome.
    pub strategy:    String,
}

impl Outcome {
    /// Freeze `plan` into an outcome.
    ///
    /// `unassigned` lists the unplaced trucks with their reasons; any
    /// unplaced truck missing from it is reported as `Capacity`.
    pub fn from_plan(
        problem: &AssignmentProblem<'_>,
        plan: &Plan,
        unassigned: Vec<UnassignedTruck>,
        converged: bool,
        passes: u32,
        strategy: impl Into<String>,
    ) -> Self {
        let assignments: Vec<Assignment> = plan
            .placements()
            .map(|(truck, hub, slot)| Assignment {
                truck,
                hub,
                slot,
                hops: problem.hops.get(truck, hub).unwrap_or(u32::MAX),
                monetary: plan.monetary(truck),
            })
            .collect();

        let mut reasons = unassigned;
        reasons.retain(|u| u.truck.index() < problem.truck_count() && !plan.is_placed(u.truck));
        reasons.sort_by_key(|u| u.truck);
        reasons.dedup_by_key(|u| u.truck);
        let mut explained = vec![false; problem.truck_count()];
        for u in &reasons {
            explained[u.truck.index()] = true;
        }
        let missing: Vec<UnassignedTruck> = plan
            .unplaced()
            .filter(|t| !explained[t.index()])
            .map(|truck| UnassignedTruck { truck, reason: UnassignedReason::Capacity })
            .collect();
        if !missing.is_empty() {
            reasons.extend(missing);
            reasons.sort_by_key(|u| u.truck);
        }

        let status = if !reasons.is_empty() {
            SolveStatus::Infeasible
        } else if converged {
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        };

        let breakdown = problem.evaluate(plan);
        let objective = (!assignments.is_empty()).then_some(breakdown.objective);

        Self {
            status,
            assignments,
            unassigned: reasons,
            objective,
            breakdown,
            passes,
            strategy: strategy.into(),
        }
    }

    #[inline]
    pub fn n_assigned(&self) -> usize {
        self.assignments.len()
    }

    /// `true` if every truck was assigned.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Assignment of `truck`, if any.
    pub fn assignment_of(&self, truck: TruckId) -> Option<&Assignment> {
        self.assignments
            .binary_search_by_key(&truck, |a| a.truck)
            .ok()
            .map(|i| &self.assignments[i])
    }

    /// Trucks left unassigned for `reason`.
    pub fn unassigned_for(&self, reason: UnassignedReason) -> usize {
        self.unassigned.iter().filter(|u| u.reason == reason).count()
    }
}
