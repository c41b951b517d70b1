//! The assignment problem: fleet, hubs, slots, fees and the shared budget.

use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use evl_core::{CostWeights, FeeModel, HubId, PlatformConfig, SlotTable, SolverLimits, TimeSlot, TruckId};
use evl_demand::Fleet;
use evl_spatial::{GridNetwork, HopField, Router};

use crate::{OptimizeError, OptimizeResult};

// ── HopTable ─────────────────────────────────────────────────────────────────

/// Minimum hop count from every truck origin to every hub, truck-major.
///
/// Built from one BFS hop field per hub, so the cost is `O(hubs × cells)`
/// regardless of fleet size.
#[derive(Clone, Debug)]
pub struct HopTable {
    hubs: usize,
    hops: Vec<u32>,
}

impl HopTable {
    const UNREACHABLE: u32 = u32::MAX;

    /// Route from every hub to every truck origin with `router`.
    ///
    /// With the `parallel` feature the per-hub fields are computed on Rayon
    /// worker threads; results are identical either way.
    pub fn compute(grid: &GridNetwork, fleet: &Fleet, router: &dyn Router) -> OptimizeResult<Self> {
        #[cfg(feature = "parallel")]
        let fields: Vec<HopField> = grid
            .hubs
            .par_iter()
            .map(|h| router.hop_field(grid, h.cell))
            .collect::<Result<_, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let fields: Vec<HopField> = grid
            .hubs
            .iter()
            .map(|h| router.hop_field(grid, h.cell))
            .collect::<Result<_, _>>()?;

        let hubs = fields.len();
        let mut hops = Vec::with_capacity(fleet.len() * hubs);
        for &origin in &fleet.origin {
            hops.extend(fields.iter().map(|f| f.get(origin).unwrap_or(Self::UNREACHABLE)));
        }
        debug!(hubs, trucks = fleet.len(), "hop table computed");
        Ok(Self { hubs, hops })
    }

    /// Table from explicit rows, one per truck (fixtures).
    pub fn from_rows(rows: &[Vec<Option<u32>>]) -> Self {
        let hubs = rows.first().map_or(0, Vec::len);
        let hops = rows
            .iter()
            .flat_map(|r| r.iter().map(|h| h.unwrap_or(Self::UNREACHABLE)))
            .collect();
        Self { hubs, hops }
    }

    /// Hops from `truck`'s origin to `hub`, `None` if disconnected.
    #[inline]
    pub fn get(&self, truck: TruckId, hub: HubId) -> Option<u32> {
        match self.hops[truck.index() * self.hubs + hub.index()] {
            Self::UNREACHABLE => None,
            h => Some(h),
        }
    }

    /// Reachable hubs for `truck` in id order, with hop counts.
    pub fn reachable(&self, truck: TruckId) -> impl Iterator<Item = (HubId, u32)> + '_ {
        let row = &self.hops[truck.index() * self.hubs..(truck.index() + 1) * self.hubs];
        row.iter()
            .enumerate()
            .filter(|&(_, &h)| h != Self::UNREACHABLE)
            .map(|(i, &h)| (HubId(i as u32), h))
    }

    /// Closest reachable hub; ties go to the lowest hub id.
    pub fn nearest(&self, truck: TruckId) -> Option<(HubId, u32)> {
        self.reachable(truck).min_by_key(|&(h, d)| (d, h))
    }
}

// ── ProblemParams ────────────────────────────────────────────────────────────

/// Scalar parameters of one solve.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemParams {
    pub budget:          f64,
    pub peak_multiplier: f64,
    pub fees:            FeeModel,
    pub weights:         CostWeights,
}

impl ProblemParams {
    pub fn new(budget: f64, peak_multiplier: f64) -> Self {
        Self { budget, peak_multiplier, fees: FeeModel::default(), weights: CostWeights::default() }
    }

    /// Request scalars plus the fee model and weights from `config`.
    pub fn from_config(config: &PlatformConfig, budget: f64, peak_multiplier: f64) -> Self {
        Self {
            budget,
            peak_multiplier,
            fees: config.fees.clone(),
            weights: config.weights.clone(),
        }
    }
}

// ── AssignmentProblem ────────────────────────────────────────────────────────

/// Everything a strategy needs to assign trucks to `(hub, slot)` pairs.
///
/// Borrows the grid, fleet and slot table of one run; owns the hop table.
pub struct AssignmentProblem<'a> {
    pub grid:   &'a GridNetwork,
    pub fleet:  &'a Fleet,
    pub slots:  &'a SlotTable,
    pub params: ProblemParams,
    pub hops:   HopTable,
}

impl<'a> AssignmentProblem<'a> {
    /// Validate parameters and compute the hop table with `router`.
    pub fn new(
        grid:   &'a GridNetwork,
        fleet:  &'a Fleet,
        slots:  &'a SlotTable,
        router: &dyn Router,
        params: ProblemParams,
    ) -> OptimizeResult<Self> {
        Self::check(grid, fleet, slots, &params)?;
        let hops = HopTable::compute(grid, fleet, router)?;
        Ok(Self { grid, fleet, slots, params, hops })
    }

    fn check(grid: &GridNetwork, fleet: &Fleet, slots: &SlotTable, p: &ProblemParams) -> OptimizeResult<()> {
        if fleet.is_empty() {
            return Err(OptimizeError::Config("fleet is empty".into()));
        }
        if grid.hub_count() == 0 {
            return Err(OptimizeError::Config("grid has no hubs".into()));
        }
        if slots.is_empty() {
            return Err(OptimizeError::Config("slot table is empty".into()));
        }
        if !(p.budget.is_finite() && p.budget >= 0.0) {
            return Err(OptimizeError::Config(format!("budget {} must be finite and >= 0", p.budget)));
        }
        if !(p.peak_multiplier.is_finite() && p.peak_multiplier > 0.0) {
            return Err(OptimizeError::Config(format!(
                "peak_multiplier {} must be finite and > 0",
                p.peak_multiplier
            )));
        }
        Ok(())
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn truck_count(&self) -> usize {
        self.fleet.len()
    }

    #[inline]
    pub fn hub_count(&self) -> usize {
        self.grid.hub_count()
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn capacity(&self, hub: HubId) -> u32 {
        self.grid.hub(hub).capacity
    }

    #[inline]
    pub fn budget(&self) -> f64 {
        self.params.budget
    }

    /// All `(hub, slot)` pairs in hub-major, ascending order.
    pub fn options(&self) -> impl Iterator<Item = (HubId, TimeSlot)> + '_ {
        let slots = self.slot_count() as u8;
        (0..self.hub_count() as u32)
            .flat_map(move |h| (0..slots).map(move |s| (HubId(h), TimeSlot(s))))
    }
}

// ── SolveLimits ──────────────────────────────────────────────────────────────

/// Bounds on one solve: local-search passes and an optional wall-clock
/// deadline.  When the deadline passes the solver returns its best partial
/// solution.
#[derive(Clone, Debug)]
pub struct SolveLimits {
    pub max_passes: u32,
    pub deadline:   Option<Instant>,
}

impl SolveLimits {
    pub fn new(max_passes: u32) -> Self {
        Self { max_passes, deadline: None }
    }

    /// Deadline `budget` from now.
    pub fn with_timeout(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    /// Limits from configuration; the deadline clock starts now.
    pub fn from_config(limits: &SolverLimits) -> Self {
        let base = Self::new(limits.max_passes);
        match limits.deadline() {
            Some(d) => base.with_timeout(d),
            None => base,
        }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self::new(SolverLimits::default().max_passes)
    }
}
