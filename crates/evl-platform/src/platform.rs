//! The optimize pipeline and its builder.
//!
//! ```text
//! request ─► grid ─► slots ─► fleet ─► hop table ─► strategy ─► validate
//!                                                                  │
//!        response ◄─ map + geojson ◄─ routes ◄─ metrics ◄──────────┘
//! ```
//!
//! Each run builds its own grid, fleet and assignment from the request and
//! the platform's configuration; a [`Platform`] holds no per-run state and
//! can serve concurrent runs through `&self`.

use tracing::{debug, info, warn};

use evl_core::{PlatformConfig, SeedSource, SimRng, SlotTable};
use evl_demand::DemandGenerator;
use evl_learn::LearnedStrategy;
use evl_metrics::MetricsReport;
use evl_optimize::{
    AssignmentProblem, AssignmentStrategy, OptimizeResult, Outcome, ProblemParams, SolveLimits, SolveMode,
    SolveStatus, SolverStrategy, validate,
};
use evl_spatial::{BfsRouter, GridNetworkBuilder, Router};

use crate::{
    ArtificialMap, NoopObserver, OptimizeRequest, OptimizeResponse, PipelineObserver, PlatformResult,
    TruckAssignment, hub_positions, zones_geojson,
};

// ── StrategyChoice ───────────────────────────────────────────────────────────

/// Which assignment strategy a platform runs.
#[derive(Debug, Clone, Default)]
pub enum StrategyChoice {
    /// The constrained solver; the request's `with_optimization` flag picks
    /// between the optimizing and the greedy algorithm.
    #[default]
    Solver,
    /// A trained classifier.  `with_optimization` is ignored.
    Learned(LearnedStrategy),
}

impl StrategyChoice {
    fn solve(
        &self,
        problem: &AssignmentProblem<'_>,
        limits: &SolveLimits,
        with_optimization: bool,
    ) -> OptimizeResult<Outcome> {
        let solver;
        let strategy: &dyn AssignmentStrategy = match self {
            StrategyChoice::Solver => {
                solver = SolverStrategy::new(SolveMode::from_flag(with_optimization));
                &solver
            }
            StrategyChoice::Learned(learned) => learned,
        };
        debug!(strategy = strategy.name(), "solving");
        strategy.solve(problem, limits)
    }
}

// ── Platform ─────────────────────────────────────────────────────────────────

/// Configured pipeline.  Build with [`PlatformBuilder`] or use
/// [`Platform::default`].
pub struct Platform<R: Router = BfsRouter> {
    config:   PlatformConfig,
    router:   R,
    strategy: StrategyChoice,
}

impl Default for Platform<BfsRouter> {
    fn default() -> Self {
        Self { config: PlatformConfig::default(), router: BfsRouter, strategy: StrategyChoice::Solver }
    }
}

impl<R: Router> Platform<R> {
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn strategy(&self) -> &StrategyChoice {
        &self.strategy
    }

    /// Run one request without observation.
    pub fn optimize(&self, request: &OptimizeRequest) -> PlatformResult<OptimizeResponse> {
        self.run(request, &mut NoopObserver)
    }

    /// Run the fixed demo scenario with this platform's configuration.
    pub fn demo(&self) -> PlatformResult<OptimizeResponse> {
        self.optimize(&OptimizeRequest::demo())
    }

    /// Run one request, reporting each stage to `observer`.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::Configuration`][crate::PlatformError::Configuration]
    ///   for invalid parameters or configuration, including more hubs than
    ///   the grid can hold.
    /// - [`PlatformError::Consistency`][crate::PlatformError::Consistency]
    ///   when the outcome violates a constraint or a route cannot be
    ///   rebuilt.  No partial response is returned.
    ///
    /// An infeasible assignment is not an error; it is reported through
    /// the response status.
    pub fn run<O: PipelineObserver>(
        &self,
        request: &OptimizeRequest,
        observer: &mut O,
    ) -> PlatformResult<OptimizeResponse> {
        request.validate()?;
        let config = &self.config;
        config.validate()?;
        let seed = SeedSource::from(request.seed).resolve();
        let mut rng = SimRng::new(seed);

        // ── World ─────────────────────────────────────────────────────────
        let grid = GridNetworkBuilder::for_scenario(&config.grid, request.num_trucks, request.num_hubs)
            .zones(config.zones.clone())
            .hub_profile(config.hubs.clone())
            .build(&mut rng)?;
        debug!(rows = grid.rows, cols = grid.cols, hubs = grid.hub_count(), "grid built");
        observer.on_network(&grid);

        let slots = SlotTable::generate(&config.slots, request.peak_multiplier, &mut rng);
        let fleet = DemandGenerator::new(config.demand.clone(), seed).generate(&grid, request.num_trucks)?;
        debug!(trucks = fleet.len(), "fleet generated");
        observer.on_fleet(&fleet);

        // ── Assignment ────────────────────────────────────────────────────
        let params = ProblemParams::from_config(config, request.budget, request.peak_multiplier);
        let problem = AssignmentProblem::new(&grid, &fleet, &slots, &self.router, params)?;
        let limits = match request.deadline() {
            Some(d) => SolveLimits::new(config.solver.max_passes).with_timeout(d),
            None => SolveLimits::from_config(&config.solver),
        };
        let outcome = self.strategy.solve(&problem, &limits, request.with_optimization)?;
        validate(&problem, &outcome)?;
        if outcome.status == SolveStatus::Infeasible {
            warn!(
                unassigned = outcome.unassigned.len(),
                trucks = fleet.len(),
                "assignment is partial"
            );
        }
        observer.on_outcome(&problem, &outcome);

        // ── Derived views ─────────────────────────────────────────────────
        let report = MetricsReport::compute(&grid, &fleet, &slots, &outcome, config);
        let estimate = &report.estimate;
        let artificial_map =
            ArtificialMap::build(&grid, &fleet, &outcome, &estimate.pollution_per_zone, &self.router)?;
        let zones = zones_geojson(&grid, &estimate.pollution_per_zone, &config.map_bounds);
        let hubs = hub_positions(&grid, &estimate.hub_usage, &config.map_bounds);

        info!(
            seed,
            strategy = %outcome.strategy,
            status = %outcome.status,
            assigned = outcome.n_assigned(),
            trucks = fleet.len(),
            objective = ?outcome.objective,
            "run complete"
        );

        let MetricsReport { estimate, summary, deliveries } = report;
        let response = OptimizeResponse {
            request: request.clone(),
            seed,
            status: outcome.status,
            strategy: outcome.strategy.clone(),
            objective_value: outcome.objective,
            n_assigned: outcome.n_assigned(),
            truck_assignments: TruckAssignment::from_outcome(&fleet, &outcome),
            unassigned: outcome.unassigned.clone(),
            hub_usage: estimate.hub_usage,
            hub_slot_usage: estimate.hub_slot_usage,
            congestion_per_time: estimate.congestion_per_time,
            pollution_per_zone: estimate.pollution_per_zone,
            green_zones: summary.green_zones.clone(),
            zones_geojson: zones,
            hubs,
            artificial_map,
            platform_summary: summary,
            deliveries,
            last_updated: None,
        };
        observer.on_report(&response);
        Ok(response)
    }
}

/// The demo contract: the fixed scenario of [`OptimizeRequest::demo`] on the
/// default configuration.  Deterministic.
pub fn demo_response() -> PlatformResult<OptimizeResponse> {
    Platform::default().demo()
}

// ── PlatformBuilder ──────────────────────────────────────────────────────────

/// Fluent builder for [`Platform<R>`].
///
/// | Method           | Default                   |
/// |------------------|---------------------------|
/// | `.router(r)`     | [`BfsRouter`]             |
/// | `.strategy(s)`   | [`StrategyChoice::Solver`] |
///
/// ```rust,ignore
/// let platform = PlatformBuilder::new(config)
///     .strategy(StrategyChoice::Learned(LearnedStrategy::new(model)))
///     .build()?;
/// let response = platform.optimize(&OptimizeRequest::new(10, 2, 1000.0, 1.0))?;
/// ```
pub struct PlatformBuilder<R: Router = BfsRouter> {
    config:   PlatformConfig,
    router:   R,
    strategy: StrategyChoice,
}

impl PlatformBuilder<BfsRouter> {
    pub fn new(config: PlatformConfig) -> Self {
        Self { config, router: BfsRouter, strategy: StrategyChoice::Solver }
    }
}

impl<R: Router> PlatformBuilder<R> {
    /// Replace the routing engine.
    pub fn router<R2: Router>(self, router: R2) -> PlatformBuilder<R2> {
        PlatformBuilder { config: self.config, router, strategy: self.strategy }
    }

    pub fn strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validate the configuration and build the platform.
    pub fn build(self) -> PlatformResult<Platform<R>> {
        self.config.validate()?;
        Ok(Platform { config: self.config, router: self.router, strategy: self.strategy })
    }
}
