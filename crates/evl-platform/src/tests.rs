//! Unit tests for evl-platform.

#[cfg(test)]
mod helpers {
    use crate::{OptimizeRequest, OptimizeResponse, Platform};

    pub fn run(request: &OptimizeRequest) -> OptimizeResponse {
        Platform::default().optimize(request).unwrap()
    }

    pub fn ten_two(seed: u64) -> OptimizeRequest {
        OptimizeRequest::new(10, 2, 1000.0, 1.0).with_seed(seed)
    }
}

// ── Request ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod request {
    use crate::{MAX_TRUCKS, OptimizeRequest, PlatformError};

    #[test]
    fn missing_fields_take_defaults() {
        let req: OptimizeRequest = serde_json::from_str(r#"{"num_trucks": 12}"#).unwrap();
        assert_eq!(req.num_trucks, 12);
        assert_eq!(req.num_hubs, 5);
        assert_eq!(req.budget, 500.0);
        assert!(req.with_optimization);
        assert_eq!(req.seed, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_parameters() {
        let base = OptimizeRequest::new(10, 2, 100.0, 1.0);
        let bad = [
            OptimizeRequest { num_trucks: 0, ..base.clone() },
            OptimizeRequest { num_trucks: MAX_TRUCKS + 1, ..base.clone() },
            OptimizeRequest { num_trucks: usize::MAX, ..base.clone() },
            OptimizeRequest { num_hubs: 0, ..base.clone() },
            OptimizeRequest { budget: -1.0, ..base.clone() },
            OptimizeRequest { budget: f64::NAN, ..base.clone() },
            OptimizeRequest { peak_multiplier: 0.0, ..base.clone() },
            OptimizeRequest { peak_multiplier: f64::INFINITY, ..base.clone() },
        ];
        for req in bad {
            let err = req.validate().unwrap_err();
            assert!(matches!(err, PlatformError::Configuration(_)), "{req:?}");
            assert!(err.is_client_error());
        }
        assert!(base.validate().is_ok());
        assert!(OptimizeRequest { num_trucks: MAX_TRUCKS, ..base }.validate().is_ok());
    }

    #[test]
    fn demo_scenario_is_fixed() {
        let demo = OptimizeRequest::demo();
        assert_eq!((demo.num_trucks, demo.num_hubs), (48, 4));
        assert_eq!(demo.budget, 1000.0);
        assert_eq!(demo.peak_multiplier, 1.0);
        assert!(!demo.with_optimization);
        assert_eq!(demo.seed, Some(42));
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use evl_core::{Cell, CoreError};
    use evl_demand::DemandError;
    use evl_optimize::OptimizeError;
    use evl_spatial::SpatialError;

    use crate::PlatformError;

    #[test]
    fn configuration_and_consistency_are_split() {
        let cases: Vec<(PlatformError, bool)> = vec![
            (CoreError::Config("x".into()).into(), true),
            (SpatialError::TooManyHubs { hubs: 9, cells: 4 }.into(), true),
            (SpatialError::InvalidDimensions("0x0".into()).into(), true),
            (SpatialError::InvalidPlacement { what: "hub", cell: Cell::new(9, 9), reason: "is blocked" }.into(), true),
            (SpatialError::Blocked(Cell::new(9, 9)).into(), false),
            (SpatialError::Unreachable { from: Cell::new(0, 0), to: Cell::new(1, 1) }.into(), false),
            (OptimizeError::Config("empty".into()).into(), true),
            (OptimizeError::Consistency("over capacity".into()).into(), false),
            (OptimizeError::Spatial(SpatialError::TooManyHubs { hubs: 2, cells: 1 }).into(), true),
            (DemandError::NoOpenCells.into(), true),
            (DemandError::InvalidOrigin(Cell::new(3, 3)).into(), false),
        ];
        for (err, client) in cases {
            assert_eq!(err.is_client_error(), client, "{err}");
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use evl_core::PlatformConfig;
    use evl_optimize::{AssignmentStrategy, SolveMode, SolveStatus, SolverStrategy, UnassignedReason};

    use super::helpers::{run, ten_two};
    use crate::{OptimizeRequest, Platform, PlatformBuilder, PlatformError};

    #[test]
    fn ten_trucks_two_hubs_is_optimal() {
        let resp = run(&ten_two(7));
        assert_eq!(resp.status, SolveStatus::Optimal);
        assert_eq!(resp.n_assigned, 10);
        assert!(resp.unassigned.is_empty());
        assert_eq!(resp.hub_usage.len(), 2);
        assert_eq!(resp.hub_usage.iter().map(|h| h.assigned).sum::<u32>(), 10);
        assert_eq!(resp.hub_slot_usage.iter().map(|h| h.trucks).sum::<u32>(), 10);
        assert_eq!(resp.congestion_per_time.iter().map(|c| c.trucks).sum::<u32>(), 10);
        assert!(resp.objective_value.is_some());
        assert_eq!(resp.seed, 7);
    }

    #[test]
    fn greedy_ten_trucks_is_complete() {
        let resp = run(&ten_two(7).with_optimization(false));
        assert_eq!(resp.status, SolveStatus::Feasible);
        assert_eq!(resp.n_assigned, 10);
        assert_eq!(resp.strategy, SolverStrategy::new(SolveMode::Greedy).name());
    }

    #[test]
    fn tight_budget_is_infeasible_within_capacity() {
        let resp = run(&OptimizeRequest::new(100, 1, 10.0, 1.0).with_seed(7));
        assert_eq!(resp.status, SolveStatus::Infeasible);
        assert!(resp.n_assigned < 100);
        assert_eq!(resp.unassigned.len(), 100 - resp.n_assigned);
        for row in &resp.hub_slot_usage {
            assert!(row.trucks <= row.capacity);
        }
        let spent: f64 = resp.truck_assignments.iter().map(|a| a.monetary).sum();
        assert!(spent <= 10.0);
    }

    #[test]
    fn identical_requests_give_identical_responses() {
        for optimize in [true, false] {
            let req = OptimizeRequest::new(40, 3, 150.0, 1.5).with_seed(99).with_optimization(optimize);
            let a = run(&req).to_json().unwrap();
            let b = run(&req).to_json().unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn request_deadline_cuts_the_solve() {
        let resp = run(&ten_two(7).with_deadline_ms(0));
        assert_eq!(resp.status, SolveStatus::Infeasible);
        assert_eq!(resp.n_assigned, 0);
        assert_eq!(resp.objective_value, None);
        assert!(resp.unassigned.iter().all(|u| u.reason == UnassignedReason::Deadline));
        assert!(resp.artificial_map.routes.is_empty());
        assert!(resp.deliveries.is_empty());
    }

    #[test]
    fn too_many_hubs_is_a_client_error() {
        let err = Platform::default().optimize(&OptimizeRequest::new(10, 5000, 100.0, 1.0)).unwrap_err();
        assert!(err.is_client_error(), "{err}");
    }

    #[test]
    fn invalid_request_never_runs() {
        let err = Platform::default().optimize(&OptimizeRequest::new(0, 2, 100.0, 1.0)).unwrap_err();
        assert!(matches!(err, PlatformError::Configuration(_)));
    }

    #[test]
    fn default_platform_has_valid_config() {
        assert!(Platform::default().config().validate().is_ok());
    }

    #[test]
    fn oversized_fleet_is_rejected_before_any_allocation() {
        let err = Platform::default().optimize(&OptimizeRequest::new(usize::MAX, 2, 100.0, 1.0)).unwrap_err();
        assert!(matches!(err, PlatformError::Configuration(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut config = PlatformConfig::default();
        config.zones.zone_count = 0;
        assert!(matches!(PlatformBuilder::new(config).build(), Err(PlatformError::Configuration(_))));
    }

    #[test]
    fn response_serializes_all_payload_items() {
        let resp = run(&ten_two(7));
        let value: serde_json::Value = serde_json::from_str(&resp.to_json().unwrap()).unwrap();
        for key in [
            "truck_assignments",
            "unassigned",
            "hub_usage",
            "congestion_per_time",
            "pollution_per_zone",
            "green_zones",
            "zones_geojson",
            "hubs",
            "status",
            "objective_value",
            "n_assigned",
            "artificial_map",
            "platform_summary",
            "deliveries",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["zones_geojson"]["type"], "FeatureCollection");
        assert_eq!(value["status"], "optimal");
    }
}

// ── Presentation data ────────────────────────────────────────────────────────

#[cfg(test)]
mod presentation {
    use geojson::Value;

    use evl_core::MapBounds;

    use super::helpers::{run, ten_two};

    #[test]
    fn zone_polygons_are_closed_and_inside_bounds() {
        let resp = run(&ten_two(5));
        let b = MapBounds::default();
        assert_eq!(resp.zones_geojson.features.len(), resp.pollution_per_zone.len());

        for (feature, zone) in resp.zones_geojson.features.iter().zip(&resp.pollution_per_zone) {
            let props = feature.properties.as_ref().unwrap();
            assert_eq!(props["zone_id"], zone.zone_id);
            assert_eq!(props["congestion"], zone.truck_count);
            assert_eq!(props["is_green"], zone.is_green);

            let Value::Polygon(rings) = &feature.geometry.as_ref().unwrap().value else {
                panic!("zone {} is not a polygon", zone.zone_id);
            };
            let ring = &rings[0];
            assert_eq!(ring.len(), 5);
            assert_eq!(ring.first(), ring.last());
            for p in ring {
                assert!(p[0] >= b.west - 1e-9 && p[0] <= b.east + 1e-9);
                assert!(p[1] >= b.south - 1e-9 && p[1] <= b.north + 1e-9);
            }
        }
    }

    #[test]
    fn hub_positions_carry_usage() {
        let resp = run(&ten_two(5));
        let b = MapBounds::default();
        assert_eq!(resp.hubs.len(), 2);
        assert_eq!(resp.hubs.iter().map(|h| h.usage).sum::<u32>() as usize, resp.n_assigned);
        for h in &resp.hubs {
            assert!(h.lon > b.west && h.lon < b.east);
            assert!(h.lat > b.south && h.lat < b.north);
        }
    }

    #[test]
    fn map_covers_grid_and_routes_end_at_hubs() {
        let resp = run(&ten_two(5));
        let map = &resp.artificial_map;
        let cells: usize = map.zone_cells.iter().map(|z| z.cells.len()).sum();
        assert_eq!(cells, map.rows as usize * map.cols as usize);
        assert_eq!(map.zone_meta.len(), map.zone_cells.len());
        assert_eq!(map.routes.len(), resp.n_assigned);

        for (route, a) in map.routes.iter().zip(&resp.truck_assignments) {
            assert_eq!(route.truck_id, a.truck_id);
            assert_eq!(route.points.len(), a.hops as usize + 1);
            let hub = map.hubs.iter().find(|h| h.hub_id == a.hub_id).unwrap();
            let end = route.points.last().unwrap();
            assert_eq!((end.x, end.y), (hub.x, hub.y));
            for p in &route.points {
                assert!(p.x > 0.0 && p.x < 1.0 && p.y > 0.0 && p.y < 1.0);
            }
        }
    }

    #[test]
    fn assignments_carry_truck_energy_need() {
        let resp = run(&ten_two(7));
        let (lo, hi) = evl_core::PlatformConfig::default().demand.energy_band_kwh;
        assert!(!resp.truck_assignments.is_empty());
        for a in &resp.truck_assignments {
            assert!((lo..hi).contains(&a.energy_need_kwh), "{a:?}");
        }
        let total: f64 = resp.truck_assignments.iter().map(|a| f64::from(a.energy_need_kwh)).sum();
        assert_eq!(resp.assigned_energy_kwh(), total);
    }

    #[test]
    fn last_updated_is_set_only_when_stamped() {
        let resp = run(&ten_two(7));
        assert!(resp.last_updated.is_none());
        let at: jiff::Timestamp = "2026-10-17T12:00:00Z".parse().unwrap();
        let stamped = resp.with_last_updated(at);
        let value: serde_json::Value = serde_json::from_str(&stamped.to_json().unwrap()).unwrap();
        assert_eq!(value["last_updated"], "2026-10-17T12:00:00Z");
    }

    #[test]
    fn summary_and_deliveries_follow_assignments() {
        let resp = run(&ten_two(5));
        assert_eq!(resp.platform_summary.n_trucks_assigned, resp.n_assigned);
        assert_eq!(resp.platform_summary.driver_tips.len(), resp.n_assigned);
        assert_eq!(resp.deliveries.len(), resp.n_assigned);
        assert_eq!(resp.green_zones, resp.platform_summary.green_zones);
        for p in &resp.pollution_per_zone {
            assert!((0.0..=1.0).contains(&p.pollution_level));
        }
    }
}

// ── Observer, strategies, router ─────────────────────────────────────────────

#[cfg(test)]
mod wiring {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use evl_core::{Cell, PlatformConfig};
    use evl_demand::Fleet;
    use evl_learn::strategy::LEARNED;
    use evl_learn::{DEFAULT_K, KnnClassifier, LearnedStrategy, TrainingRecord, records_from_outcome};
    use evl_optimize::{AssignmentProblem, Outcome, SolveStatus};
    use evl_spatial::{BfsRouter, GridNetwork, HopField, Route, Router, SpatialResult};

    use super::helpers::{run, ten_two};
    use crate::{
        OptimizeRequest, OptimizeResponse, PipelineObserver, Platform, PlatformBuilder, StrategyChoice,
        demo_response,
    };

    #[derive(Default)]
    struct Recorder {
        events:  Vec<&'static str>,
        records: Vec<TrainingRecord>,
        seed:    Option<u64>,
    }

    impl PipelineObserver for Recorder {
        fn on_network(&mut self, _grid: &GridNetwork) {
            self.events.push("network");
        }

        fn on_fleet(&mut self, _fleet: &Fleet) {
            self.events.push("fleet");
        }

        fn on_outcome(&mut self, problem: &AssignmentProblem<'_>, outcome: &Outcome) {
            self.events.push("outcome");
            self.records.extend(records_from_outcome(problem, outcome));
        }

        fn on_report(&mut self, response: &OptimizeResponse) {
            self.events.push("report");
            self.seed = Some(response.seed);
        }
    }

    #[test]
    fn observer_sees_every_stage_in_order() {
        let mut rec = Recorder::default();
        let resp = Platform::default().run(&ten_two(7), &mut rec).unwrap();
        assert_eq!(rec.events, ["network", "fleet", "outcome", "report"]);
        assert_eq!(rec.records.len(), resp.n_assigned);
        assert_eq!(rec.seed, Some(7));
    }

    #[test]
    fn observer_does_not_change_the_run() {
        let observed = Platform::default().run(&ten_two(7), &mut Recorder::default()).unwrap();
        assert_eq!(observed.to_json().unwrap(), run(&ten_two(7)).to_json().unwrap());
    }

    #[test]
    fn learned_strategy_is_selected_by_configuration() {
        let mut rec = Recorder::default();
        let train = OptimizeRequest::new(30, 3, 1000.0, 1.0).with_seed(11);
        Platform::default().run(&train, &mut rec).unwrap();
        let model = KnnClassifier::fit(&rec.records, DEFAULT_K).unwrap();

        let platform = PlatformBuilder::new(PlatformConfig::default())
            .strategy(StrategyChoice::Learned(LearnedStrategy::new(model)))
            .build()
            .unwrap();
        let resp = platform.optimize(&train).unwrap();
        assert_eq!(resp.strategy, LEARNED);
        assert_eq!(resp.status, SolveStatus::Feasible);
        assert_eq!(resp.n_assigned, 30);
    }

    struct CountingRouter {
        calls: Arc<AtomicUsize>,
    }

    impl Router for CountingRouter {
        fn shortest_path(&self, grid: &GridNetwork, from: Cell, to: Cell) -> SpatialResult<Route> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            BfsRouter.shortest_path(grid, from, to)
        }

        fn hop_field(&self, grid: &GridNetwork, origin: Cell) -> SpatialResult<HopField> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            BfsRouter.hop_field(grid, origin)
        }
    }

    #[test]
    fn custom_router_is_used() {
        let calls = Arc::new(AtomicUsize::new(0));
        let platform = PlatformBuilder::new(PlatformConfig::default())
            .router(CountingRouter { calls: Arc::clone(&calls) })
            .build()
            .unwrap();
        let resp = platform.optimize(&ten_two(7)).unwrap();
        // At least one route per assignment.
        assert!(calls.load(Ordering::Relaxed) >= resp.n_assigned);
        assert_eq!(resp.to_json().unwrap(), run(&ten_two(7)).to_json().unwrap());
    }

    #[test]
    fn demo_is_deterministic() {
        let a = demo_response().unwrap();
        let b = demo_response().unwrap();
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
        assert_eq!(a.request, OptimizeRequest::demo());
        assert_eq!(a.seed, 42);
        assert_eq!(a.n_assigned, a.truck_assignments.len());
        assert_eq!(a.n_assigned + a.unassigned.len(), 48);
    }
}
