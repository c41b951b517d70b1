//! Unit tests for evl-learn.

#[cfg(test)]
mod helpers {
    use evl_core::{Cell, PlatformConfig, SimRng, SlotTable};
    use evl_demand::{DemandGenerator, Fleet};
    use evl_optimize::{AssignmentProblem, ProblemParams};
    use evl_spatial::{BfsRouter, GridNetwork, GridNetworkBuilder};

    use crate::TrainingRecord;

    pub struct World {
        pub grid:  GridNetwork,
        pub fleet: Fleet,
        pub slots: SlotTable,
    }

    impl World {
        pub fn generate(trucks: usize, hubs: usize, seed: u64) -> Self {
            let config = PlatformConfig::default();
            let mut rng = SimRng::new(seed);
            let grid = GridNetworkBuilder::for_scenario(&config.grid, trucks, hubs)
                .zones(config.zones.clone())
                .hub_profile(config.hubs.clone())
                .build(&mut rng)
                .unwrap();
            let slots = SlotTable::generate(&config.slots, 1.0, &mut rng);
            let fleet = DemandGenerator::new(config.demand.clone(), seed).generate(&grid, trucks).unwrap();
            Self { grid, fleet, slots }
        }

        /// 12×12 grid, hand-placed hubs, `slots` off-peak slots of multiplier 1.
        pub fn fixed(hubs: &[(Cell, u32)], trucks: &[Cell], slots: usize, blocked: &[Cell]) -> Self {
            let mut b = GridNetworkBuilder::new(12, 12).blocked(blocked.iter().copied());
            for &(cell, cap) in hubs {
                b = b.fixed_hub(cell, cap);
            }
            let grid = b.build(&mut SimRng::new(1)).unwrap();
            let fleet = Fleet::from_origins(&grid, trucks).unwrap();
            let slots = SlotTable::from_parts(vec![1.0; slots], vec![false; slots]);
            Self { grid, fleet, slots }
        }

        pub fn problem(&self, budget: f64) -> AssignmentProblem<'_> {
            AssignmentProblem::new(
                &self.grid,
                &self.fleet,
                &self.slots,
                &BfsRouter,
                ProblemParams::new(budget, 1.0),
            )
            .unwrap()
        }
    }

    /// Label every truck of `problem` with `(hub, slot)`.
    pub fn label_all(problem: &AssignmentProblem<'_>, hub: u32, slot: u8) -> Vec<TrainingRecord> {
        problem
            .fleet
            .truck_ids()
            .map(|t| {
                let origin = problem.fleet.origin[t.index()];
                TrainingRecord {
                    truck_id:     t.0,
                    zone_id:      problem.fleet.origin_zone[t.index()].0,
                    row:          origin.row,
                    col:          origin.col,
                    nearest_hops: problem.hops.nearest(t).map_or(0, |(_, d)| d),
                    hub_id:       hub,
                    slot_id:      slot,
                }
            })
            .collect()
    }

    pub fn record(row: u16, col: u16, hub: u32, slot: u8) -> TrainingRecord {
        TrainingRecord { truck_id: 0, zone_id: 0, row, col, nearest_hops: 0, hub_id: hub, slot_id: slot }
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod records {
    use std::io::Cursor;

    use evl_core::Cell;
    use evl_optimize::{AssignmentStrategy, SolveLimits, SolveMode, SolverStrategy};

    use super::helpers::World;
    use crate::{
        LearnError, TrainingRecord, load_records_csv, load_records_reader, records_from_outcome,
        save_records_csv, truck_features,
    };

    #[test]
    fn one_record_per_assignment() {
        let world = World::fixed(&[(Cell::new(0, 0), 5)], &[Cell::new(0, 3), Cell::new(5, 5)], 2, &[]);
        let problem = world.problem(1000.0);
        let out = SolverStrategy::new(SolveMode::Greedy).solve(&problem, &SolveLimits::new(10)).unwrap();
        let records = records_from_outcome(&problem, &out);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            TrainingRecord {
                truck_id:     0,
                zone_id:      world.grid.zone_of(Cell::new(0, 3)).0,
                row:          0,
                col:          3,
                nearest_hops: 3,
                hub_id:       0,
                slot_id:      0,
            }
        );
        assert_eq!(records[1].nearest_hops, 10);
        assert_eq!(records[1].zone_id, world.grid.zone_of(Cell::new(5, 5)).0);
        assert_eq!(records[1].features(), truck_features(&problem, evl_core::TruckId(1)).unwrap());
    }

    #[test]
    fn unreachable_truck_has_no_features() {
        let world = World::fixed(
            &[(Cell::new(11, 0), 5)],
            &[Cell::new(0, 11)],
            1,
            &[Cell::new(0, 10), Cell::new(1, 11)],
        );
        let problem = world.problem(1000.0);
        assert!(truck_features(&problem, evl_core::TruckId(0)).is_none());
    }

    #[test]
    fn reads_csv_rows() {
        let csv = "truck_id,zone_id,row,col,nearest_hops,hub_id,slot_id\n\
                   0,3,4,11,2,1,5\n\
                   1,0,0,2,3,0,0\n";
        let records = load_records_reader(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].zone_id, 3);
        assert_eq!(records[0].slot_id, 5);
        assert_eq!(records[1].col, 2);
    }

    #[test]
    fn malformed_row_is_a_parse_error() {
        let csv = "truck_id,zone_id,row,col,nearest_hops,hub_id,slot_id\n0,3,4,eleven,2,1,5\n";
        assert!(matches!(load_records_reader(Cursor::new(csv)), Err(LearnError::Parse(_))));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let records = vec![super::helpers::record(1, 2, 0, 3), super::helpers::record(4, 5, 1, 7)];
        save_records_csv(&path, &records).unwrap();
        assert_eq!(load_records_csv(&path).unwrap(), records);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_records_csv(&dir.path().join("absent.csv")), Err(LearnError::Io(_))));
    }
}

// ── Classifier ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod classifier {
    use super::helpers::record;
    use crate::{KnnClassifier, Label, LearnError};

    #[test]
    fn rejects_empty_training_and_zero_k() {
        assert!(matches!(KnnClassifier::fit(&[], 3), Err(LearnError::EmptyTraining)));
        assert!(matches!(KnnClassifier::fit(&[record(0, 0, 0, 0)], 0), Err(LearnError::InvalidK)));
    }

    #[test]
    fn one_neighbour_returns_closest_label() {
        let model = KnnClassifier::fit(&[record(0, 0, 0, 1), record(10, 10, 2, 5)], 1).unwrap();
        assert_eq!(model.predict([0.0, 1.0, 1.0, 0.0]), Some(Label { hub: 0, slot: 1 }));
        assert_eq!(model.predict([0.0, 9.0, 8.0, 0.0]), Some(Label { hub: 2, slot: 5 }));
    }

    #[test]
    fn majority_vote() {
        let records = [
            record(0, 0, 1, 0),
            record(0, 1, 1, 0),
            record(1, 0, 0, 4),
            record(10, 10, 0, 4),
        ];
        let model = KnnClassifier::fit(&records, 3).unwrap();
        // Three nearest: (0,0), (0,1), (1,0) -> hub 1 slot 0 wins 2:1.
        assert_eq!(model.predict([0.0, 0.0, 0.0, 0.0]), Some(Label { hub: 1, slot: 0 }));
    }

    #[test]
    fn tied_vote_goes_to_smaller_label() {
        let records = [record(0, 0, 3, 2), record(0, 2, 1, 9)];
        let model = KnnClassifier::fit(&records, 2).unwrap();
        assert_eq!(model.predict([0.0, 0.0, 1.0, 0.0]), Some(Label { hub: 1, slot: 9 }));
    }

    #[test]
    fn constant_features_are_ignored() {
        // zone and hops never vary, so only row/col matter.
        let model = KnnClassifier::fit(&[record(0, 0, 0, 0), record(5, 5, 1, 1)], 1).unwrap();
        assert_eq!(model.predict([99.0, 5.0, 5.0, 42.0]), Some(Label { hub: 1, slot: 1 }));
    }

    #[test]
    fn json_round_trip_predicts_the_same() {
        let model = KnnClassifier::fit(&[record(0, 0, 0, 1), record(7, 3, 1, 6), record(2, 9, 2, 2)], 2).unwrap();
        let back = KnnClassifier::from_json(&model.to_json().unwrap()).unwrap();
        assert_eq!(back, model);
        for q in [[0.0, 1.0, 1.0, 0.0], [0.0, 6.0, 4.0, 0.0], [0.0, 2.0, 8.0, 0.0]] {
            assert_eq!(back.predict(q), model.predict(q));
        }
    }

    #[test]
    fn model_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = KnnClassifier::fit(&[record(1, 1, 0, 0)], 5).unwrap();
        model.save_json(&path).unwrap();
        let back = KnnClassifier::load_json(&path).unwrap();
        assert_eq!(back.k(), 5);
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn garbage_json_is_a_model_error() {
        assert!(matches!(KnnClassifier::from_json("{\"k\": 1}"), Err(LearnError::Model(_))));
    }
}

// ── Learned strategy ─────────────────────────────────────────────────────────

#[cfg(test)]
mod learned {
    use std::time::Duration;

    use evl_core::{Cell, HubId, TimeSlot, TruckId};
    use evl_optimize::{
        AssignmentStrategy, SolveLimits, SolveMode, SolveStatus, SolverStrategy, UnassignedReason, validate,
    };

    use super::helpers::{World, label_all};
    use crate::{KnnClassifier, LearnedStrategy, records_from_outcome};

    fn place(out: &evl_optimize::Outcome, t: u32) -> (HubId, TimeSlot) {
        let a = out.assignment_of(TruckId(t)).unwrap();
        (a.hub, a.slot)
    }

    #[test]
    fn follows_prediction_then_wraps_to_next_slot() {
        let world = World::fixed(
            &[(Cell::new(0, 0), 2), (Cell::new(11, 11), 2)],
            &[Cell::new(0, 1), Cell::new(0, 2), Cell::new(0, 3)],
            3,
            &[],
        );
        let problem = world.problem(1000.0);
        let model = KnnClassifier::fit(&label_all(&problem, 1, 2), 1).unwrap();
        let out = LearnedStrategy::new(model).solve(&problem, &SolveLimits::new(10)).unwrap();

        assert_eq!(place(&out, 0), (HubId(1), TimeSlot(2)));
        assert_eq!(place(&out, 1), (HubId(1), TimeSlot(2)));
        assert_eq!(place(&out, 2), (HubId(1), TimeSlot(0)));
        assert_eq!(out.status, SolveStatus::Feasible);
        assert_eq!(out.strategy, "learned/knn");
    }

    #[test]
    fn unknown_hub_falls_back_to_nearest() {
        let world = World::fixed(
            &[(Cell::new(0, 0), 1), (Cell::new(11, 11), 1)],
            &[Cell::new(0, 1), Cell::new(0, 2)],
            1,
            &[],
        );
        let problem = world.problem(1000.0);
        let model = KnnClassifier::fit(&label_all(&problem, 9, 0), 1).unwrap();
        let out = LearnedStrategy::new(model).solve(&problem, &SolveLimits::new(10)).unwrap();

        assert_eq!(place(&out, 0), (HubId(0), TimeSlot(0)));
        // Hub 0 is full, so the next nearest.
        assert_eq!(place(&out, 1), (HubId(1), TimeSlot(0)));
    }

    #[test]
    fn full_hubs_leave_capacity_unassigned() {
        let world = World::fixed(&[(Cell::new(0, 0), 1)], &[Cell::new(0, 1), Cell::new(0, 2)], 1, &[]);
        let problem = world.problem(1000.0);
        let model = KnnClassifier::fit(&label_all(&problem, 0, 0), 1).unwrap();
        let out = LearnedStrategy::new(model).solve(&problem, &SolveLimits::new(10)).unwrap();

        assert_eq!(out.status, SolveStatus::Infeasible);
        assert_eq!(out.n_assigned(), 1);
        assert_eq!(out.unassigned_for(UnassignedReason::Capacity), 1);
    }

    #[test]
    fn unreachable_and_budget_reasons() {
        let world = World::fixed(
            &[(Cell::new(11, 0), 5)],
            &[Cell::new(0, 11), Cell::new(10, 0)],
            1,
            &[Cell::new(0, 10), Cell::new(1, 11)],
        );
        let problem = world.problem(0.0);
        let model = KnnClassifier::fit(&label_all(&problem, 0, 0), 1).unwrap();
        let out = LearnedStrategy::new(model).solve(&problem, &SolveLimits::new(10)).unwrap();

        assert_eq!(out.n_assigned(), 0);
        assert_eq!(out.objective, None);
        assert_eq!(out.unassigned[0].reason, UnassignedReason::Unreachable);
        assert_eq!(out.unassigned[1].reason, UnassignedReason::Budget);
    }

    #[test]
    fn expired_deadline_marks_everything() {
        let world = World::fixed(&[(Cell::new(0, 0), 5)], &[Cell::new(0, 1), Cell::new(0, 2)], 1, &[]);
        let problem = world.problem(1000.0);
        let model = KnnClassifier::fit(&label_all(&problem, 0, 0), 1).unwrap();
        let limits = SolveLimits::new(10).with_timeout(Duration::ZERO);
        let out = LearnedStrategy::new(model).solve(&problem, &limits).unwrap();

        assert_eq!(out.unassigned_for(UnassignedReason::Deadline), 2);
    }

    #[test]
    fn trained_on_solver_output_stays_valid() {
        let world = World::generate(40, 3, 11);
        let problem = world.problem(1000.0);
        let solved = SolverStrategy::new(SolveMode::Optimize).solve(&problem, &SolveLimits::new(50)).unwrap();
        let model = KnnClassifier::fit(&records_from_outcome(&problem, &solved), crate::DEFAULT_K).unwrap();

        let strategy = LearnedStrategy::new(model);
        let a = strategy.solve(&problem, &SolveLimits::new(50)).unwrap();
        let b = strategy.solve(&problem, &SolveLimits::new(50)).unwrap();
        validate(&problem, &a).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.status, SolveStatus::Feasible);
        assert_eq!(a.n_assigned(), 40);
    }
}
