//! Training records extracted from optimizer outcomes, with CSV persistence.
//!
//! # CSV format
//!
//! One row per assigned truck of a past run.
//!
//! ```csv
//! truck_id,zone_id,row,col,nearest_hops,hub_id,slot_id
//! 0,3,4,11,2,1,5
//! 1,0,0,2,3,0,0
//! ```
//!
//! `nearest_hops` is the hop count to the closest reachable hub, not to the
//! assigned one, so a record's features are known before any assignment.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use evl_core::TruckId;
use evl_optimize::{AssignmentProblem, Outcome};

use crate::LearnError;

// ── Record ────────────────────────────────────────────────────────────────────

/// One labelled example: truck features plus the `(hub, slot)` it received.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub truck_id:     u32,
    pub zone_id:      u16,
    pub row:          u16,
    pub col:          u16,
    pub nearest_hops: u32,
    pub hub_id:       u32,
    pub slot_id:      u8,
}

/// Number of classifier input features.
pub const FEATURES: usize = 4;

impl TrainingRecord {
    /// `[zone, row, col, nearest_hops]`.
    pub fn features(&self) -> [f64; FEATURES] {
        [self.zone_id as f64, self.row as f64, self.col as f64, self.nearest_hops as f64]
    }
}

/// Features of `truck` in `problem`, `None` if it cannot reach any hub.
pub fn truck_features(problem: &AssignmentProblem<'_>, truck: TruckId) -> Option<[f64; FEATURES]> {
    let (_, hops) = problem.hops.nearest(truck)?;
    let origin = problem.fleet.origin[truck.index()];
    let zone = problem.fleet.origin_zone[truck.index()];
    Some([zone.0 as f64, origin.row as f64, origin.col as f64, hops as f64])
}

/// One record per assignment of `outcome`, in truck id order.
pub fn records_from_outcome(problem: &AssignmentProblem<'_>, outcome: &Outcome) -> Vec<TrainingRecord> {
    outcome
        .assignments
        .iter()
        .filter_map(|a| {
            let (_, nearest) = problem.hops.nearest(a.truck)?;
            let origin = problem.fleet.origin[a.truck.index()];
            Some(TrainingRecord {
                truck_id:     a.truck.0,
                zone_id:      problem.fleet.origin_zone[a.truck.index()].0,
                row:          origin.row,
                col:          origin.col,
                nearest_hops: nearest,
                hub_id:       a.hub.0,
                slot_id:      a.slot.0,
            })
        })
        .collect()
}

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Load training records from a CSV file.
pub fn load_records_csv(path: &Path) -> Result<Vec<TrainingRecord>, LearnError> {
    let file = std::fs::File::open(path).map_err(LearnError::Io)?;
    load_records_reader(file)
}

/// Like [`load_records_csv`] but accepts any `Read` source.
pub fn load_records_reader<R: Read>(reader: R) -> Result<Vec<TrainingRecord>, LearnError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<TrainingRecord>()
        .map(|row| row.map_err(|e| LearnError::Parse(e.to_string())))
        .collect()
}

/// Write records to a CSV file, replacing it.
pub fn save_records_csv(path: &Path, records: &[TrainingRecord]) -> Result<(), LearnError> {
    let file = std::fs::File::create(path).map_err(LearnError::Io)?;
    write_records(file, records)
}

/// Write records with a header row to any `Write` sink.
pub fn write_records<W: Write>(writer: W, records: &[TrainingRecord]) -> Result<(), LearnError> {
    let mut w = csv::Writer::from_writer(writer);
    for r in records {
        w.serialize(r).map_err(|e| LearnError::Parse(e.to_string()))?;
    }
    w.flush()?;
    Ok(())
}
