//! CSV output backend.
//!
//! Creates six files in the configured output directory:
//! - `assignments.csv`
//! - `hub_usage.csv`
//! - `hub_slot_usage.csv`
//! - `congestion.csv`
//! - `pollution.csv`
//! - `training_records.csv` (readable by `evl_learn::load_records_csv`)

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use evl_learn::TrainingRecord;
use evl_platform::OptimizeResponse;

use crate::writer::DatasetWriter;
use crate::{OutputError, OutputResult};

pub const ASSIGNMENTS_FILE: &str = "assignments.csv";
pub const HUB_USAGE_FILE: &str = "hub_usage.csv";
pub const HUB_SLOT_USAGE_FILE: &str = "hub_slot_usage.csv";
pub const CONGESTION_FILE: &str = "congestion.csv";
pub const POLLUTION_FILE: &str = "pollution.csv";
pub const TRAINING_FILE: &str = "training_records.csv";

/// Writes `header` immediately; rows are serialized without a header of
/// their own.
fn row_writer(path: &Path, header: &[&str]) -> OutputResult<Writer<File>> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(header)?;
    Ok(w)
}

/// Writes one run's dataset to six CSV files.
pub struct CsvDatasetWriter {
    assignments:    Writer<File>,
    hub_usage:      Writer<File>,
    hub_slot_usage: Writer<File>,
    congestion:     Writer<File>,
    pollution:      Writer<File>,
    training:       Writer<File>,
    finished:       bool,
}

impl CsvDatasetWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let assignments = row_writer(
            &dir.join(ASSIGNMENTS_FILE),
            &["truck_id", "hub_id", "slot_id", "origin_zone_id", "hops", "monetary", "energy_need_kwh"],
        )?;

        let hub_usage = row_writer(
            &dir.join(HUB_USAGE_FILE),
            &[
                "hub_id",
                "zone_id",
                "assigned",
                "capacity",
                "peak_slot_load",
                "utilization_pct",
                "daily_utilization_pct",
            ],
        )?;

        let hub_slot_usage = row_writer(
            &dir.join(HUB_SLOT_USAGE_FILE),
            &["hub_id", "slot_id", "trucks", "capacity", "utilization_pct"],
        )?;

        let congestion = row_writer(&dir.join(CONGESTION_FILE), &["slot_id", "hour", "trucks"])?;

        // `is_green` is written as 0/1, so this one is not serialized.
        let pollution = row_writer(
            &dir.join(POLLUTION_FILE),
            &["zone_id", "pollution_level", "truck_count", "is_green"],
        )?;

        let training = row_writer(
            &dir.join(TRAINING_FILE),
            &["truck_id", "zone_id", "row", "col", "nearest_hops", "hub_id", "slot_id"],
        )?;

        Ok(Self {
            assignments,
            hub_usage,
            hub_slot_usage,
            congestion,
            pollution,
            training,
            finished: false,
        })
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

impl DatasetWriter for CsvDatasetWriter {
    fn write_training_records(&mut self, rows: &[TrainingRecord]) -> OutputResult<()> {
        self.check_open()?;
        for r in rows {
            self.training.serialize(r)?;
        }
        Ok(())
    }

    fn write_response(&mut self, response: &OptimizeResponse) -> OutputResult<()> {
        self.check_open()?;
        for a in &response.truck_assignments {
            self.assignments.serialize(a)?;
        }
        for h in &response.hub_usage {
            self.hub_usage.serialize(h)?;
        }
        for h in &response.hub_slot_usage {
            self.hub_slot_usage.serialize(h)?;
        }
        for c in &response.congestion_per_time {
            self.congestion.serialize(c)?;
        }
        for p in &response.pollution_per_zone {
            self.pollution.write_record(&[
                p.zone_id.to_string(),
                p.pollution_level.to_string(),
                p.truck_count.to_string(),
                (p.is_green as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.assignments.flush()?;
        self.hub_usage.flush()?;
        self.hub_slot_usage.flush()?;
        self.congestion.flush()?;
        self.pollution.flush()?;
        self.training.flush()?;
        self.finished = true;
        Ok(())
    }
}
