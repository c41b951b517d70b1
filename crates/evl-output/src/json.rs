//! JSON output backend.
//!
//! Creates `dataset.json` in the configured output directory when the writer
//! is finished.  The file holds a single [`DatasetSummary`] object.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use evl_learn::TrainingRecord;
use evl_platform::OptimizeResponse;

use crate::row::DatasetSummary;
use crate::writer::DatasetWriter;
use crate::{OutputError, OutputResult};

pub const DATASET_FILE: &str = "dataset.json";

/// Writes one run's summary to `dataset.json`.
pub struct JsonDatasetWriter {
    path:             PathBuf,
    with_assignments: bool,
    with_map:         bool,
    training_records: usize,
    summary:          Option<DatasetSummary>,
    finished:         bool,
}

impl JsonDatasetWriter {
    /// Target `dir/dataset.json`.  Nothing is written until
    /// [`finish`](DatasetWriter::finish); the directory must exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(OutputError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            )));
        }
        Ok(Self {
            path:             dir.join(DATASET_FILE),
            with_assignments: false,
            with_map:         false,
            training_records: 0,
            summary:          None,
            finished:         false,
        })
    }

    /// Include the assignment list.
    pub fn with_assignments(mut self, on: bool) -> Self {
        self.with_assignments = on;
        self
    }

    /// Include the artificial map.
    pub fn with_map(mut self, on: bool) -> Self {
        self.with_map = on;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetWriter for JsonDatasetWriter {
    fn write_training_records(&mut self, rows: &[TrainingRecord]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.training_records += rows.len();
        Ok(())
    }

    fn write_response(&mut self, response: &OptimizeResponse) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.summary = Some(DatasetSummary::from_response(
            response,
            self.training_records,
            self.with_assignments,
            self.with_map,
        ));
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        // A writer finished before any run leaves no file behind.
        if let Some(summary) = &self.summary {
            let mut out = BufWriter::new(File::create(&self.path)?);
            serde_json::to_writer_pretty(&mut out, summary)?;
            out.write_all(b"\n")?;
            out.flush()?;
            debug!(path = %self.path.display(), "dataset written");
        }
        self.finished = true;
        Ok(())
    }
}
