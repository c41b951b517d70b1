//! The `DatasetWriter` trait implemented by all backend writers.

use evl_learn::TrainingRecord;
use evl_platform::OptimizeResponse;

use crate::OutputResult;

/// Trait implemented by the CSV and JSON writers.
///
/// A writer holds the dataset of one run.  Errors surface from each call;
/// when driven by [`DatasetObserver`][crate::DatasetObserver] they are stored
/// and retrieved with `take_error`.
pub trait DatasetWriter {
    /// Write one record per assignment, in the classifier's training format.
    fn write_training_records(&mut self, rows: &[TrainingRecord]) -> OutputResult<()>;

    /// Write the run's tables.
    fn write_response(&mut self, response: &OptimizeResponse) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
