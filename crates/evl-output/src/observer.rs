//! `DatasetObserver<W>`: bridges `PipelineObserver` to a `DatasetWriter`.

use tracing::warn;

use evl_learn::records_from_outcome;
use evl_optimize::{AssignmentProblem, Outcome};
use evl_platform::{OptimizeResponse, PipelineObserver};

use crate::writer::DatasetWriter;
use crate::{OutputError, OutputResult};

/// A [`PipelineObserver`] that persists a run through any
/// [`DatasetWriter`] backend.
///
/// Errors from the writer are stored internally because `PipelineObserver`
/// methods have no return value.  After `platform.run()` returns, check for
/// errors with [`take_error`][Self::take_error].  The writer is finished when
/// the report arrives.
pub struct DatasetObserver<W: DatasetWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: DatasetWriter> DatasetObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "dataset write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: DatasetWriter> PipelineObserver for DatasetObserver<W> {
    fn on_outcome(&mut self, problem: &AssignmentProblem<'_>, outcome: &Outcome) {
        let records = records_from_outcome(problem, outcome);
        let result = self.writer.write_training_records(&records);
        self.store_err(result);
    }

    fn on_report(&mut self, response: &OptimizeResponse) {
        let result = self.writer.write_response(response);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
