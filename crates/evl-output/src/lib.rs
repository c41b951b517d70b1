//! `evl-output`: dataset writers for batch runs.
//!
//! Two backends are provided:
//!
//! | Backend | Type                  | Files created                                                   |
//! |---------|-----------------------|-----------------------------------------------------------------|
//! | CSV     | [`CsvDatasetWriter`]  | `assignments.csv`, `hub_usage.csv`, `hub_slot_usage.csv`, `congestion.csv`, `pollution.csv`, `training_records.csv` |
//! | JSON    | [`JsonDatasetWriter`] | `dataset.json`                                                  |
//!
//! Both implement [`DatasetWriter`] and are driven by [`DatasetObserver`],
//! which implements `evl_platform::PipelineObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use evl_output::{CsvDatasetWriter, DatasetObserver};
//!
//! let writer = CsvDatasetWriter::new(Path::new("./dataset"))?;
//! let mut obs = DatasetObserver::new(writer);
//! platform.run(&request, &mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::CsvDatasetWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonDatasetWriter;
pub use observer::DatasetObserver;
pub use row::DatasetSummary;
pub use writer::DatasetWriter;
