//! `evl-learn`: a learned alternative to the assignment solver.
//!
//! Past optimizer outcomes are flattened into [`TrainingRecord`]s, a
//! [`KnnClassifier`] is fitted on them, and [`LearnedStrategy`] uses its
//! predictions behind the same [`AssignmentStrategy`] contract as the
//! solver.  Outcomes pass the same validation, so a poor model costs quality,
//! never correctness.
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`record`]   | `TrainingRecord`, extraction, CSV load/save             |
//! | [`knn`]      | `KnnClassifier`, `Label`, JSON persistence              |
//! | [`strategy`] | `LearnedStrategy`                                       |
//! | [`error`]    | `LearnError`, `LearnResult<T>`                          |
//!
//! [`AssignmentStrategy`]: evl_optimize::AssignmentStrategy

pub mod error;
pub mod knn;
pub mod record;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use error::{LearnError, LearnResult};
pub use knn::{DEFAULT_K, KnnClassifier, Label};
pub use record::{
    FEATURES, TrainingRecord, load_records_csv, load_records_reader, records_from_outcome,
    save_records_csv, truck_features, write_records,
};
pub use strategy::LearnedStrategy;
