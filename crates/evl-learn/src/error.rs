use thiserror::Error;

use evl_optimize::OptimizeError;

#[derive(Debug, Error)]
pub enum LearnError {
    #[error("training data parse error: {0}")]
    Parse(String),

    #[error("model format error: {0}")]
    Model(String),

    #[error("cannot train on an empty record set")]
    EmptyTraining,

    #[error("k must be positive")]
    InvalidK,

    #[error(transparent)]
    Optimize(#[from] OptimizeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LearnResult<T> = Result<T, LearnError>;
