//! Platform error type.
//!
//! Every failure of a run falls in one of two classes.  Configuration errors
//! are the caller's fault and map to a 4xx-style response; everything else
//! is an internal defect and maps to a 5xx-style response with no payload.
//! Infeasibility is not an error.

use thiserror::Error;

use evl_core::CoreError;
use evl_demand::DemandError;
use evl_learn::LearnError;
use evl_optimize::OptimizeError;
use evl_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal consistency error: {0}")]
    Consistency(String),

    #[error("model error: {0}")]
    Model(#[from] LearnError),
}

impl PlatformError {
    /// `true` for errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PlatformError::Configuration(_))
    }
}

impl From<CoreError> for PlatformError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(msg) => PlatformError::Configuration(msg),
        }
    }
}

impl From<SpatialError> for PlatformError {
    fn from(e: SpatialError) -> Self {
        if e.is_configuration() {
            PlatformError::Configuration(e.to_string())
        } else {
            PlatformError::Consistency(e.to_string())
        }
    }
}

impl From<DemandError> for PlatformError {
    fn from(e: DemandError) -> Self {
        match e {
            DemandError::InvalidOrigin(_) => PlatformError::Consistency(e.to_string()),
            DemandError::NoOpenCells | DemandError::InvalidEnergyBand { .. } => {
                PlatformError::Configuration(e.to_string())
            }
        }
    }
}

impl From<OptimizeError> for PlatformError {
    fn from(e: OptimizeError) -> Self {
        match e {
            OptimizeError::Config(msg) => PlatformError::Configuration(msg),
            OptimizeError::Consistency(msg) => PlatformError::Consistency(msg),
            OptimizeError::Spatial(e) => e.into(),
        }
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;
