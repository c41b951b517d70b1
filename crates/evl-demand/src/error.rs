//! Demand-generation error type.

use thiserror::Error;

use evl_core::Cell;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("no zone has an open cell to start a truck from")]
    NoOpenCells,

    #[error("origin {0} is outside the grid or blocked")]
    InvalidOrigin(Cell),

    #[error("energy band {lo}..{hi} kWh is empty")]
    InvalidEnergyBand { lo: f32, hi: f32 },
}

pub type DemandResult<T> = Result<T, DemandError>;
