//! Spatial-subsystem error type.

use thiserror::Error;

use evl_core::Cell;

/// Errors produced by `evl-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    Unreachable { from: Cell, to: Cell },

    #[error("cell {0} lies outside the grid")]
    CellOutOfBounds(Cell),

    #[error("cell {0} is blocked")]
    Blocked(Cell),

    #[error("two hubs placed on cell {0}")]
    HubCollision(Cell),

    /// A caller-supplied hub or obstacle cell is unusable.
    #[error("{what} cell {cell} {reason}")]
    InvalidPlacement { what: &'static str, cell: Cell, reason: &'static str },

    #[error("{hubs} hubs do not fit on {cells} open cells")]
    TooManyHubs { hubs: usize, cells: usize },

    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),
}

impl SpatialError {
    /// `true` for errors caused by the caller's parameters rather than an
    /// engine defect.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SpatialError::TooManyHubs { .. }
                | SpatialError::InvalidDimensions(_)
                | SpatialError::HubCollision(_)
                | SpatialError::InvalidPlacement { .. }
        )
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
