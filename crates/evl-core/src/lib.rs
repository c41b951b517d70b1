//! `evl-core`: foundational types for the `evl` truck-logistics engine.
//!
//! This crate is a dependency of every other `evl-*` crate.  It has no
//! `evl-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `TruckId`, `HubId`, `ZoneId`, `DriverId`                  |
//! | [`cell`]   | `Cell` grid coordinates                                   |
//! | [`geo`]    | `GeoPoint`, `MapBounds` projection                        |
//! | [`slot`]   | `TimeSlot`, `SlotTable`                                   |
//! | [`rng`]    | `TruckRng` (per-truck), `SimRng` (run-level), `SeedSource`|
//! | [`config`] | `PlatformConfig` and its sections                         |
//! | [`error`]  | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cell;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod slot;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::Cell;
pub use config::{
    CostWeights, DemandProfile, FeeModel, GridSizing, HubProfile, OriginWeighting,
    PlatformConfig, PollutionModel, SlotProfile, SolverLimits, SummaryOptions, ZoneLayout,
};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, MapBounds};
pub use ids::{DriverId, HubId, TruckId, ZoneId};
pub use rng::{SeedSource, SimRng, TruckRng};
pub use slot::{SlotTable, TimeSlot};
