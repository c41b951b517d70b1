//! `evl-spatial`: synthetic grid network, zones, hubs, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`grid`]   | `GridNetwork`, `Zone`, `Hub`, `GridNetworkBuilder`            |
//! | [`router`] | `Router` trait, `Route`, `HopField`, `BfsRouter`             |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::{GridNetwork, GridNetworkBuilder, Hub, Zone};
pub use router::{BfsRouter, HopField, Route, Router};
