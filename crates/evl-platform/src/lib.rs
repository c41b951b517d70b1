//! `evl-platform`: one optimize run, end to end.
//!
//! A [`Platform`] turns an [`OptimizeRequest`] into an [`OptimizeResponse`]:
//! it generates the grid and fleet, runs the configured assignment strategy,
//! validates the outcome, and derives every presentation table from it.
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`platform`] | `Platform`, `PlatformBuilder`, `StrategyChoice`, demo    |
//! | [`request`]  | `OptimizeRequest` and its validation                     |
//! | [`response`] | `OptimizeResponse`, `TruckAssignment`                    |
//! | [`map`]      | Artificial grid map, zone GeoJSON, hub positions         |
//! | [`observer`] | `PipelineObserver`, `NoopObserver`                       |
//! | [`error`]    | `PlatformError`, `PlatformResult<T>`                     |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Computes hop fields on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use evl_platform::{OptimizeRequest, Platform};
//!
//! let request = OptimizeRequest::new(10, 2, 1000.0, 1.0).with_seed(7);
//! let response = Platform::default().optimize(&request)?;
//! println!("{} trucks assigned ({})", response.n_assigned, response.status);
//! ```

pub mod error;
pub mod map;
pub mod observer;
pub mod platform;
pub mod request;
pub mod response;

#[cfg(test)]
mod tests;

pub use error::{PlatformError, PlatformResult};
pub use map::{
    ArtificialMap, HubMarker, HubPosition, MapPoint, RouteLine, ZoneCell, ZoneCells, ZoneMeta,
    hub_positions, zones_geojson,
};
pub use observer::{NoopObserver, PipelineObserver};
pub use platform::{Platform, PlatformBuilder, StrategyChoice, demo_response};
pub use request::{MAX_TRUCKS, OptimizeRequest};
pub use response::{OptimizeResponse, TruckAssignment};
