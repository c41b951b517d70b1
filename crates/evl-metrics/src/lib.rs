//! `evl-metrics`: everything derived from a finished assignment.
//!
//! Nothing in this crate influences the assignment; every function reads an
//! [`Outcome`](evl_optimize::Outcome) plus the run's static inputs and
//! returns fresh tables.
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`estimator`]  | Congestion per slot, pollution per zone, hub usage         |
//! | [`summary`]    | `PlatformSummary`: totals, driver tips, quiet slots        |
//! | [`deliveries`] | Presentation-only delivery list                            |
//! | [`report`]     | `MetricsReport` bundling the three                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all row types.        |

pub mod deliveries;
pub mod estimator;
pub mod report;
pub mod summary;


pub use deliveries::{Delivery, DeliveryStatus, build_deliveries};
pub use estimator::{
    Estimate, HubSlotUsage, HubUsage, SlotCongestion, ZonePollution, congestion_per_time,
    hub_slot_usage, hub_usage, pollution_level, pollution_per_zone,
};
pub use report::MetricsReport;
pub use summary::{DriverTip, PlatformSummary, PlatformTotals, QuietSlots, ZoneSlotCount};
