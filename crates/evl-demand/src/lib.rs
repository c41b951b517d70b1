//! `evl-demand`: truck fleet storage and demand generation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`fleet`]     | `Fleet` (SoA arrays indexed by `TruckId`)             |
//! | [`generator`] | `DemandGenerator` (seeded, per-truck RNG streams)     |
//! | [`drivers`]   | `driver_name` display names                           |
//! | [`error`]     | `DemandError`, `DemandResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Fleet`.          |

pub mod drivers;
pub mod error;
pub mod fleet;
pub mod generator;


pub use drivers::driver_name;
pub use error::{DemandError, DemandResult};
pub use fleet::{DEFAULT_ENERGY_KWH, Fleet};
pub use generator::DemandGenerator;
