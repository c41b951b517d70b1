//! Display names for driver identities.
//!
//! Names are a pure function of the `DriverId`, so they never consume
//! randomness and stay stable across runs.

use evl_core::DriverId;

const FIRST: [&str; 12] = [
    "Alex", "Bea", "Chidi", "Dana", "Emeka", "Farah", "Goran", "Hana", "Ivan", "Jia", "Kofi",
    "Lena",
];

const LAST: [&str; 9] = [
    "Okafor", "Petrov", "Quinn", "Rossi", "Sato", "Torres", "Ueda", "Vargas", "Weber",
];

/// `"First Last"` for `driver`.  Distinct for the first 108 ids.
pub fn driver_name(driver: DriverId) -> String {
    let i = driver.index();
    let first = FIRST[i % FIRST.len()];
    let last = LAST[(i / FIRST.len()) % LAST.len()];
    format!("{first} {last}")
}
