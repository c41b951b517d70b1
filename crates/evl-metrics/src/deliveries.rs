//! Synthetic delivery list for presentation.
//!
//! One delivery per assignment, in assignment order.  Addresses come from
//! fixed tables indexed by origin zone and hub id (wrapping), so the list is
//! a pure function of the run.

use std::fmt;

use evl_demand::{Fleet, driver_name};
use evl_optimize::Outcome;

const ORIGIN_ADDRESSES: [&str; 10] = [
    "Halleck St Produce Yard",
    "Food Center Dr Market",
    "Viele Ave Cold Storage",
    "Randall Ave Depot",
    "Garrison Ave Warehouse",
    "Manida St Distribution",
    "Tiffany St Pier",
    "Coster St Loading Dock",
    "Spofford Ave Terminal",
    "Longwood Ave Wholesale",
];

const HUB_ADDRESSES: [&str; 4] = [
    "Hunts Point Ave Charging",
    "Food Center Charging",
    "Oak Point Charging",
    "Lafayette Ave Charging",
];

/// Deliveries beyond this position are all `Scheduled`.
const STATUS_CYCLE_LEN: usize = 60;

/// First delivery number.
const FIRST_DELIVERY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeliveryStatus {
    Scheduled,
    EnRoute,
    AtHub,
    Completed,
}

impl DeliveryStatus {
    const CYCLE: [DeliveryStatus; 4] =
        [DeliveryStatus::Scheduled, DeliveryStatus::EnRoute, DeliveryStatus::AtHub, DeliveryStatus::Completed];

    /// Status of the `i`-th delivery.
    pub fn for_position(i: usize) -> Self {
        if i < STATUS_CYCLE_LEN { Self::CYCLE[i % Self::CYCLE.len()] } else { DeliveryStatus::Scheduled }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Scheduled => "scheduled",
            DeliveryStatus::EnRoute => "en_route",
            DeliveryStatus::AtHub => "at_hub",
            DeliveryStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delivery {
    pub delivery_id:    String,
    pub truck_id:       u32,
    pub driver_id:      u32,
    pub driver_name:    String,
    pub from_zone_id:   u16,
    pub from_address:   String,
    pub to_hub_id:      u32,
    pub to_address:     String,
    pub scheduled_slot: u8,
    pub scheduled_time: String,
    pub status:         DeliveryStatus,
}

pub fn origin_address(zone: u16) -> &'static str {
    ORIGIN_ADDRESSES[zone as usize % ORIGIN_ADDRESSES.len()]
}

pub fn hub_address(hub: u32) -> &'static str {
    HUB_ADDRESSES[hub as usize % HUB_ADDRESSES.len()]
}

pub fn build_deliveries(fleet: &Fleet, outcome: &Outcome) -> Vec<Delivery> {
    outcome
        .assignments
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let t = a.truck.index();
            let zone = fleet.origin_zone[t].0;
            let driver = fleet.driver[t];
            Delivery {
                delivery_id:    format!("D-{}", FIRST_DELIVERY + i),
                truck_id:       a.truck.0,
                driver_id:      driver.0,
                driver_name:    driver_name(driver),
                from_zone_id:   zone,
                from_address:   origin_address(zone).to_owned(),
                to_hub_id:      a.hub.0,
                to_address:     hub_address(a.hub.0).to_owned(),
                scheduled_slot: a.slot.0,
                scheduled_time: a.slot.to_string(),
                status:         DeliveryStatus::for_position(i),
            }
        })
        .collect()
}
