//! All derived views of one run.

use tracing::debug;

use evl_core::{PlatformConfig, SlotTable};
use evl_demand::Fleet;
use evl_optimize::Outcome;
use evl_spatial::GridNetwork;

use crate::{Delivery, Estimate, PlatformSummary, build_deliveries};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsReport {
    pub estimate:   Estimate,
    pub summary:    PlatformSummary,
    pub deliveries: Vec<Delivery>,
}

impl MetricsReport {
    pub fn compute(
        grid: &GridNetwork,
        fleet: &Fleet,
        slots: &SlotTable,
        outcome: &Outcome,
        config: &PlatformConfig,
    ) -> Self {
        let estimate = Estimate::compute(grid, slots, outcome, &config.pollution);
        let summary = PlatformSummary::build(grid, slots, outcome, &config.fees, &config.summary);
        let deliveries = build_deliveries(fleet, outcome);
        debug!(
            zones = estimate.pollution_per_zone.len(),
            hubs = estimate.hub_usage.len(),
            deliveries = deliveries.len(),
            "metrics computed"
        );
        Self { estimate, summary, deliveries }
    }
}
