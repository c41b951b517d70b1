//! Scenario parameters for one optimize run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{PlatformError, PlatformResult};

/// Largest fleet a single request may ask for.
pub const MAX_TRUCKS: usize = 10_000;

/// Parameters of one run.  Missing JSON fields take the [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeRequest {
    pub num_trucks:        usize,
    pub num_hubs:          usize,
    pub budget:            f64,
    pub peak_multiplier:   f64,
    /// `false` selects the greedy baseline.
    pub with_optimization: bool,
    /// `None` draws a clock-derived seed.
    pub seed:              Option<u64>,
    /// Overrides the configured solver deadline.
    pub deadline_ms:       Option<u64>,
}

impl Default for OptimizeRequest {
    fn default() -> Self {
        Self {
            num_trucks:        200,
            num_hubs:          5,
            budget:            500.0,
            peak_multiplier:   1.0,
            with_optimization: true,
            seed:              None,
            deadline_ms:       None,
        }
    }
}

impl OptimizeRequest {
    pub fn new(num_trucks: usize, num_hubs: usize, budget: f64, peak_multiplier: f64) -> Self {
        Self { num_trucks, num_hubs, budget, peak_multiplier, ..Self::default() }
    }

    pub fn with_optimization(mut self, on: bool) -> Self {
        self.with_optimization = on;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_deadline_ms(mut self, ms: u64) -> Self {
        self.deadline_ms = Some(ms);
        self
    }

    /// The fixed scenario behind the demo contract.
    pub fn demo() -> Self {
        Self::new(48, 4, 1000.0, 1.0).with_optimization(false).with_seed(42)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> PlatformResult<()> {
        if !(1..=MAX_TRUCKS).contains(&self.num_trucks) {
            return Err(PlatformError::Configuration(format!(
                "num_trucks {} must be between 1 and {MAX_TRUCKS}",
                self.num_trucks
            )));
        }
        if self.num_hubs == 0 {
            return Err(PlatformError::Configuration("num_hubs must be at least 1".into()));
        }
        if !(self.budget.is_finite() && self.budget >= 0.0) {
            return Err(PlatformError::Configuration(format!(
                "budget {} must be finite and non-negative",
                self.budget
            )));
        }
        if !(self.peak_multiplier.is_finite() && self.peak_multiplier > 0.0) {
            return Err(PlatformError::Configuration(format!(
                "peak_multiplier {} must be finite and positive",
                self.peak_multiplier
            )));
        }
        Ok(())
    }
}
