//! Scenario flags shared by several subcommands, and config loading.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use tracing::info;

use evl_core::PlatformConfig;
use evl_platform::OptimizeRequest;

#[derive(Args, Clone)]
pub struct ScenarioArgs {
    #[arg(long, default_value_t = 200)]
    pub trucks: usize,

    #[arg(long, default_value_t = 5)]
    pub hubs: usize,

    #[arg(long, default_value_t = 500.0)]
    pub budget: f64,

    #[arg(long, default_value_t = 1.0)]
    pub peak_multiplier: f64,

    /// Use the greedy baseline instead of the optimizing solver.
    #[arg(long)]
    pub greedy: bool,

    /// Fixed seed; omitted means a clock-derived seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Solver deadline in milliseconds.
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

impl ScenarioArgs {
    pub fn to_request(&self) -> OptimizeRequest {
        OptimizeRequest {
            num_trucks:        self.trucks,
            num_hubs:          self.hubs,
            budget:            self.budget,
            peak_multiplier:   self.peak_multiplier,
            with_optimization: !self.greedy,
            seed:              self.seed,
            deadline_ms:       self.deadline_ms,
        }
    }
}

/// Default configuration, or the one in `path`.  Missing JSON fields keep
/// their defaults.
pub fn load_config(path: Option<&Path>) -> Result<PlatformConfig, anyhow::Error> {
    let Some(path) = path else {
        return Ok(PlatformConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: PlatformConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}
