use std::path::PathBuf;

use clap::Args;
use jiff::Timestamp;
use tracing::info;

use evl_core::PlatformConfig;
use evl_learn::{KnnClassifier, LearnedStrategy};
use evl_platform::{OptimizeResponse, PlatformBuilder, StrategyChoice};

use crate::scenario::ScenarioArgs;

#[derive(Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Assign with a trained classifier instead of the solver.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Print a short text summary instead of the JSON response.
    #[arg(short, long)]
    summary: bool,

    /// Pretty-print the JSON response.
    #[arg(long)]
    pretty: bool,
}

pub fn run(config: PlatformConfig, args: OptimizeArgs) -> Result<(), anyhow::Error> {
    let strategy = match &args.model {
        Some(path) => {
            info!(path = %path.display(), "loading model");
            StrategyChoice::Learned(LearnedStrategy::new(KnnClassifier::load_json(path)?))
        }
        None => StrategyChoice::Solver,
    };
    let platform = PlatformBuilder::new(config).strategy(strategy).build()?;
    let response = platform.optimize(&args.scenario.to_request())?.with_last_updated(Timestamp::now());

    if args.summary {
        print_summary(&response);
    } else {
        print_json(&response, args.pretty)?;
    }
    Ok(())
}

pub fn demo(config: PlatformConfig, pretty: bool) -> Result<(), anyhow::Error> {
    let response = PlatformBuilder::new(config).build()?.demo()?.with_last_updated(Timestamp::now());
    print_json(&response, pretty)
}

fn print_json(response: &OptimizeResponse, pretty: bool) -> Result<(), anyhow::Error> {
    let json = if pretty { response.to_json_pretty()? } else { response.to_json()? };
    println!("{json}");
    Ok(())
}

fn print_summary(r: &OptimizeResponse) {
    let totals = &r.platform_summary.totals;
    println!("strategy   {}", r.strategy);
    println!("status     {}", r.status);
    println!("assigned   {} / {}", r.n_assigned, r.request.num_trucks);
    match r.objective_value {
        Some(v) => println!("objective  {v:.2}"),
        None => println!("objective  -"),
    }
    println!("distance   {:.1} km", totals.total_distance_km);
    println!("congestion {:.1}", totals.total_congestion_cost);
    println!("revenue    {:.1}", totals.revenue);
    println!("energy     {:.1} kWh", r.assigned_energy_kwh());
    println!("seed       {}", r.seed);
    println!();
    println!("hub  zone  assigned  capacity  util%  day%");
    for h in &r.hub_usage {
        println!(
            "{:>3}  {:>4}  {:>8}  {:>8}  {:>5.1}  {:>4.1}",
            h.hub_id, h.zone_id, h.assigned, h.capacity, h.utilization_pct, h.daily_utilization_pct
        );
    }
    if !r.unassigned.is_empty() {
        println!();
        println!("{} trucks unassigned", r.unassigned.len());
    }
}
