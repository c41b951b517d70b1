use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use evl_core::PlatformConfig;
use evl_learn::{DEFAULT_K, KnnClassifier, TrainingRecord, records_from_outcome, save_records_csv};
use evl_optimize::{AssignmentProblem, Outcome};
use evl_platform::{PipelineObserver, PlatformBuilder};

use crate::scenario::ScenarioArgs;

#[derive(Args)]
pub struct TrainArgs {
    /// Number of solver runs to learn from; run `i` uses seed `seed + i`.
    #[arg(long, default_value_t = 10)]
    runs: u64,

    /// Where to write the fitted model.
    #[arg(long, short = 'o')]
    out: PathBuf,

    /// Neighbours consulted per prediction.
    #[arg(short, long, default_value_t = DEFAULT_K)]
    k: usize,

    /// Also save the training records as CSV.
    #[arg(long)]
    records: Option<PathBuf>,

    #[command(flatten)]
    scenario: ScenarioArgs,
}

#[derive(Default)]
struct Collector {
    records: Vec<TrainingRecord>,
}

impl PipelineObserver for Collector {
    fn on_outcome(&mut self, problem: &AssignmentProblem<'_>, outcome: &Outcome) {
        self.records.extend(records_from_outcome(problem, outcome));
    }
}

pub fn run(config: PlatformConfig, args: TrainArgs) -> Result<(), anyhow::Error> {
    let platform = PlatformBuilder::new(config).build()?;
    let base = args.scenario.seed.unwrap_or(0);
    let mut collector = Collector::default();

    for i in 0..args.runs {
        let request = args.scenario.to_request().with_seed(base.wrapping_add(i));
        let response = platform.run(&request, &mut collector)?;
        debug!(run = i, assigned = response.n_assigned, "training run");
    }

    if let Some(path) = &args.records {
        save_records_csv(path, &collector.records)?;
    }
    let model = KnnClassifier::fit(&collector.records, args.k)?;
    model.save_json(&args.out)?;
    info!(
        runs = args.runs,
        examples = model.len(),
        k = model.k(),
        out = %args.out.display(),
        "model trained"
    );
    Ok(())
}
