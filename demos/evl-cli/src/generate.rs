use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing::info;

use evl_core::PlatformConfig;
use evl_output::{CsvDatasetWriter, DatasetObserver, DatasetWriter, JsonDatasetWriter};
use evl_platform::{Platform, PlatformBuilder};

use crate::scenario::ScenarioArgs;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output folder; created if missing.
    #[arg(long, short = 'o')]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Include the artificial map and assignments in `dataset.json`.
    #[arg(long)]
    full: bool,

    #[command(flatten)]
    scenario: ScenarioArgs,
}

pub fn run(config: PlatformConfig, args: GenerateArgs) -> Result<(), anyhow::Error> {
    std::fs::create_dir_all(&args.out)?;
    let platform = PlatformBuilder::new(config).build()?;

    match args.format {
        Format::Csv => write(&platform, &args, CsvDatasetWriter::new(&args.out)?)?,
        Format::Json => write(
            &platform,
            &args,
            JsonDatasetWriter::new(&args.out)?.with_map(args.full).with_assignments(args.full),
        )?,
    }

    info!(out = %args.out.display(), "dataset generated");
    Ok(())
}

fn write<W: DatasetWriter>(platform: &Platform, args: &GenerateArgs, writer: W) -> Result<(), anyhow::Error> {
    let mut observer = DatasetObserver::new(writer);
    let response = platform.run(&args.scenario.to_request(), &mut observer)?;
    if let Some(e) = observer.take_error() {
        return Err(e.into());
    }
    info!(status = %response.status, assigned = response.n_assigned, seed = response.seed, "run persisted");
    Ok(())
}
