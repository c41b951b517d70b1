//! evl: command-line batch client for the electric-truck logistics engine.
//!
//! ```text
//! evl optimize --trucks 200 --hubs 5 --budget 500 --summary
//! evl demo --pretty
//! evl generate --out ./dataset --format csv --seed 7
//! evl train --runs 20 --out model.json
//! evl optimize --model model.json --seed 3
//! ```

mod generate;
mod optimize;
mod scenario;
mod train;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    generate::GenerateArgs, optimize::OptimizeArgs, scenario::load_config, train::TrainArgs,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log at DEBUG instead of INFO.
    #[arg(short, long)]
    debug: bool,

    /// JSON file overriding the default platform configuration.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario and print the response.
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Run the fixed demo scenario.
    Demo {
        /// Pretty-print the JSON response.
        #[arg(long)]
        pretty: bool,
    },
    /// Run one scenario and persist it as a dataset.
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Train a classifier on solver outcomes.
    Train {
        #[command(flatten)]
        args: TrainArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Optimize { args }) => optimize::run(config, args)?,
        Some(Commands::Demo { pretty }) => optimize::demo(config, pretty)?,
        Some(Commands::Generate { args }) => generate::run(config, args)?,
        Some(Commands::Train { args }) => train::run(config, args)?,
        None => optimize::demo(config, false)?,
    }

    Ok(())
}
