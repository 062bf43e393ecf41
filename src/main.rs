//! rl-arcade: tabular Q-learning agents for Mountain Car, Frozen Lake and
//! air hockey, with a terminal viewer.

mod agent;
mod app;
mod cli;
mod config;
mod constants;
mod core;
mod env;
mod error;
mod event;
mod logging;
mod state;
mod theme;
mod ui;

use clap::Parser;
use cli::args::Args;
use cli::commands::Context;
use color_eyre::Result;
use config::AppConfig;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let (config, source) = AppConfig::load(args.config.as_deref())?;
    let data_dir = config.data_dir(args.data_dir.as_deref());

    let _guard = logging::init(&data_dir, &config.logging.level)?;
    tracing::info!(
        version = constants::APP_VERSION,
        config = %source,
        data_dir = %data_dir.display(),
        "starting"
    );

    let ctx = Context {
        config,
        data_dir,
        seed: args.seed,
    };
    cli::commands::run(&ctx, args.command)
}
