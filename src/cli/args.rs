//! Command-line argument definitions.

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rl-arcade - Q-learning agents for classic control and arcade games
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "RL_ARCADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding trained models and logs
    #[arg(long, global = true, env = "RL_ARCADE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seed for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Game to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available games
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Train, replay or evaluate the mountain car agent
    #[command(alias = "mountain_car")]
    MountainCar {
        /// Train the agent and save the model
        #[arg(long)]
        train: bool,

        /// Replay the trained agent in the terminal
        #[arg(long)]
        render: bool,

        /// Episodes to train, or to replay when only rendering
        #[arg(long)]
        episodes: Option<usize>,
    },

    /// Train, evaluate or replay the frozen lake agent
    #[command(alias = "frozen_lake")]
    FrozenLake {
        /// Lake to use: 4x4, 8x8 or random
        #[arg(long)]
        map: Option<String>,

        /// Side length of a random lake (2 to 64)
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(2..=64))]
        size: Option<usize>,

        /// Make every move go where it was meant to
        #[arg(long)]
        not_slippery: bool,

        /// Episodes to train, evaluate or replay
        #[arg(long)]
        episodes: Option<usize>,

        /// Evaluate the saved model without training
        #[arg(long)]
        evaluate: bool,

        /// Replay the saved model in the terminal
        #[arg(long)]
        render: bool,
    },

    /// Train the air hockey agent or play against it
    #[command(alias = "air_hockey")]
    AirHockey {
        /// Skip the menu and go straight to a mode
        #[arg(long, value_enum)]
        mode: Option<HockeyMode>,

        /// Environment steps to train for
        #[arg(long)]
        timesteps: Option<usize>,
    },
}

/// What to do in air hockey.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HockeyMode {
    /// Train the agent against the scripted bot
    Train,
    /// Play against the trained agent
    Play,
}
