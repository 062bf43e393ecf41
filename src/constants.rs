//! Application-wide constants and configuration values.
//!
//! This module defines the static values used throughout rl-arcade,
//! including environment geometry, frame timing, file names, and UI messages.

#![allow(dead_code)]

// === Application Metadata ===

/// Application name (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// === Timing Configuration ===

/// Air hockey play mode tick rate (60 FPS).
pub const AIR_HOCKEY_TICK_MS: u64 = 16;
/// Mountain car replay tick rate.
pub const MOUNTAIN_CAR_TICK_MS: u64 = 33;
/// Frozen lake replay tick rate (one move every quarter second).
pub const FROZEN_LAKE_TICK_MS: u64 = 250;
/// How long the goal banner stays up before the match resets.
pub const GOAL_BANNER_MS: u64 = 2000;
/// How long an end-of-episode toast stays up during replays.
pub const EPISODE_TOAST_MS: u64 = 1200;

// === Path Configuration ===

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Name of the logs subdirectory.
pub const LOGS_DIR_NAME: &str = "logs";
/// Name of the log file.
pub const LOG_FILE_NAME: &str = "rl-arcade.log";
/// Mountain car Q-table file.
pub const MOUNTAIN_CAR_MODEL: &str = "mountain_car.json";
/// Air hockey Q-table file.
pub const AIR_HOCKEY_MODEL: &str = "air_hockey.json";
/// Frozen lake Q-table file prefix; the map name is appended.
pub const FROZEN_LAKE_MODEL_PREFIX: &str = "frozen_lake";

// === Environment Identifiers ===

pub const ENV_MOUNTAIN_CAR: &str = "MountainCar-v0";
pub const ENV_FROZEN_LAKE: &str = "FrozenLake-v1";
pub const ENV_AIR_HOCKEY: &str = "AirHockey-v0";

// === Training Output ===

/// Episodes between progress lines while training.
pub const PROGRESS_EVERY_EPISODES: usize = 500;
/// Timesteps between progress lines while training air hockey.
pub const PROGRESS_EVERY_TIMESTEPS: usize = 50_000;
/// Window size of the rolling training statistics.
pub const STATS_WINDOW: usize = 100;
/// Episodes replayed by `--render` when no count is given.
pub const DEFAULT_REPLAY_EPISODES: usize = 5;

// === UI Messages ===

pub const MSG_YOU_WIN: &str = "YOU WIN!";
pub const MSG_AI_WINS: &str = "AI WINS!";
pub const MSG_REACHED_FLAG: &str = "Reached the flag in {} steps";
pub const MSG_TIMED_OUT: &str = "Timed out after {} steps";
pub const MSG_REACHED_GOAL: &str = "Reached the goal!";
pub const MSG_FELL_IN_HOLE: &str = "Fell into a hole";
pub const MSG_LAKE_TIMED_OUT: &str = "Ran out of moves";
pub const MSG_REPLAY_DONE: &str = "Replay finished. Press [q] to exit.";

// === Messages: CLI Output ===

pub const CLI_MENU_PROMPT: &str = "Select mode (1: train AI, 2: play): ";
pub const CLI_MSG_INVALID_MODE: &str = "Invalid input";
pub const CLI_MSG_TRAIN_START: &str = "Starting training mode...";
pub const CLI_MSG_LOADED_MODEL: &str = "Loaded existing model, continuing training...";
pub const CLI_MSG_NEW_MODEL: &str = "Creating a new model...";
pub const CLI_MSG_MODEL_SAVED: &str = "Model saved to ";
pub const CLI_MSG_PLAY_START: &str = "Entering play mode (human vs AI)...";
pub const CLI_MSG_PLAY_HINT: &str = "Move with the mouse or arrow keys. Press ESC to quit.";
pub const CLI_MSG_NO_MODEL: &str = "No model file found. Run training mode first!";
pub const CLI_MSG_EVAL_HEADER: &str = "\nEvaluation Summary:";
