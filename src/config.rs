//! Configuration loading.
//!
//! Settings come from `config.toml` in the user's config directory
//! (`~/.config/rl-arcade/config.toml` on Linux). Every field is optional; a
//! missing file means the built-in defaults.

use crate::constants;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
    pub mountain_car: MountainCarConfig,
    pub frozen_lake: FrozenLakeConfig,
    pub air_hockey: AirHockeyConfig,
}

/// Where models and logs are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Mountain car Q-learning hyperparameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountainCarConfig {
    pub episodes: usize,
    pub position_bins: usize,
    pub velocity_bins: usize,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    /// Share of the episodes over which epsilon decays to its floor.
    pub exploration_fraction: f64,
    /// Step limit per episode.
    pub max_steps: usize,
    pub eval_episodes: usize,
}

impl Default for MountainCarConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            position_bins: 20,
            velocity_bins: 20,
            learning_rate: 0.9,
            discount: 0.9,
            epsilon_start: 1.0,
            epsilon_min: 0.0,
            exploration_fraction: 0.5,
            max_steps: 1000,
            eval_episodes: 100,
        }
    }
}

/// Frozen lake Q-learning hyperparameters and map selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrozenLakeConfig {
    /// `4x4`, `8x8` or `random`.
    pub map: String,
    /// Side length of generated maps.
    pub random_size: usize,
    /// Probability of a generated tile being frozen.
    pub frozen_probability: f64,
    pub slippery: bool,
    pub episodes: usize,
    pub learning_rate: f64,
    /// Learning rate once exploration has stopped.
    pub settle_learning_rate: Option<f64>,
    pub discount: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    pub exploration_fraction: f64,
    pub eval_episodes: usize,
}

impl Default for FrozenLakeConfig {
    fn default() -> Self {
        Self {
            map: "8x8".to_string(),
            random_size: 8,
            frozen_probability: 0.8,
            slippery: true,
            episodes: 15000,
            learning_rate: 0.9,
            settle_learning_rate: Some(0.0001),
            discount: 0.9,
            epsilon_start: 1.0,
            epsilon_min: 0.0,
            exploration_fraction: 0.66,
            eval_episodes: 1000,
        }
    }
}

/// Air hockey Q-learning hyperparameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AirHockeyConfig {
    /// Total environment steps per training run.
    pub timesteps: usize,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    /// Share of the timesteps over which epsilon decays to its floor.
    pub exploration_fraction: f64,
}

impl Default for AirHockeyConfig {
    fn default() -> Self {
        Self {
            timesteps: 1_000_000,
            learning_rate: 0.1,
            discount: 0.99,
            epsilon_start: 1.0,
            epsilon_min: 0.05,
            exploration_fraction: 0.3,
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. The default location is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_config_dir().join(constants::CONFIG_FILE_NAME);
                if !path.is_file() {
                    return Ok((Self::default(), ConfigSource::Defaults));
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok((config, ConfigSource::File(path)))
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the data directory: CLI override, then config, then platform default.
    pub fn data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.paths.data_dir.clone())
            .unwrap_or_else(default_data_dir)
    }
}

/// Platform config directory for rl-arcade.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_NAME)
}

/// Platform data directory for rl-arcade.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_NAME)
}
