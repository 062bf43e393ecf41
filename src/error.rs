//! Domain error types.

use std::path::PathBuf;

/// Errors raised while saving or loading a trained Q-table.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to access model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model was trained on {found}, expected {expected}")]
    EnvironmentMismatch { expected: String, found: String },

    #[error("model shape is {found_states}x{found_actions}, expected {expected_states}x{expected_actions}")]
    ShapeMismatch {
        expected_states: usize,
        expected_actions: usize,
        found_states: usize,
        found_actions: usize,
    },

    #[error("model table holds {found} values, which does not fit a {n_states}x{n_actions} shape")]
    CorruptTable {
        n_states: usize,
        n_actions: usize,
        found: usize,
    },

    #[error("model file {path} stores an unusable lake layout: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Errors raised while loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid frozen lake map: {0}")]
    InvalidMap(String),
}
