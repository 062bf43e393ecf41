//! Trained model persistence.
//!
//! Models are stored as JSON: the Q-table plus enough metadata to refuse a
//! table trained for a different environment or discretisation.

use super::QTable;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    /// Environment identifier, e.g. `MountainCar-v0`.
    pub environment: String,
    /// Environment variant the table belongs to (the lake layout for frozen
    /// lake models).
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub episodes_trained: usize,
    #[serde(default)]
    pub timesteps_trained: usize,
    pub table: QTable,
}

impl SavedModel {
    pub fn new(environment: &str, table: QTable) -> Self {
        Self {
            environment: environment.to_string(),
            variant: None,
            episodes_trained: 0,
            timesteps_trained: 0,
            table,
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Writes the model, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let io_err = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string(self).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        tracing::info!(path = %path.display(), env = %self.environment, "model saved");
        Ok(())
    }

    /// Reads a model and checks it against the expected environment and
    /// table shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or was trained for
    /// something else.
    pub fn load(
        path: &Path,
        environment: &str,
        n_states: usize,
        n_actions: usize,
    ) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: SavedModel =
            serde_json::from_str(&content).map_err(|source| ModelError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        model.validate(environment, n_states, n_actions)?;
        tracing::info!(
            path = %path.display(),
            episodes = model.episodes_trained,
            timesteps = model.timesteps_trained,
            "model loaded"
        );
        Ok(model)
    }

    /// Like [`SavedModel::load`], but a missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be used.
    pub fn load_if_exists(
        path: &Path,
        environment: &str,
        n_states: usize,
        n_actions: usize,
    ) -> Result<Option<Self>, ModelError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path, environment, n_states, n_actions).map(Some)
    }

    fn validate(&self, environment: &str, n_states: usize, n_actions: usize) -> Result<(), ModelError> {
        if self.environment != environment {
            return Err(ModelError::EnvironmentMismatch {
                expected: environment.to_string(),
                found: self.environment.clone(),
            });
        }
        if !self.table.is_consistent() {
            return Err(ModelError::CorruptTable {
                n_states: self.table.n_states(),
                n_actions: self.table.n_actions(),
                found: self.table.len(),
            });
        }
        if self.table.n_states() != n_states || self.table.n_actions() != n_actions {
            return Err(ModelError::ShapeMismatch {
                expected_states: n_states,
                expected_actions: n_actions,
                found_states: self.table.n_states(),
                found_actions: self.table.n_actions(),
            });
        }
        Ok(())
    }
}

/// Path of a model file inside the data directory.
pub fn model_path(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Transition;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("rl-arcade-test-{}", std::process::id()))
            .join(name)
    }

    fn trained_table() -> QTable {
        let mut table = QTable::new(4, 2);
        table.update(
            Transition {
                state: 1,
                action: 1,
                reward: 3.0,
                next_state: 2,
                terminal: true,
            },
            1.0,
            0.9,
        );
        table
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("model_ok.json");
        let mut model = SavedModel::new("Test-v0", trained_table()).with_variant("SF/FG");
        model.episodes_trained = 12;
        model.save(&path).unwrap();

        let loaded = SavedModel::load(&path, "Test-v0", 4, 2).unwrap();
        assert_eq!(loaded, model);
        assert!((loaded.table.value(1, 1) - 3.0).abs() < 1e-12);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_other_environment() {
        let path = temp_path("model_env.json");
        SavedModel::new("Test-v0", trained_table()).save(&path).unwrap();
        let err = SavedModel::load(&path, "Other-v0", 4, 2).unwrap_err();
        assert!(matches!(err, ModelError::EnvironmentMismatch { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_wrong_shape() {
        let path = temp_path("model_shape.json");
        SavedModel::new("Test-v0", trained_table()).save(&path).unwrap();
        let err = SavedModel::load(&path, "Test-v0", 400, 3).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_truncated_values() {
        let path = temp_path("model_corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"environment":"Test-v0","table":{"n_states":2,"n_actions":2,"values":[0.0]}}"#,
        )
        .unwrap();
        let err = SavedModel::load(&path, "Test-v0", 2, 2).unwrap_err();
        assert!(matches!(err, ModelError::CorruptTable { found: 1, .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_overflowing_shape() {
        let path = temp_path("model_overflow.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            format!(
                r#"{{"environment":"Test-v0","table":{{"n_states":{},"n_actions":2,"values":[]}}}}"#,
                usize::MAX
            ),
        )
        .unwrap();
        let err = SavedModel::load(&path, "Test-v0", 2, 2).unwrap_err();
        assert!(matches!(
            err,
            ModelError::CorruptTable {
                n_actions: 2,
                found: 0,
                ..
            }
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_if_exists_missing_file() {
        let path = temp_path("does_not_exist.json");
        assert!(SavedModel::load_if_exists(&path, "Test-v0", 1, 1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let path = temp_path("model_garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        let err = SavedModel::load(&path, "Test-v0", 1, 1).unwrap_err();
        assert!(matches!(err, ModelError::Json { .. }));
        let _ = fs::remove_file(&path);
    }
}
