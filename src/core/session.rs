//! Complete training runs and model lookups for each environment.
//!
//! A run loads the existing model when there is one and keeps training it,
//! otherwise it starts from an empty table. The result is written back to
//! the data directory.

use super::telemetry::{TrainingStats, TrainingUpdate};
use super::trainer::{evaluate, train_episodes, train_timesteps, EvaluationReport};
use crate::agent::discretize::{CarEncoder, LakeEncoder, RinkEncoder};
use crate::agent::model::model_path;
use crate::agent::{EpsilonSchedule, Learner, LearningRates, QTable, SavedModel, StateEncoder};
use crate::config::{AirHockeyConfig, FrozenLakeConfig, MountainCarConfig};
use crate::constants::{
    AIR_HOCKEY_MODEL, ENV_AIR_HOCKEY, ENV_FROZEN_LAKE, ENV_MOUNTAIN_CAR, FROZEN_LAKE_MODEL_PREFIX,
    MOUNTAIN_CAR_MODEL,
};
use crate::env::air_hockey::{AirHockey, Nudge, Opponent};
use crate::env::frozen_lake::{FrozenLake, LakeMap, MapSpec, Move};
use crate::env::mountain_car::{MountainCar, Push};
use crate::env::DiscreteAction;
use crate::error::{ConfigError, ModelError};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model: SavedModel,
    pub path: PathBuf,
    /// Whether training continued from an existing model.
    pub resumed: bool,
    pub stats: TrainingStats,
}

/// Number of decay steps covering `fraction` of `total`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn decay_steps(total: usize, fraction: f64) -> usize {
    (total as f64 * fraction.clamp(0.0, 1.0)).round() as usize
}

fn learner_for(table: QTable, epsilon: EpsilonSchedule, alpha: f64, gamma: f64) -> Learner {
    Learner::new(
        table,
        epsilon,
        LearningRates {
            alpha,
            gamma,
            settle_alpha: None,
        },
    )
}

/// Loads `path` or starts a fresh model.
fn resume_or_new(
    path: &Path,
    environment: &str,
    n_states: usize,
    n_actions: usize,
) -> Result<(SavedModel, bool), ModelError> {
    Ok(
        match SavedModel::load_if_exists(path, environment, n_states, n_actions)? {
            Some(model) => (model, true),
            None => (
                SavedModel::new(environment, QTable::new(n_states, n_actions)),
                false,
            ),
        },
    )
}

fn finish(
    mut model: SavedModel,
    learner: Learner,
    stats: TrainingStats,
    path: PathBuf,
    resumed: bool,
) -> Result<TrainingReport, ModelError> {
    model.table = learner.table;
    model.episodes_trained += stats.episodes();
    model.timesteps_trained += stats.timesteps();
    model.save(&path)?;
    tracing::info!(
        env = %model.environment,
        episodes = model.episodes_trained,
        timesteps = model.timesteps_trained,
        visited = model.table.visited_states(),
        "training run finished"
    );
    Ok(TrainingReport {
        model,
        path,
        resumed,
        stats,
    })
}

// === Mountain car ===

pub fn mountain_car_encoder(config: &MountainCarConfig) -> CarEncoder {
    CarEncoder::new(config.position_bins, config.velocity_bins)
}

/// Trains the mountain car agent for `episodes` episodes.
///
/// # Errors
///
/// Returns an error if an existing model cannot be read or the result cannot
/// be saved.
pub fn train_mountain_car<R: Rng>(
    config: &MountainCarConfig,
    data_dir: &Path,
    episodes: usize,
    rng: &mut R,
    on_update: &mut dyn FnMut(TrainingUpdate),
) -> Result<TrainingReport, ModelError> {
    let encoder = mountain_car_encoder(config);
    let path = model_path(data_dir, MOUNTAIN_CAR_MODEL);
    let (model, resumed) = resume_or_new(&path, ENV_MOUNTAIN_CAR, encoder.n_states(), Push::COUNT)?;

    let epsilon = EpsilonSchedule::linear(
        config.epsilon_start,
        config.epsilon_min,
        decay_steps(episodes, config.exploration_fraction),
    );
    let mut learner = learner_for(
        model.table.clone(),
        epsilon,
        config.learning_rate,
        config.discount,
    );
    let mut env = MountainCar::new(config.max_steps);
    tracing::info!(episodes, resumed, "training mountain car");

    let stats = train_episodes(&mut env, &encoder, &mut learner, episodes, rng, on_update);
    finish(model, learner, stats, path, resumed)
}

/// # Errors
///
/// Returns an error if the model file exists but cannot be used.
pub fn load_mountain_car(
    config: &MountainCarConfig,
    data_dir: &Path,
) -> Result<Option<SavedModel>, ModelError> {
    let encoder = mountain_car_encoder(config);
    SavedModel::load_if_exists(
        &model_path(data_dir, MOUNTAIN_CAR_MODEL),
        ENV_MOUNTAIN_CAR,
        encoder.n_states(),
        Push::COUNT,
    )
}

/// Greedy evaluation of a saved mountain car model at the standard step
/// limit.
pub fn evaluate_mountain_car<R: Rng>(
    config: &MountainCarConfig,
    model: &SavedModel,
    episodes: usize,
    rng: &mut R,
) -> EvaluationReport {
    let encoder = mountain_car_encoder(config);
    let mut env = MountainCar::default();
    evaluate(&mut env, &encoder, &model.table, episodes, rng)
}

// === Frozen lake ===

pub fn frozen_lake_model_path(data_dir: &Path, spec: MapSpec) -> PathBuf {
    model_path(
        data_dir,
        &format!("{FROZEN_LAKE_MODEL_PREFIX}_{}.json", spec.slug()),
    )
}

/// Side length of the lake a map spec produces.
fn lake_states(spec: MapSpec) -> usize {
    let side = match spec {
        MapSpec::Preset4x4 => 4,
        MapSpec::Preset8x8 => 8,
        MapSpec::Random { size } => size,
    };
    side * side
}

/// Lake layout stored with a model, if any. The layout must have one tile
/// per table row.
fn stored_layout(model: &SavedModel, path: &Path) -> Result<Option<LakeMap>, ModelError> {
    let Some(layout) = model.variant.as_deref() else {
        return Ok(None);
    };
    let layout_err = |source| ModelError::Layout {
        path: path.to_path_buf(),
        source,
    };
    let map = LakeMap::from_layout(layout).map_err(layout_err)?;
    if map.n_states() != model.table.n_states() {
        return Err(layout_err(ConfigError::InvalidMap(format!(
            "{} tiles for a table of {} states",
            map.n_states(),
            model.table.n_states()
        ))));
    }
    Ok(Some(map))
}

/// Trains the frozen lake agent on the map selected by `spec`.
///
/// Random maps are generated once and stored with the model, so later runs
/// keep training on the same lake.
///
/// # Errors
///
/// Returns an error if an existing model cannot be read or the result cannot
/// be saved.
pub fn train_frozen_lake<R: Rng>(
    config: &FrozenLakeConfig,
    data_dir: &Path,
    spec: MapSpec,
    slippery: bool,
    episodes: usize,
    rng: &mut R,
    on_update: &mut dyn FnMut(TrainingUpdate),
) -> Result<TrainingReport, ModelError> {
    let path = frozen_lake_model_path(data_dir, spec);
    let n_states = lake_states(spec);
    let (model, resumed) = resume_or_new(&path, ENV_FROZEN_LAKE, n_states, Move::COUNT)?;

    let map = match stored_layout(&model, &path)? {
        Some(map) => map,
        None => spec.build(config.frozen_probability, rng),
    };
    let model = model.with_variant(map.layout());

    let epsilon = EpsilonSchedule::linear(
        config.epsilon_start,
        config.epsilon_min,
        decay_steps(episodes, config.exploration_fraction),
    );
    let mut learner = Learner::new(
        model.table.clone(),
        epsilon,
        LearningRates {
            alpha: config.learning_rate,
            gamma: config.discount,
            settle_alpha: config.settle_learning_rate,
        },
    );
    let encoder = LakeEncoder {
        tiles: map.n_states(),
    };
    tracing::info!(episodes, resumed, slippery, layout = %map.layout(), "training frozen lake");
    let mut env = FrozenLake::new(map, slippery);

    let stats = train_episodes(&mut env, &encoder, &mut learner, episodes, rng, on_update);
    finish(model, learner, stats, path, resumed)
}

/// Loads a frozen lake model together with the lake it was trained on.
///
/// # Errors
///
/// Returns an error if the model file exists but cannot be used.
pub fn load_frozen_lake<R: Rng>(
    config: &FrozenLakeConfig,
    data_dir: &Path,
    spec: MapSpec,
    rng: &mut R,
) -> Result<Option<(LakeMap, SavedModel)>, ModelError> {
    let path = frozen_lake_model_path(data_dir, spec);
    let Some(model) =
        SavedModel::load_if_exists(&path, ENV_FROZEN_LAKE, lake_states(spec), Move::COUNT)?
    else {
        return Ok(None);
    };
    let map = match stored_layout(&model, &path)? {
        Some(map) => map,
        None => spec.build(config.frozen_probability, rng),
    };
    Ok(Some((map, model)))
}

/// Greedy evaluation of a frozen lake model.
pub fn evaluate_frozen_lake<R: Rng>(
    map: &LakeMap,
    model: &SavedModel,
    slippery: bool,
    episodes: usize,
    rng: &mut R,
) -> EvaluationReport {
    let encoder = LakeEncoder {
        tiles: map.n_states(),
    };
    let mut env = FrozenLake::new(map.clone(), slippery);
    evaluate(&mut env, &encoder, &model.table, episodes, rng)
}

// === Air hockey ===

/// Trains the air hockey agent against the scripted bot.
///
/// # Errors
///
/// Returns an error if an existing model cannot be read or the result cannot
/// be saved.
pub fn train_air_hockey<R: Rng>(
    config: &AirHockeyConfig,
    data_dir: &Path,
    timesteps: usize,
    rng: &mut R,
    on_update: &mut dyn FnMut(TrainingUpdate),
) -> Result<TrainingReport, ModelError> {
    let encoder = RinkEncoder::default();
    let path = model_path(data_dir, AIR_HOCKEY_MODEL);
    let (model, resumed) = resume_or_new(&path, ENV_AIR_HOCKEY, encoder.n_states(), Nudge::COUNT)?;

    let epsilon = EpsilonSchedule::linear(
        config.epsilon_start,
        config.epsilon_min,
        decay_steps(timesteps, config.exploration_fraction),
    );
    let mut learner = learner_for(
        model.table.clone(),
        epsilon,
        config.learning_rate,
        config.discount,
    );
    let mut env = AirHockey::new(Opponent::Bot);
    tracing::info!(timesteps, resumed, "training air hockey");

    let stats = train_timesteps(&mut env, &encoder, &mut learner, timesteps, rng, on_update);
    finish(model, learner, stats, path, resumed)
}

/// # Errors
///
/// Returns an error if the model file exists but cannot be used.
pub fn load_air_hockey(data_dir: &Path) -> Result<Option<SavedModel>, ModelError> {
    SavedModel::load_if_exists(
        &model_path(data_dir, AIR_HOCKEY_MODEL),
        ENV_AIR_HOCKEY,
        RinkEncoder::default().n_states(),
        Nudge::COUNT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn temp_data_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rl-arcade-session-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn still_lake_config() -> FrozenLakeConfig {
        FrozenLakeConfig {
            map: "4x4".to_string(),
            slippery: false,
            episodes: 2000,
            exploration_fraction: 0.75,
            settle_learning_rate: None,
            ..FrozenLakeConfig::default()
        }
    }

    #[test]
    fn test_decay_steps() {
        assert_eq!(decay_steps(1000, 0.5), 500);
        assert_eq!(decay_steps(1000, 2.0), 1000);
        assert_eq!(decay_steps(10, -1.0), 0);
    }

    #[test]
    fn test_frozen_lake_run_saves_and_resumes() {
        let dir = temp_data_dir("lake");
        let config = still_lake_config();
        let mut rng = StdRng::seed_from_u64(4);
        let mut updates = 0;

        let first = train_frozen_lake(
            &config,
            &dir,
            MapSpec::Preset4x4,
            false,
            config.episodes,
            &mut rng,
            &mut |_| updates += 1,
        )
        .unwrap();
        assert!(!first.resumed);
        assert!(first.path.ends_with("frozen_lake_4x4.json"));
        assert!(first.path.exists());
        assert!(updates > 0);
        assert_eq!(first.model.episodes_trained, 2000);
        assert_eq!(first.model.variant.as_deref(), Some("SFFF/FHFH/FFFH/HFFG"));

        let second = train_frozen_lake(
            &config,
            &dir,
            MapSpec::Preset4x4,
            false,
            100,
            &mut rng,
            &mut |_| {},
        )
        .unwrap();
        assert!(second.resumed);
        assert_eq!(second.model.episodes_trained, 2100);

        let (map, model) = load_frozen_lake(&config, &dir, MapSpec::Preset4x4, &mut rng)
            .unwrap()
            .unwrap();
        let report = evaluate_frozen_lake(&map, &model, false, 10, &mut rng);
        assert_eq!(report.successes, 10);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_random_lake_is_reloaded_from_model() {
        let dir = temp_data_dir("random");
        let config = still_lake_config();
        let spec = MapSpec::Random { size: 5 };
        let mut rng = StdRng::seed_from_u64(8);

        let report =
            train_frozen_lake(&config, &dir, spec, false, 50, &mut rng, &mut |_| {}).unwrap();
        let (map, _) = load_frozen_lake(&config, &dir, spec, &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(Some(map.layout()), report.model.variant);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_layout_must_match_table() {
        let dir = temp_data_dir("lake-mismatch");
        let config = still_lake_config();
        let mut rng = StdRng::seed_from_u64(4);
        let big_lake = MapSpec::Preset8x8.build(config.frozen_probability, &mut rng);
        SavedModel::new(ENV_FROZEN_LAKE, QTable::new(16, Move::COUNT))
            .with_variant(big_lake.layout())
            .save(&frozen_lake_model_path(&dir, MapSpec::Preset4x4))
            .unwrap();

        let err = load_frozen_lake(&config, &dir, MapSpec::Preset4x4, &mut rng).unwrap_err();
        assert!(matches!(err, ModelError::Layout { .. }));

        let err = train_frozen_lake(
            &config,
            &dir,
            MapSpec::Preset4x4,
            false,
            10,
            &mut rng,
            &mut |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Layout { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_models_load_as_none() {
        let dir = temp_data_dir("missing");
        let mut rng = StdRng::seed_from_u64(0);
        assert!(load_air_hockey(&dir).unwrap().is_none());
        assert!(load_mountain_car(&MountainCarConfig::default(), &dir)
            .unwrap()
            .is_none());
        assert!(load_frozen_lake(
            &FrozenLakeConfig::default(),
            &dir,
            MapSpec::Preset8x8,
            &mut rng
        )
        .unwrap()
        .is_none());
    }

    #[test]
    fn test_short_air_hockey_run_saves_model() {
        let dir = temp_data_dir("hockey");
        let mut rng = StdRng::seed_from_u64(2);
        let report = train_air_hockey(
            &AirHockeyConfig::default(),
            &dir,
            500,
            &mut rng,
            &mut |_| {},
        )
        .unwrap();
        assert_eq!(report.stats.timesteps(), 500);
        assert_eq!(report.model.timesteps_trained, 500);
        assert!(load_air_hockey(&dir).unwrap().is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
