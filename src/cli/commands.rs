//! Subcommand handlers.
//!
//! Training and evaluation print to stdout; replays and play mode hand the
//! terminal over to the viewer.

use super::args::{Commands, HockeyMode};
use super::menu;
use crate::agent::discretize::LakeEncoder;
use crate::agent::model::model_path;
use crate::app::{App, CarReplay, HockeyMatch, LakeReplay, Scene};
use crate::config::AppConfig;
use crate::constants::{
    AIR_HOCKEY_MODEL, CLI_MSG_EVAL_HEADER, CLI_MSG_INVALID_MODE, CLI_MSG_LOADED_MODEL,
    CLI_MSG_MODEL_SAVED, CLI_MSG_NEW_MODEL, CLI_MSG_NO_MODEL, CLI_MSG_PLAY_HINT,
    CLI_MSG_PLAY_START, CLI_MSG_TRAIN_START, DEFAULT_REPLAY_EPISODES, ENV_AIR_HOCKEY,
    ENV_FROZEN_LAKE, ENV_MOUNTAIN_CAR, MOUNTAIN_CAR_MODEL,
};
use crate::core::session::{self, TrainingReport};
use crate::core::telemetry::TrainingUpdate;
use crate::core::trainer::EvaluationReport;
use crate::env::frozen_lake::{FrozenLake, MapSpec};
use crate::env::mountain_car::{MountainCar, DEFAULT_MAX_STEPS};
use color_eyre::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::PathBuf;

/// Everything a handler needs besides its own flags.
pub struct Context {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Context {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Dispatch a parsed subcommand.
///
/// # Errors
///
/// Returns an error if a model cannot be read or written, the configuration
/// names an unknown map, or the terminal viewer fails.
pub fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::MountainCar {
            train,
            render,
            episodes,
        } => mountain_car(ctx, train, render, episodes),
        Commands::FrozenLake {
            map,
            size,
            not_slippery,
            episodes,
            evaluate,
            render,
        } => {
            let lake = &ctx.config.frozen_lake;
            let spec = MapSpec::parse(
                map.as_deref().unwrap_or(&lake.map),
                size.unwrap_or(lake.random_size),
            )?;
            let slippery = lake.slippery && !not_slippery;
            frozen_lake(ctx, spec, slippery, episodes, evaluate, render)
        }
        Commands::AirHockey { mode, timesteps } => {
            let mode = match mode {
                Some(mode) => Some(mode),
                None => menu::prompt_mode(&mut io::stdin().lock(), &mut io::stdout())?,
            };
            match mode {
                Some(HockeyMode::Train) => train_air_hockey(ctx, timesteps),
                Some(HockeyMode::Play) => play_air_hockey(ctx),
                None => {
                    println!("{CLI_MSG_INVALID_MODE}");
                    Ok(())
                }
            }
        }
    }
}

// === Output ===

fn print_progress(update: TrainingUpdate) {
    match update {
        TrainingUpdate::Progress {
            episode,
            timesteps,
            epsilon,
            mean_reward,
            mean_length,
            success_rate,
        } => println!(
            "  episode {episode:>7} | steps {timesteps:>9} | epsilon {epsilon:.3} | \
             reward {mean_reward:>8.2} | length {mean_length:>7.1} | solved {:>5.1}%",
            success_rate * 100.0
        ),
        TrainingUpdate::Finished {
            episodes,
            timesteps,
        } => println!("  finished {episodes} episodes ({timesteps} steps)"),
    }
}

fn print_training_start(name: &str, resumed: bool) {
    println!("{CLI_MSG_TRAIN_START} ({name})");
    if resumed {
        println!("{CLI_MSG_LOADED_MODEL}");
    } else {
        println!("{CLI_MSG_NEW_MODEL}");
    }
}

fn print_saved(report: &TrainingReport) {
    println!("{CLI_MSG_MODEL_SAVED}{}", report.path.display());
    println!(
        "  {} episodes / {} steps trained in total",
        report.model.episodes_trained, report.model.timesteps_trained
    );
}

/// Summary lines for an evaluation run capped at `step_limit` steps per
/// episode.
fn evaluation_lines(report: &EvaluationReport, step_limit: usize) -> Vec<String> {
    vec![
        CLI_MSG_EVAL_HEADER.to_string(),
        format!("  Episodes:     {}", report.episodes),
        format!("  Step limit:   {step_limit}"),
        format!(
            "  Solved:       {} ({:.1}%)",
            report.successes,
            report.success_rate() * 100.0
        ),
        format!("  Mean reward:  {:.3}", report.mean_reward),
        format!("  Mean length:  {:.1}", report.mean_length),
    ]
}

fn print_evaluation(report: &EvaluationReport, step_limit: usize) {
    for line in evaluation_lines(report, step_limit) {
        println!("{line}");
    }
}

// === Mountain car ===

fn mountain_car(ctx: &Context, train: bool, render: bool, episodes: Option<usize>) -> Result<()> {
    let config = &ctx.config.mountain_car;
    let mut rng = ctx.rng();

    if train {
        let episodes = episodes.unwrap_or(config.episodes);
        let path = model_path(&ctx.data_dir, MOUNTAIN_CAR_MODEL);
        print_training_start(ENV_MOUNTAIN_CAR, path.exists());
        let report = session::train_mountain_car(
            config,
            &ctx.data_dir,
            episodes,
            &mut rng,
            &mut print_progress,
        )?;
        print_saved(&report);
        let evaluation =
            session::evaluate_mountain_car(config, &report.model, config.eval_episodes, &mut rng);
        print_evaluation(&evaluation, DEFAULT_MAX_STEPS);
    }

    let Some(model) = session::load_mountain_car(config, &ctx.data_dir)? else {
        println!("{CLI_MSG_NO_MODEL}");
        return Ok(());
    };

    if render {
        let replays = if train {
            DEFAULT_REPLAY_EPISODES
        } else {
            episodes.unwrap_or(DEFAULT_REPLAY_EPISODES)
        };
        let replay = CarReplay::new(
            MountainCar::default(),
            session::mountain_car_encoder(config),
            model.table,
            replays,
            &mut rng,
        );
        return App::new(Scene::MountainCar(replay), rng).run();
    }

    if !train {
        let episodes = episodes.unwrap_or(config.eval_episodes);
        let report = session::evaluate_mountain_car(config, &model, episodes, &mut rng);
        print_evaluation(&report, DEFAULT_MAX_STEPS);
    }
    Ok(())
}

// === Frozen lake ===

fn frozen_lake(
    ctx: &Context,
    spec: MapSpec,
    slippery: bool,
    episodes: Option<usize>,
    evaluate: bool,
    render: bool,
) -> Result<()> {
    let config = &ctx.config.frozen_lake;
    let mut rng = ctx.rng();

    if !evaluate && !render {
        let path = session::frozen_lake_model_path(&ctx.data_dir, spec);
        print_training_start(
            &format!("{ENV_FROZEN_LAKE} {}", spec.slug()),
            path.exists(),
        );
        let report = session::train_frozen_lake(
            config,
            &ctx.data_dir,
            spec,
            slippery,
            episodes.unwrap_or(config.episodes),
            &mut rng,
            &mut print_progress,
        )?;
        print_saved(&report);
    }

    let Some((map, model)) = session::load_frozen_lake(config, &ctx.data_dir, spec, &mut rng)?
    else {
        println!("{CLI_MSG_NO_MODEL}");
        return Ok(());
    };

    if !render || evaluate {
        let count = if evaluate {
            episodes.unwrap_or(config.eval_episodes)
        } else {
            config.eval_episodes
        };
        let report = session::evaluate_frozen_lake(&map, &model, slippery, count, &mut rng);
        print_evaluation(&report, map.default_max_steps());
    }

    if render {
        let replays = if evaluate {
            DEFAULT_REPLAY_EPISODES
        } else {
            episodes.unwrap_or(DEFAULT_REPLAY_EPISODES)
        };
        let encoder = LakeEncoder {
            tiles: map.n_states(),
        };
        let replay = LakeReplay::new(
            FrozenLake::new(map, slippery),
            encoder,
            model.table,
            replays,
            &mut rng,
        );
        return App::new(Scene::FrozenLake(replay), rng).run();
    }
    Ok(())
}

// === Air hockey ===

fn train_air_hockey(ctx: &Context, timesteps: Option<usize>) -> Result<()> {
    let config = &ctx.config.air_hockey;
    let mut rng = ctx.rng();
    let timesteps = timesteps.unwrap_or(config.timesteps);

    let path = model_path(&ctx.data_dir, AIR_HOCKEY_MODEL);
    print_training_start(ENV_AIR_HOCKEY, path.exists());
    let report = session::train_air_hockey(
        config,
        &ctx.data_dir,
        timesteps,
        &mut rng,
        &mut print_progress,
    )?;
    print_saved(&report);
    Ok(())
}

fn play_air_hockey(ctx: &Context) -> Result<()> {
    let Some(model) = session::load_air_hockey(&ctx.data_dir)? else {
        println!("{CLI_MSG_NO_MODEL}");
        return Ok(());
    };

    println!("{CLI_MSG_PLAY_START}");
    println!("{CLI_MSG_PLAY_HINT}");
    let mut rng = ctx.rng();
    let game = HockeyMatch::new(model.table, &mut rng);
    App::new(Scene::AirHockey(game), rng).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_summary_names_step_limit() {
        let report = EvaluationReport {
            episodes: 100,
            successes: 77,
            mean_reward: -150.25,
            mean_length: 150.25,
        };
        let lines = evaluation_lines(&report, DEFAULT_MAX_STEPS);
        assert_eq!(lines[0], CLI_MSG_EVAL_HEADER);
        assert!(lines.contains(&"  Step limit:   200".to_string()));
        assert!(lines.contains(&"  Solved:       77 (77.0%)".to_string()));
    }
}
