//! Q-learning training and greedy evaluation loops.

use super::telemetry::{EpisodeSummary, TrainingStats, TrainingUpdate};
use crate::agent::{EpsilonSchedule, Learner, QTable, StateEncoder, Transition};
use crate::constants;
use crate::env::{DiscreteAction, Environment};
use rand::Rng;

/// When the exploration rate decays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayUnit {
    Episode,
    Timestep,
}

/// Runs one learning episode. `budget` caps the number of steps.
pub fn learn_episode<E, C, R>(
    env: &mut E,
    encoder: &C,
    learner: &mut Learner,
    decay: DecayUnit,
    budget: Option<usize>,
    rng: &mut R,
) -> EpisodeSummary
where
    E: Environment,
    C: StateEncoder<E::Observation>,
    R: Rng,
{
    let mut state = encoder.encode(&env.reset(rng));
    let mut reward = 0.0;
    let mut length = 0;
    let mut success = false;

    loop {
        let action = learner.act(state, rng);
        let step = env.step(E::Action::from_index(action), rng);
        let next_state = encoder.encode(&step.observation);

        learner.learn(Transition {
            state,
            action,
            reward: step.reward,
            next_state,
            terminal: step.terminated,
        });
        if decay == DecayUnit::Timestep {
            learner.epsilon.advance();
        }

        state = next_state;
        reward += step.reward;
        length += 1;

        if step.done() {
            success = E::is_success(&step);
            break;
        }
        if budget.is_some_and(|b| length >= b) {
            break;
        }
    }

    if decay == DecayUnit::Episode {
        learner.epsilon.advance();
    }

    EpisodeSummary {
        reward,
        length,
        success,
    }
}

/// Trains for a fixed number of episodes.
pub fn train_episodes<E, C, R>(
    env: &mut E,
    encoder: &C,
    learner: &mut Learner,
    episodes: usize,
    rng: &mut R,
    on_update: &mut dyn FnMut(TrainingUpdate),
) -> TrainingStats
where
    E: Environment,
    C: StateEncoder<E::Observation>,
    R: Rng,
{
    let mut stats = TrainingStats::new(constants::STATS_WINDOW);
    let report_every = (episodes / 10).clamp(1, constants::PROGRESS_EVERY_EPISODES);

    for episode in 1..=episodes {
        let summary = learn_episode(env, encoder, learner, DecayUnit::Episode, None, rng);
        stats.record(summary);

        if episode % report_every == 0 || episode == episodes {
            let update = stats.progress(learner.epsilon.value());
            tracing::debug!(?update, "training progress");
            on_update(update);
        }
    }

    on_update(TrainingUpdate::Finished {
        episodes: stats.episodes(),
        timesteps: stats.timesteps(),
    });
    stats
}

/// Trains until `timesteps` environment steps have been taken.
pub fn train_timesteps<E, C, R>(
    env: &mut E,
    encoder: &C,
    learner: &mut Learner,
    timesteps: usize,
    rng: &mut R,
    on_update: &mut dyn FnMut(TrainingUpdate),
) -> TrainingStats
where
    E: Environment,
    C: StateEncoder<E::Observation>,
    R: Rng,
{
    let mut stats = TrainingStats::new(constants::STATS_WINDOW);
    let report_every = (timesteps / 10).clamp(1, constants::PROGRESS_EVERY_TIMESTEPS);
    let mut next_report = report_every;

    while stats.timesteps() < timesteps {
        let budget = timesteps - stats.timesteps();
        let summary = learn_episode(env, encoder, learner, DecayUnit::Timestep, Some(budget), rng);
        stats.record(summary);

        if stats.timesteps() >= next_report || stats.timesteps() >= timesteps {
            let update = stats.progress(learner.epsilon.value());
            tracing::debug!(?update, "training progress");
            on_update(update);
            while next_report <= stats.timesteps() {
                next_report += report_every;
            }
        }
    }

    on_update(TrainingUpdate::Finished {
        episodes: stats.episodes(),
        timesteps: stats.timesteps(),
    });
    stats
}

/// Greedy evaluation results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    pub episodes: usize,
    pub successes: usize,
    pub mean_reward: f64,
    pub mean_length: f64,
}

impl EvaluationReport {
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }
}

/// Plays `episodes` greedy episodes without learning.
pub fn evaluate<E, C, R>(
    env: &mut E,
    encoder: &C,
    table: &QTable,
    episodes: usize,
    rng: &mut R,
) -> EvaluationReport
where
    E: Environment,
    C: StateEncoder<E::Observation>,
    R: Rng,
{
    let policy = EpsilonSchedule::greedy();
    let mut stats = TrainingStats::new(episodes.max(1));

    for _ in 0..episodes {
        let mut state = encoder.encode(&env.reset(rng));
        let mut reward = 0.0;
        let mut length = 0;
        loop {
            let action = policy.select(table, state, rng);
            let step = env.step(E::Action::from_index(action), rng);
            state = encoder.encode(&step.observation);
            reward += step.reward;
            length += 1;
            if step.done() {
                stats.record(EpisodeSummary {
                    reward,
                    length,
                    success: E::is_success(&step),
                });
                break;
            }
        }
    }

    EvaluationReport {
        episodes,
        successes: stats.successes(),
        mean_reward: stats.mean_reward(),
        mean_length: stats.mean_length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::discretize::{CarEncoder, LakeEncoder, RinkEncoder};
    use crate::agent::LearningRates;
    use crate::env::air_hockey::{AirHockey, Nudge, Opponent};
    use crate::env::frozen_lake::{FrozenLake, MapSpec, Move};
    use crate::env::mountain_car::{MountainCar, Push};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn learner(n_states: usize, n_actions: usize, decay_steps: usize) -> Learner {
        Learner::new(
            QTable::new(n_states, n_actions),
            EpsilonSchedule::linear(1.0, 0.0, decay_steps),
            LearningRates {
                alpha: 0.9,
                gamma: 0.9,
                settle_alpha: None,
            },
        )
    }

    #[test]
    fn test_deterministic_lake_is_learned() {
        let mut rng = StdRng::seed_from_u64(17);
        let map = MapSpec::Preset4x4.build(0.8, &mut rng);
        let mut env = FrozenLake::new(map, false);
        let encoder = LakeEncoder { tiles: 16 };
        let mut learner = learner(16, Move::COUNT, 1500);

        let mut updates = Vec::new();
        let stats = train_episodes(&mut env, &encoder, &mut learner, 2000, &mut rng, &mut |u| {
            updates.push(u);
        });
        assert_eq!(stats.episodes(), 2000);
        assert!(matches!(
            updates.last(),
            Some(TrainingUpdate::Finished { episodes: 2000, .. })
        ));

        let report = evaluate(&mut env, &encoder, &learner.table, 10, &mut rng);
        assert_eq!(report.successes, 10);
        assert!((report.success_rate() - 1.0).abs() < 1e-12);
        assert!((report.mean_length - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_episode_decay_advances_once_per_episode() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut env = MountainCar::new(50);
        let encoder = CarEncoder::new(10, 10);
        let mut learner = learner(100, Push::COUNT, 4);
        let summary = learn_episode(
            &mut env,
            &encoder,
            &mut learner,
            DecayUnit::Episode,
            None,
            &mut rng,
        );
        assert_eq!(summary.length, 50);
        assert!((summary.reward + 50.0).abs() < 1e-12);
        assert!((learner.epsilon.value() - 0.75).abs() < 1e-12);
        assert!(learner.table.visited_states() > 0);
    }

    #[test]
    fn test_timestep_budget_is_respected() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut env = AirHockey::new(Opponent::Bot);
        let encoder = RinkEncoder::default();
        let mut learner = learner(encoder.n_states(), Nudge::COUNT, 500);

        let stats = train_timesteps(&mut env, &encoder, &mut learner, 2500, &mut rng, &mut |_| {});
        assert_eq!(stats.timesteps(), 2500);
        assert!(learner.epsilon.is_settled());
    }

    #[test]
    fn test_untrained_car_fails_evaluation() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut env = MountainCar::new(200);
        let encoder = CarEncoder::new(20, 20);
        let table = QTable::new(encoder.n_states(), Push::COUNT);

        // An all-zero table always pushes left.
        let report = evaluate(&mut env, &encoder, &table, 3, &mut rng);
        assert_eq!(report.episodes, 3);
        assert_eq!(report.successes, 0);
        assert!((report.mean_length - 200.0).abs() < 1e-12);
    }
}
