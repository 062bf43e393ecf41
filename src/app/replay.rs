//! Greedy replays of a trained agent.

use crate::agent::{QTable, StateEncoder};
use crate::constants::{EPISODE_TOAST_MS, MSG_REPLAY_DONE};
use crate::core::telemetry::EpisodeSummary;
use crate::env::{DiscreteAction, Environment, Step};
use crate::state::{Toast, ToastType};
use rand::Rng;
use std::time::{Duration, Instant};

/// Environments that can describe how an episode ended.
pub trait Narrate: Environment {
    fn narrate(&self, last: &Step<Self::Observation>, summary: &EpisodeSummary)
        -> (String, ToastType);
}

/// Plays a fixed number of greedy episodes one step at a time.
pub struct Replay<E: Environment, C> {
    env: E,
    encoder: C,
    table: QTable,
    episodes: usize,
    episode: usize,
    observation: E::Observation,
    steps: usize,
    reward: f64,
    last_action: Option<E::Action>,
    results: Vec<EpisodeSummary>,
    /// Pause between episodes while the result toast is up.
    hold_until: Option<Instant>,
    finished: bool,
}

impl<E, C> Replay<E, C>
where
    E: Narrate,
    C: StateEncoder<E::Observation>,
{
    pub fn new<R: Rng>(mut env: E, encoder: C, table: QTable, episodes: usize, rng: &mut R) -> Self {
        let observation = env.reset(rng);
        Self {
            env,
            encoder,
            table,
            episodes: episodes.max(1),
            episode: 1,
            observation,
            steps: 0,
            reward: 0.0,
            last_action: None,
            results: Vec::new(),
            hold_until: None,
            finished: false,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// 1-based number of the episode on screen.
    pub fn episode(&self) -> usize {
        self.episode
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn last_action(&self) -> Option<E::Action> {
        self.last_action
    }

    pub fn results(&self) -> &[EpisodeSummary] {
        &self.results
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn begin_episode<R: Rng>(&mut self, rng: &mut R) {
        self.episode += 1;
        self.observation = self.env.reset(rng);
        self.steps = 0;
        self.reward = 0.0;
        self.last_action = None;
    }

    /// Takes one greedy step. Returns a toast when an episode ends.
    pub fn advance<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Option<Toast> {
        if self.finished {
            return None;
        }
        if let Some(until) = self.hold_until {
            if now < until {
                return None;
            }
            self.hold_until = None;
            self.begin_episode(rng);
        }

        let state = self.encoder.encode(&self.observation);
        let action = E::Action::from_index(self.table.best_action(state));
        let step = self.env.step(action, rng);
        self.last_action = Some(action);
        self.steps += 1;
        self.reward += step.reward;
        self.observation = step.observation.clone();

        if !step.done() {
            return None;
        }

        let summary = EpisodeSummary {
            reward: self.reward,
            length: self.steps,
            success: E::is_success(&step),
        };
        self.results.push(summary);
        let (message, kind) = self.env.narrate(&step, &summary);
        tracing::debug!(
            episode = self.episode,
            reward = summary.reward,
            length = summary.length,
            success = summary.success,
            "replay episode finished"
        );

        if self.episode >= self.episodes {
            self.finished = true;
            return Some(Toast::sticky(format!("{message}\n\n{MSG_REPLAY_DONE}"), kind));
        }
        let shown = Duration::from_millis(EPISODE_TOAST_MS);
        self.hold_until = Some(now + shown);
        Some(Toast::timed(message, kind, shown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::discretize::LakeEncoder;
    use crate::env::frozen_lake::{FrozenLake, LakeMap, Move};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Table that walks the known safe path on the 4x4 preset.
    fn solved_table() -> QTable {
        let mut table = QTable::new(16, 4);
        let policy = [
            (0, Move::Down),
            (4, Move::Down),
            (8, Move::Right),
            (9, Move::Right),
            (10, Move::Down),
            (14, Move::Right),
        ];
        for (state, mv) in policy {
            table.update(
                crate::agent::Transition {
                    state,
                    action: mv.index(),
                    reward: 1.0,
                    next_state: state,
                    terminal: true,
                },
                1.0,
                0.0,
            );
        }
        table
    }

    fn replay(episodes: usize) -> (Replay<FrozenLake, LakeEncoder>, StdRng) {
        let mut rng = StdRng::seed_from_u64(3);
        let map = LakeMap::from_layout("SFFF/FHFH/FFFH/HFFG").unwrap();
        let replay = Replay::new(
            FrozenLake::new(map, false),
            LakeEncoder { tiles: 16 },
            solved_table(),
            episodes,
            &mut rng,
        );
        (replay, rng)
    }

    #[test]
    fn test_episode_ends_with_timed_toast_and_holds() {
        let (mut replay, mut rng) = replay(2);
        let now = Instant::now();
        let mut toast = None;
        for _ in 0..6 {
            toast = replay.advance(now, &mut rng);
        }
        let toast = toast.unwrap();
        assert_eq!(toast.toast_type, ToastType::Success);
        assert!(toast.expires_at.is_some());
        assert_eq!(replay.results().len(), 1);
        assert!(replay.results()[0].success);

        // Held while the toast is up.
        assert!(replay.advance(now, &mut rng).is_none());
        assert_eq!(replay.episode(), 1);

        let later = now + Duration::from_millis(EPISODE_TOAST_MS);
        replay.advance(later, &mut rng);
        assert_eq!(replay.episode(), 2);
        assert_eq!(replay.steps(), 1);
    }

    #[test]
    fn test_last_episode_leaves_sticky_toast() {
        let (mut replay, mut rng) = replay(1);
        let now = Instant::now();
        let mut last = None;
        while !replay.is_finished() {
            last = replay.advance(now, &mut rng);
        }
        let toast = last.unwrap();
        assert!(toast.expires_at.is_none());
        assert!(toast.message.contains(MSG_REPLAY_DONE));
        assert!(replay.advance(now, &mut rng).is_none());
    }
}
