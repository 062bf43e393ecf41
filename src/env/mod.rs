//! Simulated environments.
//!
//! Every environment follows the Gymnasium contract: `reset` starts an
//! episode and returns the first observation, `step` advances one tick and
//! reports the reward together with the `terminated` (natural end) and
//! `truncated` (time limit) flags.

pub mod air_hockey;
pub mod frozen_lake;
pub mod mountain_car;

use rand::Rng;

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}

impl<O> Step<O> {
    /// True when the episode is over for either reason.
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Action sets small enough to index a Q-table column.
pub trait DiscreteAction: Copy + Sized {
    /// Number of distinct actions.
    const COUNT: usize;

    fn index(self) -> usize;

    /// Inverse of [`DiscreteAction::index`]. Out-of-range indices wrap.
    fn from_index(index: usize) -> Self;
}

/// A reinforcement-learning environment.
///
/// Randomness is passed in so that seeded runs are reproducible.
pub trait Environment {
    type Observation: Clone;
    type Action: DiscreteAction;

    /// Starts a new episode.
    fn reset<R: Rng>(&mut self, rng: &mut R) -> Self::Observation;

    /// Advances the environment by one step.
    fn step<R: Rng>(&mut self, action: Self::Action, rng: &mut R) -> Step<Self::Observation>;

    /// Whether a finished episode counts as solved.
    fn is_success(step: &Step<Self::Observation>) -> bool {
        step.terminated
    }
}
