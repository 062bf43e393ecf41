//! Tabular Q-learning.
//!
//! A [`QTable`] holds one value per discrete state and action. The
//! [`Learner`] couples a table with an epsilon-greedy exploration schedule
//! and the learning hyperparameters.

pub mod discretize;
pub mod model;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use discretize::StateEncoder;
pub use model::SavedModel;

/// Dense `n_states × n_actions` action-value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    n_states: usize,
    n_actions: usize,
    values: Vec<f64>,
}

impl QTable {
    /// Creates a zero-initialised table.
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            n_states,
            n_actions,
            values: vec![0.0; n_states * n_actions],
        }
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Whether the value buffer matches the declared shape. A shape too
    /// large to address is never consistent.
    pub fn is_consistent(&self) -> bool {
        self.n_states
            .checked_mul(self.n_actions)
            .is_some_and(|cells| cells == self.values.len())
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.n_actions;
        &self.values[start..start + self.n_actions]
    }

    pub fn value(&self, state: usize, action: usize) -> f64 {
        self.values[state * self.n_actions + action]
    }

    /// Largest action value in `state`.
    pub fn max_value(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action; ties go to the lowest index.
    pub fn best_action(&self, state: usize) -> usize {
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (action, &value) in self.row(state).iter().enumerate() {
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// One-step Q-learning backup.
    ///
    /// The bootstrap term is dropped when `terminal` is set; a time-limit
    /// cut-off is not terminal.
    pub fn update(&mut self, transition: Transition, alpha: f64, gamma: f64) {
        let future = if transition.terminal {
            0.0
        } else {
            self.max_value(transition.next_state)
        };
        let index = transition.state * self.n_actions + transition.action;
        let target = transition.reward + gamma * future;
        self.values[index] += alpha * (target - self.values[index]);
    }

    /// Number of states whose values have moved away from zero.
    pub fn visited_states(&self) -> usize {
        (0..self.n_states)
            .filter(|&s| self.row(s).iter().any(|v| *v != 0.0))
            .count()
    }
}

/// A single observed transition in table coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
    pub next_state: usize,
    pub terminal: bool,
}

/// Linearly decaying exploration rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonSchedule {
    value: f64,
    floor: f64,
    decrement: f64,
}

impl EpsilonSchedule {
    /// Decays from `start` to `floor` over `decay_steps` calls to
    /// [`EpsilonSchedule::advance`].
    pub fn linear(start: f64, floor: f64, decay_steps: usize) -> Self {
        let start = start.clamp(0.0, 1.0);
        let floor = floor.clamp(0.0, start);
        #[allow(clippy::cast_precision_loss)]
        let decrement = if decay_steps == 0 {
            start - floor
        } else {
            (start - floor) / decay_steps as f64
        };
        Self {
            value: start,
            floor,
            decrement,
        }
    }

    /// Always greedy.
    pub fn greedy() -> Self {
        Self::linear(0.0, 0.0, 0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// True once epsilon has reached its floor.
    pub fn is_settled(&self) -> bool {
        self.value <= self.floor
    }

    pub fn advance(&mut self) {
        self.value = (self.value - self.decrement).max(self.floor);
    }

    /// Picks a random action with probability epsilon, otherwise the greedy one.
    pub fn select<R: Rng>(&self, table: &QTable, state: usize, rng: &mut R) -> usize {
        if self.value > 0.0 && rng.random::<f64>() < self.value {
            rng.random_range(0..table.n_actions())
        } else {
            table.best_action(state)
        }
    }
}

/// Q-learning hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningRates {
    pub alpha: f64,
    pub gamma: f64,
    /// Replaces `alpha` once exploration has settled.
    pub settle_alpha: Option<f64>,
}

/// An exploring Q-learning agent.
#[derive(Debug, Clone)]
pub struct Learner {
    pub table: QTable,
    pub epsilon: EpsilonSchedule,
    pub rates: LearningRates,
}

impl Learner {
    pub fn new(table: QTable, epsilon: EpsilonSchedule, rates: LearningRates) -> Self {
        Self {
            table,
            epsilon,
            rates,
        }
    }

    pub fn act<R: Rng>(&self, state: usize, rng: &mut R) -> usize {
        self.epsilon.select(&self.table, state, rng)
    }

    /// Current learning rate.
    pub fn alpha(&self) -> f64 {
        match self.rates.settle_alpha {
            Some(settle) if self.epsilon.is_settled() => settle,
            _ => self.rates.alpha,
        }
    }

    pub fn learn(&mut self, transition: Transition) {
        let alpha = self.alpha();
        self.table.update(transition, alpha, self.rates.gamma);
    }
}
