//! Training telemetry.
//!
//! Rolling statistics over the most recent episodes, and the progress
//! messages emitted by the training loops.

use std::collections::VecDeque;

/// Outcome of a single episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Undiscounted return.
    pub reward: f64,
    /// Steps taken, including the final one.
    pub length: usize,
    /// Whether the episode ended at the task's goal.
    pub success: bool,
}

/// Progress snapshot reported while training.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainingUpdate {
    /// Periodic report.
    Progress {
        /// Episodes completed so far.
        episode: usize,
        /// Environment steps taken so far.
        timesteps: usize,
        /// Exploration rate at the time of the report.
        epsilon: f64,
        /// Mean return over the rolling window.
        mean_reward: f64,
        /// Mean episode length over the rolling window.
        mean_length: f64,
        /// Share of successful episodes in the rolling window.
        success_rate: f64,
    },
    /// Training loop finished.
    Finished {
        episodes: usize,
        timesteps: usize,
    },
}

/// Rolling window of episode summaries.
///
/// Means and the success rate cover only the window. Episode, step and
/// success counts cover every episode recorded.
#[derive(Debug, Clone)]
pub struct TrainingStats {
    window: VecDeque<EpisodeSummary>,
    capacity: usize,
    episodes: usize,
    timesteps: usize,
    successes: usize,
}

impl TrainingStats {
    /// Creates empty statistics averaging over the last `capacity`
    /// episodes (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            episodes: 0,
            timesteps: 0,
            successes: 0,
        }
    }

    /// Adds a finished episode, evicting the oldest one from a full window.
    pub fn record(&mut self, summary: EpisodeSummary) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(summary);
        self.episodes += 1;
        self.timesteps += summary.length;
        if summary.success {
            self.successes += 1;
        }
    }

    /// Episodes recorded since creation.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Steps recorded since creation.
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    /// Successful episodes since creation.
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Mean return over the window, 0.0 when empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_reward(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().map(|s| s.reward).sum::<f64>() / self.window.len() as f64
    }

    /// Mean episode length over the window, 0.0 when empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_length(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().map(|s| s.length as f64).sum::<f64>() / self.window.len() as f64
    }

    /// Share of successful episodes in the window, 0.0-1.0.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().filter(|s| s.success).count() as f64 / self.window.len() as f64
    }

    /// Snapshot of the current statistics as a progress update.
    pub fn progress(&self, epsilon: f64) -> TrainingUpdate {
        TrainingUpdate::Progress {
            episode: self.episodes,
            timesteps: self.timesteps,
            epsilon,
            mean_reward: self.mean_reward(),
            mean_length: self.mean_length(),
            success_rate: self.success_rate(),
        }
    }
}
