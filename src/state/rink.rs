//! Human-vs-agent match state types.

use crate::env::air_hockey::Outcome;
use std::time::Instant;

/// Goals scored by each side since the window opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Goals scored by the human into the top goal.
    pub player: u32,
    /// Goals scored by the agent into the bottom goal.
    pub ai: u32,
    /// Matches cut off by the step limit.
    pub draws: u32,
}

impl Scoreboard {
    /// Credits a goal to whoever scored it.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::OpponentScored => self.player += 1,
            Outcome::AgentScored => self.ai += 1,
        }
    }
}

/// Match state machine.
///
/// `Playing` advances the physics every tick; `Celebrating` freezes the rink
/// while the goal banner is up, then the match resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPhase {
    /// Physics advances every tick.
    #[default]
    Playing,
    /// A goal banner is up.
    Celebrating {
        /// When play resumes.
        until: Instant,
        /// Who scored.
        outcome: Outcome,
    },
}

impl MatchPhase {
    /// Whether the puck is live.
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoreboard_attributes_goals() {
        let mut score = Scoreboard::default();
        score.record(Outcome::OpponentScored);
        score.record(Outcome::OpponentScored);
        score.record(Outcome::AgentScored);
        assert_eq!(score.player, 2);
        assert_eq!(score.ai, 1);
    }

    #[test]
    fn test_phase_default_is_playing() {
        assert!(MatchPhase::default().is_playing());
        let celebrating = MatchPhase::Celebrating {
            until: Instant::now(),
            outcome: Outcome::AgentScored,
        };
        assert!(!celebrating.is_playing());
    }
}
