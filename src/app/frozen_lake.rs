//! Frozen lake replay scene.

use super::replay::{Narrate, Replay};
use crate::agent::discretize::LakeEncoder;
use crate::constants::{MSG_FELL_IN_HOLE, MSG_LAKE_TIMED_OUT, MSG_REACHED_GOAL};
use crate::core::telemetry::EpisodeSummary;
use crate::env::frozen_lake::FrozenLake;
use crate::env::Step;
use crate::state::ToastType;

pub type LakeReplay = Replay<FrozenLake, LakeEncoder>;

impl Narrate for FrozenLake {
    fn narrate(&self, last: &Step<usize>, summary: &EpisodeSummary) -> (String, ToastType) {
        if summary.success {
            (MSG_REACHED_GOAL.to_string(), ToastType::Success)
        } else if last.terminated {
            (MSG_FELL_IN_HOLE.to_string(), ToastType::Error)
        } else {
            (MSG_LAKE_TIMED_OUT.to_string(), ToastType::Warning)
        }
    }
}

impl LakeReplay {
    /// True when the last move slid away from the one the agent chose.
    pub fn slipped(&self) -> bool {
        matches!(
            (self.last_action(), self.env().last_move()),
            (Some(chosen), Some(taken)) if chosen != taken
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::frozen_lake::LakeMap;

    fn lake() -> FrozenLake {
        FrozenLake::new(LakeMap::from_layout("SFFF/FHFH/FFFH/HFFG").unwrap(), false)
    }

    fn ending(terminated: bool, success: bool) -> (String, ToastType) {
        let last = Step {
            observation: 5,
            reward: if success { 1.0 } else { 0.0 },
            terminated,
            truncated: !terminated,
        };
        let summary = EpisodeSummary {
            reward: last.reward,
            length: 3,
            success,
        };
        lake().narrate(&last, &summary)
    }

    #[test]
    fn test_endings_are_distinguished() {
        assert_eq!(ending(true, true).1, ToastType::Success);
        assert_eq!(ending(true, false).0, MSG_FELL_IN_HOLE);
        assert_eq!(ending(false, false).0, MSG_LAKE_TIMED_OUT);
    }
}
