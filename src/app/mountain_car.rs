//! Mountain car replay scene.

use super::replay::{Narrate, Replay};
use crate::agent::discretize::CarEncoder;
use crate::constants::{MSG_REACHED_FLAG, MSG_TIMED_OUT};
use crate::core::telemetry::EpisodeSummary;
use crate::env::mountain_car::{CarState, MountainCar};
use crate::env::Step;
use crate::state::ToastType;

pub type CarReplay = Replay<MountainCar, CarEncoder>;

impl Narrate for MountainCar {
    fn narrate(&self, _last: &Step<CarState>, summary: &EpisodeSummary) -> (String, ToastType) {
        let steps = summary.length.to_string();
        if summary.success {
            (MSG_REACHED_FLAG.replace("{}", &steps), ToastType::Success)
        } else {
            (MSG_TIMED_OUT.replace("{}", &steps), ToastType::Warning)
        }
    }
}
