//! The classic mountain car task.
//!
//! An underpowered car sits in a valley and must rock back and forth to build
//! enough momentum to reach the flag on the right hill.

use super::{DiscreteAction, Environment, Step};
use rand::Rng;

pub const MIN_POSITION: f64 = -1.2;
pub const MAX_POSITION: f64 = 0.6;
pub const MAX_SPEED: f64 = 0.07;
pub const GOAL_POSITION: f64 = 0.5;
const GOAL_VELOCITY: f64 = 0.0;

const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

/// Gymnasium's time limit for this task.
pub const DEFAULT_MAX_STEPS: usize = 200;

/// Car position and velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarState {
    pub position: f64,
    pub velocity: f64,
}

/// Push applied to the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    Left,
    None,
    Right,
}

impl Push {
    /// Direction of the applied force.
    fn direction(self) -> f64 {
        match self {
            Push::Left => -1.0,
            Push::None => 0.0,
            Push::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Push {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Push::Left => write!(f, "◀ push left"),
            Push::None => write!(f, "· coast"),
            Push::Right => write!(f, "push right ▶"),
        }
    }
}

impl DiscreteAction for Push {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Push::Left => 0,
            Push::None => 1,
            Push::Right => 2,
        }
    }

    fn from_index(index: usize) -> Self {
        match index % Self::COUNT {
            0 => Push::Left,
            1 => Push::None,
            _ => Push::Right,
        }
    }
}

/// Height of the track at `position`, used for drawing.
pub fn height(position: f64) -> f64 {
    (3.0 * position).sin() * 0.45 + 0.55
}

#[derive(Debug, Clone)]
pub struct MountainCar {
    state: CarState,
    steps: usize,
    max_steps: usize,
}

impl Default for MountainCar {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

impl MountainCar {
    pub fn new(max_steps: usize) -> Self {
        Self {
            state: CarState::default(),
            steps: 0,
            max_steps,
        }
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: CarState) {
        self.state = state;
    }
}

impl Environment for MountainCar {
    type Observation = CarState;
    type Action = Push;

    fn reset<R: Rng>(&mut self, rng: &mut R) -> CarState {
        self.state = CarState {
            position: rng.random_range(-0.6..-0.4),
            velocity: 0.0,
        };
        self.steps = 0;
        self.state
    }

    fn step<R: Rng>(&mut self, action: Push, _rng: &mut R) -> Step<CarState> {
        let CarState {
            mut position,
            mut velocity,
        } = self.state;

        velocity += action.direction() * FORCE + (3.0 * position).cos() * (-GRAVITY);
        velocity = velocity.clamp(-MAX_SPEED, MAX_SPEED);
        position += velocity;
        position = position.clamp(MIN_POSITION, MAX_POSITION);
        // Inelastic left wall.
        if position <= MIN_POSITION && velocity < 0.0 {
            velocity = 0.0;
        }

        self.state = CarState { position, velocity };
        self.steps += 1;

        let terminated = position >= GOAL_POSITION && velocity >= GOAL_VELOCITY;

        Step {
            observation: self.state,
            reward: -1.0,
            terminated,
            truncated: !terminated && self.steps >= self.max_steps,
        }
    }
}
