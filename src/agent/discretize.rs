//! Mapping observations onto Q-table rows.

use crate::env::air_hockey::RinkObservation;
use crate::env::mountain_car::{CarState, MAX_POSITION, MAX_SPEED, MIN_POSITION};

/// Turns an environment observation into a table row index.
pub trait StateEncoder<O> {
    fn n_states(&self) -> usize;

    fn encode(&self, observation: &O) -> usize;
}

/// Uniform bins over `[low, high]`. Values outside the range fall into the
/// edge bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bins {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

impl Bins {
    pub fn new(low: f64, high: f64, count: usize) -> Self {
        Self {
            low,
            high,
            count: count.max(1),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn index(&self, value: f64) -> usize {
        if !value.is_finite() || self.high <= self.low {
            return 0;
        }
        let t = ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0);
        ((t * self.count as f64) as usize).min(self.count - 1)
    }
}

/// Mixed-radix product of per-dimension bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretizer {
    dims: Vec<Bins>,
}

impl Discretizer {
    pub fn new(dims: Vec<Bins>) -> Self {
        Self { dims }
    }

    pub fn n_states(&self) -> usize {
        self.dims.iter().map(|b| b.count).product()
    }

    /// Row index for a point with one coordinate per dimension.
    pub fn index(&self, point: &[f64]) -> usize {
        self.dims
            .iter()
            .zip(point)
            .fold(0, |acc, (bins, &value)| acc * bins.count + bins.index(value))
    }
}

/// Position × velocity grid for the mountain car.
#[derive(Debug, Clone, PartialEq)]
pub struct CarEncoder(Discretizer);

impl CarEncoder {
    pub fn new(position_bins: usize, velocity_bins: usize) -> Self {
        Self(Discretizer::new(vec![
            Bins::new(MIN_POSITION, MAX_POSITION, position_bins),
            Bins::new(-MAX_SPEED, MAX_SPEED, velocity_bins),
        ]))
    }
}

impl StateEncoder<CarState> for CarEncoder {
    fn n_states(&self) -> usize {
        self.0.n_states()
    }

    fn encode(&self, observation: &CarState) -> usize {
        self.0.index(&[observation.position, observation.velocity])
    }
}

/// Frozen lake observations are already tile indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LakeEncoder {
    pub tiles: usize,
}

impl StateEncoder<usize> for LakeEncoder {
    fn n_states(&self) -> usize {
        self.tiles
    }

    fn encode(&self, observation: &usize) -> usize {
        (*observation).min(self.tiles.saturating_sub(1))
    }
}

/// Ball position relative to the agent paddle, ball velocity, and the
/// paddle's depth in its own half.
#[derive(Debug, Clone, PartialEq)]
pub struct RinkEncoder(Discretizer);

impl Default for RinkEncoder {
    fn default() -> Self {
        Self(Discretizer::new(vec![
            Bins::new(-0.5, 0.5, 7),  // ball x - paddle x
            Bins::new(-0.25, 0.75, 7), // ball y - paddle y
            Bins::new(-0.3, 0.3, 3),  // ball vx
            Bins::new(-0.3, 0.3, 3),  // ball vy
            Bins::new(0.0, 0.5, 3),   // paddle y
        ]))
    }
}

impl RinkEncoder {
    /// Feature vector fed to the bins.
    pub fn features(observation: &RinkObservation) -> [f64; 5] {
        [
            observation.ball_x - observation.agent_x,
            observation.ball_y - observation.agent_y,
            observation.ball_vx,
            observation.ball_vy,
            observation.agent_y,
        ]
    }
}

impl StateEncoder<RinkObservation> for RinkEncoder {
    fn n_states(&self) -> usize {
        self.0.n_states()
    }

    fn encode(&self, observation: &RinkObservation) -> usize {
        self.0.index(&Self::features(observation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_clamp_out_of_range() {
        let bins = Bins::new(0.0, 1.0, 4);
        assert_eq!(bins.index(-5.0), 0);
        assert_eq!(bins.index(0.0), 0);
        assert_eq!(bins.index(0.3), 1);
        assert_eq!(bins.index(0.99), 3);
        assert_eq!(bins.index(1.0), 3);
        assert_eq!(bins.index(7.0), 3);
        assert_eq!(bins.index(f64::NAN), 0);
    }

    #[test]
    fn test_discretizer_is_mixed_radix() {
        let disc = Discretizer::new(vec![Bins::new(0.0, 1.0, 3), Bins::new(0.0, 1.0, 5)]);
        assert_eq!(disc.n_states(), 15);
        assert_eq!(disc.index(&[0.0, 0.0]), 0);
        assert_eq!(disc.index(&[0.0, 1.0]), 4);
        assert_eq!(disc.index(&[1.0, 0.0]), 10);
        assert_eq!(disc.index(&[1.0, 1.0]), 14);
    }

    #[test]
    fn test_car_encoder_covers_state_space() {
        let encoder = CarEncoder::new(20, 20);
        assert_eq!(encoder.n_states(), 400);
        let corner = CarState {
            position: MAX_POSITION,
            velocity: MAX_SPEED,
        };
        assert_eq!(encoder.encode(&corner), 399);
        let origin = CarState {
            position: MIN_POSITION,
            velocity: -MAX_SPEED,
        };
        assert_eq!(encoder.encode(&origin), 0);
    }

    #[test]
    fn test_rink_encoder_stays_in_range() {
        let encoder = RinkEncoder::default();
        let n = encoder.n_states();
        assert_eq!(n, 7 * 7 * 3 * 3 * 3);
        let extremes = [
            RinkObservation::default(),
            RinkObservation {
                ball_x: 2.0,
                ball_y: -1.0,
                ball_vx: 9.0,
                ball_vy: -9.0,
                agent_x: 0.0,
                agent_y: 1.0,
                opponent_x: 0.5,
                opponent_y: 0.9,
            },
        ];
        for obs in extremes {
            assert!(encoder.encode(&obs) < n);
        }
    }

    #[test]
    fn test_lake_encoder_identity() {
        let encoder = LakeEncoder { tiles: 16 };
        assert_eq!(encoder.encode(&5), 5);
        assert_eq!(encoder.encode(&99), 15);
    }
}
