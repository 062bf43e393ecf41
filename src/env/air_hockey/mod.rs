//! Two-player air hockey.
//!
//! The learning agent owns the top paddle. The bottom paddle is pulled
//! towards a target point: a scripted bot moves that point during training,
//! the human moves it with the mouse or keyboard during play. Scoring in the
//! bottom goal is a win for the agent.

pub mod physics;

use super::{DiscreteAction, Environment, Step};
use physics::{collide_discs, collide_wall, Disc, Vec2, Wall};
use rand::Rng;

pub const WIDTH: f64 = 500.0;
pub const HEIGHT: f64 = 700.0;
pub const PADDLE_RADIUS: f64 = 25.0;
pub const BALL_RADIUS: f64 = 15.0;
pub const GOAL_WIDTH: f64 = 180.0;
pub const WALL_THICKNESS: f64 = 5.0;

const BALL_MASS: f64 = 1.0;
const PADDLE_MASS: f64 = 20.0;
/// Fraction of velocity kept after one second.
const DAMPING: f64 = 0.999;

/// Distance of each paddle's home line from its own goal.
const HOME_OFFSET: f64 = 100.0;

const FRAME_DT: f64 = 1.0 / 60.0;
const SUBSTEPS: usize = 10;

/// Scale from a unit action to a force on the agent paddle.
const FORCE_MULTIPLIER: f64 = 50_000.0;
/// Maximum force with which the target point drags the opponent paddle.
const PULL_MAX_FORCE: f64 = 100_000.0;
/// Velocity per unit of distance the pull tries to reach (1/s).
const PULL_GAIN: f64 = 6.3;
const MAX_PADDLE_SPEED: f64 = 1500.0;

/// Bot paddle speed limit in pixels per step.
const BOT_SPEED: f64 = 8.0;
/// Component range of the random launch velocity in learning mode.
const LAUNCH_SPEED: f64 = 200.0;

/// Steps after which an undecided match is cut off.
pub const MAX_STEPS: usize = 2000;

const GOAL_REWARD: f64 = 10.0;
const PRESSURE_REWARD: f64 = 0.001;

/// Velocity scale used in observations.
const VELOCITY_SCALE: f64 = 1000.0;

/// Who drives the bottom paddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Scripted ball tracker; the ball is launched at random.
    Bot,
    /// Externally driven target; the ball starts at rest.
    Human,
}

/// How a decided match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The ball went into the bottom goal.
    AgentScored,
    /// The ball went into the top goal.
    OpponentScored,
}

/// Normalised view of the rink.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RinkObservation {
    pub ball_x: f64,
    pub ball_y: f64,
    pub ball_vx: f64,
    pub ball_vy: f64,
    pub agent_x: f64,
    pub agent_y: f64,
    pub opponent_x: f64,
    pub opponent_y: f64,
}

/// Continuous force command in `[-1, 1]²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Force {
    pub x: f64,
    pub y: f64,
}

impl Force {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn clipped(self) -> Self {
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
        }
    }
}

/// Discrete force directions available to the Q-learning agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Hold,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Nudge {
    pub const ALL: [Nudge; 9] = [
        Nudge::Hold,
        Nudge::Up,
        Nudge::UpRight,
        Nudge::Right,
        Nudge::DownRight,
        Nudge::Down,
        Nudge::DownLeft,
        Nudge::Left,
        Nudge::UpLeft,
    ];

    /// Force for this direction. Screen coordinates: `y` grows downwards.
    pub fn force(self) -> Force {
        const D: f64 = std::f64::consts::FRAC_1_SQRT_2;
        let (x, y) = match self {
            Nudge::Hold => (0.0, 0.0),
            Nudge::Up => (0.0, -1.0),
            Nudge::UpRight => (D, -D),
            Nudge::Right => (1.0, 0.0),
            Nudge::DownRight => (D, D),
            Nudge::Down => (0.0, 1.0),
            Nudge::DownLeft => (-D, D),
            Nudge::Left => (-1.0, 0.0),
            Nudge::UpLeft => (-D, -D),
        };
        Force::new(x, y)
    }
}

impl DiscreteAction for Nudge {
    const COUNT: usize = 9;

    fn index(self) -> usize {
        Nudge::ALL
            .iter()
            .position(|n| *n == self)
            .unwrap_or_default()
    }

    fn from_index(index: usize) -> Self {
        Nudge::ALL[index % Self::COUNT]
    }
}

#[derive(Debug, Clone)]
pub struct AirHockey {
    opponent: Opponent,
    ball: Disc,
    agent: Disc,
    rival: Disc,
    /// Point the bottom paddle is dragged towards.
    target: Vec2,
    walls: Vec<Wall>,
    steps: usize,
    max_steps: usize,
    outcome: Option<Outcome>,
}

impl AirHockey {
    pub fn new(opponent: Opponent) -> Self {
        let centre = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        let agent_home = Vec2::new(WIDTH / 2.0, HOME_OFFSET);
        let rival_home = Vec2::new(WIDTH / 2.0, HEIGHT - HOME_OFFSET);
        Self {
            opponent,
            ball: Disc::new(centre, BALL_RADIUS, BALL_MASS),
            agent: Disc::new(agent_home, PADDLE_RADIUS, PADDLE_MASS),
            rival: Disc::new(rival_home, PADDLE_RADIUS, PADDLE_MASS),
            target: rival_home,
            walls: build_walls(),
            steps: 0,
            max_steps: MAX_STEPS,
            outcome: None,
        }
    }

    pub fn ball(&self) -> &Disc {
        &self.ball
    }

    pub fn agent_paddle(&self) -> &Disc {
        &self.agent
    }

    pub fn opponent_paddle(&self) -> &Disc {
        &self.rival
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Result of the last terminated match, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Moves the point the bottom paddle is dragged towards.
    pub fn set_opponent_target(&mut self, x: f64, y: f64) {
        self.target = Vec2::new(x, y);
    }

    pub fn opponent_target(&self) -> Vec2 {
        self.target
    }

    pub fn observation(&self) -> RinkObservation {
        RinkObservation {
            ball_x: self.ball.position.x / WIDTH,
            ball_y: self.ball.position.y / HEIGHT,
            ball_vx: self.ball.velocity.x / VELOCITY_SCALE,
            ball_vy: self.ball.velocity.y / VELOCITY_SCALE,
            agent_x: self.agent.position.x / WIDTH,
            agent_y: self.agent.position.y / HEIGHT,
            opponent_x: self.rival.position.x / WIDTH,
            opponent_y: self.rival.position.y / HEIGHT,
        }
    }

    /// Advances one frame with a continuous force on the agent paddle.
    pub fn step_force(&mut self, force: Force) -> Step<RinkObservation> {
        let force = force.clipped();
        if self.opponent == Opponent::Bot {
            self.move_bot();
        }

        let dt = FRAME_DT / SUBSTEPS as f64;
        for _ in 0..SUBSTEPS {
            self.agent.force = Vec2::new(force.x, force.y) * FORCE_MULTIPLIER;
            self.pull_rival(dt);

            self.ball.integrate(dt, DAMPING);
            self.agent.integrate(dt, DAMPING);
            self.rival.integrate(dt, DAMPING);
            self.agent.velocity = self.agent.velocity.clamp_length(MAX_PADDLE_SPEED);
            self.rival.velocity = self.rival.velocity.clamp_length(MAX_PADDLE_SPEED);

            for wall in &self.walls {
                collide_wall(&mut self.ball, wall);
            }
            collide_discs(&mut self.ball, &mut self.agent);
            collide_discs(&mut self.ball, &mut self.rival);

            self.constrain_paddles();
        }
        self.steps += 1;

        let ball_y = self.ball.position.y;
        let mut reward = 0.0;
        self.outcome = if ball_y > HEIGHT {
            reward = GOAL_REWARD;
            Some(Outcome::AgentScored)
        } else if ball_y < 0.0 {
            reward = -GOAL_REWARD;
            Some(Outcome::OpponentScored)
        } else {
            None
        };
        if ball_y > HEIGHT / 2.0 {
            reward += PRESSURE_REWARD;
        }

        let terminated = self.outcome.is_some();
        Step {
            observation: self.observation(),
            reward,
            terminated,
            truncated: !terminated && self.steps >= self.max_steps,
        }
    }

    /// Tracks the ball's x coordinate along the home line.
    fn move_bot(&mut self) {
        let diff = self.ball.position.x - self.target.x;
        let x = if diff.abs() < BOT_SPEED {
            self.ball.position.x
        } else {
            self.target.x + BOT_SPEED * diff.signum()
        };
        self.target = Vec2::new(
            x.clamp(PADDLE_RADIUS, WIDTH - PADDLE_RADIUS),
            HEIGHT - HOME_OFFSET,
        );
    }

    /// Drags the bottom paddle towards the target with a bounded force.
    fn pull_rival(&mut self, dt: f64) {
        let desired = (self.target - self.rival.position) * PULL_GAIN;
        let max_dv = PULL_MAX_FORCE / self.rival.mass * dt;
        let dv = (desired - self.rival.velocity).clamp_length(max_dv);
        self.rival.force = dv * (self.rival.mass / dt);
    }

    /// Keeps each paddle in its own half and inside the rink.
    fn constrain_paddles(&mut self) {
        let r = PADDLE_RADIUS;
        self.agent.confine(
            Vec2::new(r, r),
            Vec2::new(WIDTH - r, HEIGHT / 2.0 - r),
        );
        self.rival.confine(
            Vec2::new(r, HEIGHT / 2.0 + r),
            Vec2::new(WIDTH - r, HEIGHT - r),
        );
    }

    #[cfg(test)]
    pub(crate) fn place_ball(&mut self, position: Vec2, velocity: Vec2) {
        self.ball.position = position;
        self.ball.velocity = velocity;
    }

    #[cfg(test)]
    pub(crate) fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }
}

impl Environment for AirHockey {
    type Observation = RinkObservation;
    type Action = Nudge;

    fn reset<R: Rng>(&mut self, rng: &mut R) -> RinkObservation {
        let mut fresh = Self::new(self.opponent);
        if self.opponent == Opponent::Bot {
            fresh.ball.velocity = Vec2::new(
                rng.random_range(-LAUNCH_SPEED..=LAUNCH_SPEED),
                rng.random_range(-LAUNCH_SPEED..=LAUNCH_SPEED),
            );
        }
        fresh.max_steps = self.max_steps;
        *self = fresh;
        self.observation()
    }

    fn step<R: Rng>(&mut self, action: Nudge, _rng: &mut R) -> Step<RinkObservation> {
        self.step_force(action.force())
    }

    fn is_success(step: &Step<RinkObservation>) -> bool {
        step.terminated && step.reward > 0.0
    }
}

/// Side walls plus the top and bottom walls with a goal mouth in the middle.
fn build_walls() -> Vec<Wall> {
    let w = WIDTH;
    let h = HEIGHT;
    let left_post = w / 2.0 - GOAL_WIDTH / 2.0;
    let right_post = w / 2.0 + GOAL_WIDTH / 2.0;
    let t = WALL_THICKNESS;
    vec![
        Wall::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, h), t),
        Wall::new(Vec2::new(w, 0.0), Vec2::new(w, h), t),
        Wall::new(Vec2::new(0.0, 0.0), Vec2::new(left_post, 0.0), t),
        Wall::new(Vec2::new(right_post, 0.0), Vec2::new(w, 0.0), t),
        Wall::new(Vec2::new(0.0, h), Vec2::new(left_post, h), t),
        Wall::new(Vec2::new(right_post, h), Vec2::new(w, h), t),
    ]
}

/// Left and right x coordinates of the goal mouths.
pub fn goal_posts() -> (f64, f64) {
    (WIDTH / 2.0 - GOAL_WIDTH / 2.0, WIDTH / 2.0 + GOAL_WIDTH / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reset_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut env = AirHockey::new(Opponent::Human);
        let obs = env.reset(&mut rng);
        assert!((obs.ball_x - 0.5).abs() < 1e-12);
        assert!((obs.ball_y - 0.5).abs() < 1e-12);
        assert!(obs.ball_vx.abs() < 1e-12 && obs.ball_vy.abs() < 1e-12);
        assert!((env.agent_paddle().position.y - 100.0).abs() < 1e-12);
        assert!((env.opponent_paddle().position.y - 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_bot_mode_launches_ball() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut env = AirHockey::new(Opponent::Bot);
        let obs = env.reset(&mut rng);
        assert!(obs.ball_vx.abs() <= 0.2 && obs.ball_vy.abs() <= 0.2);
        assert!(obs.ball_vx.abs() + obs.ball_vy.abs() > 0.0);
    }

    #[test]
    fn test_paddles_stay_in_their_half() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut env = AirHockey::new(Opponent::Human);
        env.reset(&mut rng);
        env.set_opponent_target(-100.0, 0.0);
        for _ in 0..300 {
            env.step_force(Force::new(1.0, 1.0));
            let agent = env.agent_paddle().position;
            let rival = env.opponent_paddle().position;
            assert!(agent.y <= HEIGHT / 2.0 - PADDLE_RADIUS + 1e-9);
            assert!(agent.x <= WIDTH - PADDLE_RADIUS + 1e-9);
            assert!(rival.y >= HEIGHT / 2.0 + PADDLE_RADIUS - 1e-9);
            assert!(rival.x >= PADDLE_RADIUS - 1e-9);
        }
    }

    #[test]
    fn test_ball_into_bottom_goal_rewards_agent() {
        let mut env = AirHockey::new(Opponent::Human);
        env.place_ball(
            Vec2::new(WIDTH / 2.0, HEIGHT - 5.0),
            Vec2::new(0.0, 900.0),
        );
        let step = env.step_force(Force::default());
        assert!(step.terminated);
        assert!((step.reward - (GOAL_REWARD + PRESSURE_REWARD)).abs() < 1e-12);
        assert_eq!(env.outcome(), Some(Outcome::AgentScored));
        assert!(AirHockey::is_success(&step));
    }

    #[test]
    fn test_ball_into_top_goal_penalises_agent() {
        let mut env = AirHockey::new(Opponent::Human);
        env.place_ball(Vec2::new(WIDTH / 2.0, 5.0), Vec2::new(0.0, -900.0));
        let step = env.step_force(Force::default());
        assert!(step.terminated);
        assert!((step.reward + GOAL_REWARD).abs() < 1e-12);
        assert_eq!(env.outcome(), Some(Outcome::OpponentScored));
        assert!(!AirHockey::is_success(&step));
    }

    #[test]
    fn test_side_wall_bounce_keeps_speed() {
        let mut env = AirHockey::new(Opponent::Human);
        env.place_ball(Vec2::new(30.0, 250.0), Vec2::new(-600.0, 0.0));
        for _ in 0..5 {
            env.step_force(Force::default());
        }
        let ball = env.ball();
        assert!(ball.velocity.x > 0.0);
        assert!((ball.velocity.length() - 600.0).abs() < 1.0);
    }

    #[test]
    fn test_pressure_reward_in_bottom_half() {
        let mut env = AirHockey::new(Opponent::Human);
        env.place_ball(Vec2::new(100.0, 450.0), Vec2::ZERO);
        let step = env.step_force(Force::default());
        assert!(!step.terminated);
        assert!((step.reward - PRESSURE_REWARD).abs() < 1e-12);

        env.place_ball(Vec2::new(100.0, 250.0), Vec2::ZERO);
        let step = env.step_force(Force::default());
        assert!(step.reward.abs() < 1e-12);
    }

    #[test]
    fn test_truncates_after_step_limit() {
        let mut env = AirHockey::new(Opponent::Human);
        env.set_max_steps(3);
        assert!(!env.step_force(Force::default()).truncated);
        assert!(!env.step_force(Force::default()).truncated);
        assert!(env.step_force(Force::default()).truncated);
    }

    #[test]
    fn test_bot_speed_is_limited() {
        let mut env = AirHockey::new(Opponent::Bot);
        env.place_ball(Vec2::new(450.0, 350.0), Vec2::ZERO);
        let before = env.opponent_target().x;
        env.step_force(Force::default());
        let after = env.opponent_target();
        assert!((after.x - before - BOT_SPEED).abs() < 1e-9);
        assert!((after.y - (HEIGHT - HOME_OFFSET)).abs() < 1e-9);
    }

    #[test]
    fn test_agent_force_moves_paddle() {
        let mut env = AirHockey::new(Opponent::Human);
        let start = env.agent_paddle().position.x;
        for _ in 0..10 {
            env.step(Nudge::Right, &mut StdRng::seed_from_u64(0));
        }
        assert!(env.agent_paddle().position.x > start);
    }

    #[test]
    fn test_nudge_index_round_trip() {
        for nudge in Nudge::ALL {
            assert_eq!(Nudge::from_index(nudge.index()), nudge);
            let f = nudge.force();
            assert!(f.x.abs() <= 1.0 && f.y.abs() <= 1.0);
        }
    }
}
