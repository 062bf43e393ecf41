//! Human-vs-agent air hockey match.
//!
//! The trained agent drives the top paddle greedily from its Q-table. The
//! human drags the bottom paddle with the mouse or the arrow keys.

use crate::agent::discretize::RinkEncoder;
use crate::agent::{QTable, StateEncoder};
use crate::constants::{GOAL_BANNER_MS, MSG_AI_WINS, MSG_YOU_WIN};
use crate::env::air_hockey::{AirHockey, Nudge, Opponent, Outcome, HEIGHT, WIDTH};
use crate::env::{DiscreteAction, Environment};
use crate::state::{MatchPhase, Scoreboard, Toast, ToastType};
use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// How far one key press moves the paddle target.
const KEY_STEP: f64 = 25.0;

pub struct HockeyMatch {
    env: AirHockey,
    encoder: RinkEncoder,
    table: QTable,
    phase: MatchPhase,
    score: Scoreboard,
}

impl HockeyMatch {
    pub fn new<R: Rng>(table: QTable, rng: &mut R) -> Self {
        let mut env = AirHockey::new(Opponent::Human);
        env.reset(rng);
        Self {
            env,
            encoder: RinkEncoder::default(),
            table,
            phase: MatchPhase::Playing,
            score: Scoreboard::default(),
        }
    }

    pub fn env(&self) -> &AirHockey {
        &self.env
    }

    pub fn score(&self) -> Scoreboard {
        self.score
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Advances one frame. Returns the goal banner when someone scores.
    pub fn advance<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Option<Toast> {
        if let MatchPhase::Celebrating { until, .. } = self.phase {
            if now < until {
                return None;
            }
            self.restart(rng);
        }

        let state = self.encoder.encode(&self.env.observation());
        let action = Nudge::from_index(self.table.best_action(state));
        let step = self.env.step(action, rng);

        if step.terminated {
            let outcome = self.env.outcome()?;
            self.score.record(outcome);
            let shown = Duration::from_millis(GOAL_BANNER_MS);
            self.phase = MatchPhase::Celebrating {
                until: now + shown,
                outcome,
            };
            tracing::info!(?outcome, player = self.score.player, ai = self.score.ai, "goal");
            let toast = match outcome {
                Outcome::OpponentScored => Toast::timed(MSG_YOU_WIN, ToastType::Success, shown),
                Outcome::AgentScored => Toast::timed(MSG_AI_WINS, ToastType::Error, shown),
            };
            return Some(toast);
        }
        if step.truncated {
            self.score.draws += 1;
            tracing::debug!(steps = self.env.steps(), "match hit the step limit");
            self.restart(rng);
        }
        None
    }

    fn restart<R: Rng>(&mut self, rng: &mut R) {
        let target = self.env.opponent_target();
        self.env.reset(rng);
        self.env.set_opponent_target(target.x, target.y);
        self.phase = MatchPhase::Playing;
    }

    /// Points the human paddle at a rink position.
    pub fn point_at(&mut self, x: f64, y: f64) {
        self.env
            .set_opponent_target(x.clamp(0.0, WIDTH), y.clamp(0.0, HEIGHT));
    }

    pub fn on_key<R: Rng>(&mut self, code: KeyCode, rng: &mut R) {
        let (dx, dy) = match code {
            KeyCode::Left | KeyCode::Char('a') => (-KEY_STEP, 0.0),
            KeyCode::Right | KeyCode::Char('d') => (KEY_STEP, 0.0),
            KeyCode::Up | KeyCode::Char('w') => (0.0, -KEY_STEP),
            KeyCode::Down | KeyCode::Char('s') => (0.0, KEY_STEP),
            KeyCode::Char('r') => {
                tracing::debug!("match restarted by player");
                self.restart(rng);
                return;
            }
            _ => return,
        };
        let target = self.env.opponent_target();
        self.point_at(target.x + dx, target.y + dy);
    }
}

/// Maps a terminal cell inside `area` to rink coordinates.
///
/// Row 0 is the top of the rink, where the agent defends.
pub fn screen_to_rink(area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width) * WIDTH;
    let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height) * HEIGHT;
    Some((x, y))
}
