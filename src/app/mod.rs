//! Interactive viewer.
//!
//! Owns the scene being shown (a mountain car or frozen lake replay, or a
//! live air hockey match), reacts to terminal events and advances the
//! simulation on every tick.

pub mod air_hockey;
pub mod frozen_lake;
pub mod mountain_car;
pub mod replay;

use crate::event::{Event, EventHandler};
use crate::state::{PlaybackSpeed, PlaybackState, Toast};
use crate::ui;
use color_eyre::Result;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, MouseEvent, MouseEventKind,
};
use rand::rngs::StdRng;
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use std::time::Instant;

pub use air_hockey::HockeyMatch;
pub use frozen_lake::LakeReplay;
pub use mountain_car::CarReplay;

/// What the viewer is showing.
pub enum Scene {
    MountainCar(CarReplay),
    FrozenLake(LakeReplay),
    AirHockey(HockeyMatch),
}

impl Scene {
    fn tick_rate_ms(&self) -> u64 {
        match self {
            Scene::MountainCar(_) => crate::constants::MOUNTAIN_CAR_TICK_MS,
            Scene::FrozenLake(_) => crate::constants::FROZEN_LAKE_TICK_MS,
            Scene::AirHockey(_) => crate::constants::AIR_HOCKEY_TICK_MS,
        }
    }

    /// Advances the scene by one step, returning a message to show.
    fn advance(&mut self, now: Instant, rng: &mut StdRng) -> Option<Toast> {
        match self {
            Scene::MountainCar(replay) => replay.advance(now, rng),
            Scene::FrozenLake(replay) => replay.advance(now, rng),
            Scene::AirHockey(game) => game.advance(now, rng),
        }
    }
}

/// Application state.
pub struct App {
    pub scene: Scene,
    pub toast: Option<Toast>,
    pub playback: PlaybackState,
    pub speed: PlaybackSpeed,
    /// Screen area of the last drawn playfield, for mouse mapping.
    pub playfield: Rect,
    running: bool,
    ticks: u64,
    rng: StdRng,
}

impl App {
    pub fn new(scene: Scene, rng: StdRng) -> Self {
        Self {
            scene,
            toast: None,
            playback: PlaybackState::default(),
            speed: PlaybackSpeed::default(),
            playfield: Rect::default(),
            running: true,
            ticks: 0,
            rng,
        }
    }

    /// Takes over the terminal until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or event delivery fails. The terminal is
    /// restored either way.
    pub fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

        let result = self.event_loop(&mut terminal);

        if let Err(e) = crossterm::execute!(std::io::stdout(), DisableMouseCapture) {
            tracing::warn!(error = %e, "failed to release mouse capture");
        }
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let events = EventHandler::new(self.scene.tick_rate_ms());
        tracing::info!(tick_ms = self.scene.tick_rate_ms(), "viewer started");

        while self.running {
            terminal.draw(|frame| ui::render(frame, self))?;
            match events.next()? {
                Event::Tick => self.on_tick(Instant::now()),
                Event::Key(key) => self.on_key(key),
                Event::Mouse(mouse) => self.on_mouse(mouse),
                Event::Resize(_, _) => {}
            }
        }

        tracing::info!(ticks = self.ticks, "viewer closed");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.ticks += 1;
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
        if self.playback.is_paused() {
            return;
        }

        let steps = match self.scene {
            Scene::AirHockey(_) => 1,
            _ => self.speed.steps_for_tick(self.ticks),
        };
        for _ in 0..steps {
            if let Some(toast) = self.scene.advance(now, &mut self.rng) {
                self.toast = Some(toast);
                break;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('p') | KeyCode::Char(' ') => self.playback = self.playback.toggled(),
            KeyCode::Char('s') if !matches!(self.scene, Scene::AirHockey(_)) => {
                self.speed = self.speed.next();
            }
            code => {
                if let Scene::AirHockey(game) = &mut self.scene {
                    game.on_key(code, &mut self.rng);
                }
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let Scene::AirHockey(game) = &mut self.scene else {
            return;
        };
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
        ) {
            return;
        }
        if let Some((x, y)) = air_hockey::screen_to_rink(self.playfield, mouse.column, mouse.row) {
            game.point_at(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::discretize::LakeEncoder;
    use crate::agent::QTable;
    use crate::env::frozen_lake::{FrozenLake, LakeMap};
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;

    fn lake_app() -> App {
        let mut rng = StdRng::seed_from_u64(0);
        let map = LakeMap::from_layout("SFFF/FHFH/FFFH/HFFG").unwrap();
        let replay = LakeReplay::new(
            FrozenLake::new(map, false),
            LakeEncoder { tiles: 16 },
            QTable::new(16, 4),
            1,
            &mut rng,
        );
        App::new(Scene::FrozenLake(replay), rng)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = lake_app();
        app.on_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.is_running());

        let mut app = lake_app();
        app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.is_running());
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut app = lake_app();
        app.on_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE));
        assert!(app.playback.is_paused());
        app.on_tick(Instant::now());
        let Scene::FrozenLake(replay) = &app.scene else {
            unreachable!()
        };
        assert_eq!(replay.steps(), 0);
    }

    #[test]
    fn test_speed_key_cycles() {
        let mut app = lake_app();
        app.on_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert_eq!(app.speed, PlaybackSpeed::Fast);
    }

    #[test]
    fn test_untrained_lake_agent_times_out_with_toast() {
        let mut app = lake_app();
        // Greedy on a zero table moves left forever and never ends early.
        let now = Instant::now();
        for _ in 0..200 {
            app.on_tick(now);
        }
        assert!(app.toast.is_some());
        let Scene::FrozenLake(replay) = &app.scene else {
            unreachable!()
        };
        assert!(replay.is_finished());
    }
}
