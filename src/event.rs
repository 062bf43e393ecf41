//! Terminal input for the viewer.
//!
//! A background thread polls crossterm and interleaves the input it cares
//! about with fixed-rate simulation ticks. Everything arrives on one channel.

use color_eyre::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Terminal events that drive the application.
#[derive(Debug)]
pub enum Event {
    /// Key press.
    Key(KeyEvent),
    /// Pointer movement or button press over the terminal.
    Mouse(MouseEvent),
    /// New terminal size in columns and rows.
    Resize(u16, u16),
    /// Simulation tick.
    Tick,
}

/// Keeps key presses, pointer motion and resizes. Key releases, repeats,
/// scrolling and focus changes never reach the app.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                Some(Event::Mouse(mouse))
            }
            _ => None,
        },
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Polls until the receiver hangs up.
fn pump(sender: &Sender<Event>, tick_rate: Duration) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).unwrap_or(false) {
            if let Some(evt) = event::read().ok().and_then(translate) {
                if sender.send(evt).is_err() {
                    return;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if sender.send(Event::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}

/// Owns the input thread and the receiving end of its channel.
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    /// Detached; the thread exits once `receiver` is dropped.
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Starts the input thread, ticking every `tick_rate_ms` milliseconds.
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));
        let (sender, receiver) = mpsc::channel();
        let handler = thread::spawn(move || pump(&sender, tick_rate));
        Self { receiver, handler }
    }

    /// Blocks until the next event is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the input thread has stopped.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }
}
