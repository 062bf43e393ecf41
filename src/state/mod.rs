//! State types shared between the app loop and the renderer.

pub mod playback;
pub mod rink;
pub mod toast;

pub use playback::{PlaybackSpeed, PlaybackState};
pub use rink::{MatchPhase, Scoreboard};
pub use toast::{Toast, ToastType};
