//! Replay playback state types.
//!
//! Replays can be paused and sped up without affecting what the agent does.

/// How many environment steps each UI tick advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackSpeed {
    /// One step every other tick.
    Slow,
    /// One step per tick.
    #[default]
    Normal,
    /// Four steps per tick.
    Fast,
}

impl PlaybackSpeed {
    /// Cycle to next speed: Slow → Normal → Fast → Slow
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Slow => Self::Normal,
            Self::Normal => Self::Fast,
            Self::Fast => Self::Slow,
        }
    }

    /// Steps to run on tick number `tick`.
    pub const fn steps_for_tick(self, tick: u64) -> usize {
        match self {
            Self::Slow => (tick % 2 == 0) as usize,
            Self::Normal => 1,
            Self::Fast => 4,
        }
    }

    /// Short label shown in the side panel.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slow => "0.5x",
            Self::Normal => "1x",
            Self::Fast => "4x",
        }
    }
}

/// Whether the simulation is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Ticks advance the scene.
    #[default]
    Running,
    /// Ticks only expire toasts.
    Paused,
}

impl PlaybackState {
    /// Flip between running and paused.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }

    /// Check if the simulation is halted
    #[must_use]
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }
}
