//! Toast notification types.

use std::time::{Duration, Instant};

/// Severity of a toast; picks its colour and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    /// Neutral notice.
    Info,
    /// Goal reached or match won.
    Success,
    /// Episode cut off by its step limit.
    Warning,
    /// Episode lost or match conceded.
    Error,
}

/// A centred message box over the current scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Text to show; `\n` starts a new paragraph.
    pub message: String,
    /// Severity, which sets the colour and title.
    pub toast_type: ToastType,
    /// `None` keeps the toast up until replaced.
    pub expires_at: Option<Instant>,
}

impl Toast {
    /// A toast that disappears after `duration`.
    pub fn timed(message: impl Into<String>, toast_type: ToastType, duration: Duration) -> Self {
        Self {
            message: message.into(),
            toast_type,
            expires_at: Some(Instant::now() + duration),
        }
    }

    /// A toast that stays until replaced.
    pub fn sticky(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            expires_at: None,
        }
    }

    /// Whether a timed toast has run out at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}
