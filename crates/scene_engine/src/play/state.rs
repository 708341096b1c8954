//! Play state machine

use super::PlayError;
use std::fmt;

/// Session state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// Editing; no snapshot exists
    #[default]
    Stopped,
    /// Simulating
    Playing,
    /// Simulation frozen, rendering continues
    Paused,
}

/// Requested transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayAction {
    /// Stopped -> Playing
    Start,
    /// Playing -> Paused
    Pause,
    /// Paused -> Playing
    Continue,
    /// Playing or Paused -> Stopped
    Stop,
}

impl PlayState {
    /// Whether a session (and therefore a snapshot) exists
    pub const fn in_session(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }

    /// Transition table
    pub fn apply(self, action: PlayAction) -> Result<Self, PlayError> {
        match (self, action) {
            (Self::Stopped, PlayAction::Start) | (Self::Paused, PlayAction::Continue) => {
                Ok(Self::Playing)
            }
            (Self::Playing, PlayAction::Pause) => Ok(Self::Paused),
            (Self::Playing | Self::Paused, PlayAction::Stop) => Ok(Self::Stopped),
            (from, action) => Err(PlayError::InvalidTransition { from, action }),
        }
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PlayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Continue => "continue",
            Self::Stop => "stop",
        };
        f.write_str(name)
    }
}
