//! Day and night phases and the transition events between them.

pub mod tracker;

pub use tracker::DayPhaseTracker;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::DayBoundary;

/// Whether it is currently day or night at the configured location.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Between sunrise and sunset, widened by the twilight buffer
    Day,

    /// Everything else
    Night,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Day => "󰖨 ",
            Self::Night => " ",
        }
    }

    /// The background setting applied when no hook handles this phase.
    pub fn background(&self) -> &'static str {
        match self {
            Self::Day => "light",
            Self::Night => "dark",
        }
    }

    /// Lowercase name exported to phase commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
        }
    }
}

/// Classify `now_minutes` against a boundary. See [`DayBoundary::classify`].
pub fn classify(now_minutes: u32, boundary: &DayBoundary) -> Phase {
    boundary.classify(now_minutes)
}

/// Emitted by [`DayPhaseTracker::tick`] when the phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    /// The phase that was just entered
    pub phase: Phase,
    /// Minute of the day at which the change was observed
    pub at_minutes: u32,
    /// True for the event produced by the very first tick
    pub initial: bool,
}

/// Log the standard announcement for a transition event.
pub fn log_transition(event: &TransitionEvent) {
    if event.initial {
        log_block_start!(
            "Entering {} mode {}",
            event.phase.display_name().to_lowercase(),
            event.phase.symbol()
        );
    } else {
        log_block_start!(
            "Switching to {} mode {} at {}",
            event.phase.display_name().to_lowercase(),
            event.phase.symbol(),
            crate::geo::format_minutes(event.at_minutes)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_against_boundary() {
        let boundary = DayBoundary::new(360, 1080);
        assert_eq!(classify(345, &boundary), Phase::Night);
        assert_eq!(classify(346, &boundary), Phase::Day);
        assert_eq!(classify(1095, &boundary), Phase::Night);

        let wrapped = DayBoundary::new(529, 74);
        assert_eq!(classify(30, &wrapped), Phase::Day);
        assert_eq!(classify(300, &wrapped), Phase::Night);
    }
}
