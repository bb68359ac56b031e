//! Per-day sunrise/sunset boundaries and the polar fallback.

use serde::{Deserialize, Serialize};

use crate::common::constants::{MINUTES_PER_DAY, TWILIGHT_HALF_MARGIN};
use crate::geo::solar::{self, GeoConfig, SolarError, format_minutes};
use crate::phase::{self, Phase};

/// Sunrise and sunset for one calendar day, as local minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBoundary {
    pub sunrise_minutes: u32,
    pub sunset_minutes: u32,
}

impl DayBoundary {
    pub fn new(sunrise_minutes: u32, sunset_minutes: u32) -> Self {
        Self {
            sunrise_minutes,
            sunset_minutes,
        }
    }

    /// Classify a minute of the day against this boundary.
    ///
    /// Day is the open interval `(sunrise - 15, sunset + 15)`; both edges and
    /// everything outside are Night. When the local sunset falls after
    /// midnight the interval wraps, and Day is `now > sunrise - 15` or
    /// `now < sunset + 15`.
    pub fn classify(&self, now_minutes: u32) -> Phase {
        let now = now_minutes as i32;
        let after_open = now > self.sunrise_minutes as i32 - TWILIGHT_HALF_MARGIN;
        let before_close = now < self.sunset_minutes as i32 + TWILIGHT_HALF_MARGIN;

        let is_day = if self.wraps_midnight() {
            after_open || before_close
        } else {
            after_open && before_close
        };

        if is_day { Phase::Day } else { Phase::Night }
    }

    /// Whether the local sunset lands on the clock before sunrise, which
    /// happens when the UTC offset is far from the longitude's solar time.
    pub fn wraps_midnight(&self) -> bool {
        self.sunset_minutes < self.sunrise_minutes
    }

    /// First and last minutes classified as Day, if any.
    ///
    /// For a boundary that wraps midnight the first minute is later on the
    /// clock than the last one.
    pub fn day_window(&self) -> Option<(u32, u32)> {
        let opens = self.sunrise_minutes as i32 - TWILIGHT_HALF_MARGIN + 1;
        let closes = self.sunset_minutes as i32 + TWILIGHT_HALF_MARGIN - 1;
        let last_minute = MINUTES_PER_DAY as i32 - 1;

        if self.wraps_midnight() {
            // Night is the span between the two, empty when the buffers overlap
            let night_starts = closes + 1;
            let night_ends = opens - 1;
            if night_starts > night_ends || night_ends < 0 {
                return Some((0, last_minute as u32));
            }
            return Some((opens as u32, closes as u32));
        }
        (opens <= closes).then(|| (opens.max(0) as u32, closes.min(last_minute) as u32))
    }
}

/// How to treat days when the sun never crosses the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarPolicy {
    /// Polar day is Day, polar night is Night.
    #[default]
    Natural,
    /// Refuse to run; the error is reported to the user.
    Fail,
    /// Treat every undefined day as Day.
    Day,
    /// Treat every undefined day as Night.
    Night,
}

impl PolarPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Fail => "fail",
            Self::Day => "day",
            Self::Night => "night",
        }
    }
}

/// The day's schedule: a regular boundary, or one phase all day long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Daylight {
    Cycle(DayBoundary),
    Constant { phase: Phase },
}

impl Daylight {
    /// Compute the schedule for `day_of_year`, applying `policy` when the
    /// geometry is undefined.
    pub fn compute(
        geo: &GeoConfig,
        day_of_year: u32,
        policy: PolarPolicy,
    ) -> Result<Self, SolarError> {
        match solar::calculate_day(day_of_year, geo) {
            Ok((sunrise, sunset)) => Ok(Self::Cycle(DayBoundary::new(sunrise, sunset))),
            Err(err) => {
                let Some(polar_day) = err.is_polar_day() else {
                    return Err(err);
                };
                let phase = match policy {
                    PolarPolicy::Fail => return Err(err),
                    PolarPolicy::Day => Phase::Day,
                    PolarPolicy::Night => Phase::Night,
                    PolarPolicy::Natural if polar_day => Phase::Day,
                    PolarPolicy::Natural => Phase::Night,
                };
                Ok(Self::Constant { phase })
            }
        }
    }

    pub fn classify(&self, now_minutes: u32) -> Phase {
        match self {
            Self::Cycle(boundary) => phase::classify(now_minutes, boundary),
            Self::Constant { phase } => *phase,
        }
    }

    pub fn boundary(&self) -> Option<&DayBoundary> {
        match self {
            Self::Cycle(boundary) => Some(boundary),
            Self::Constant { .. } => None,
        }
    }

    /// Log the schedule as a block.
    pub fn log_summary(&self) {
        match self {
            Self::Cycle(boundary) => {
                log_decorated!(
                    "Sunrise {} {}  Sunset {} {}",
                    format_minutes(boundary.sunrise_minutes),
                    Phase::Day.symbol(),
                    format_minutes(boundary.sunset_minutes),
                    Phase::Night.symbol()
                );
                if boundary.wraps_midnight() {
                    log_indented!("Sunset falls after midnight at this UTC offset");
                }
                if let Some((opens, closes)) = boundary.day_window() {
                    log_indented!(
                        "Day runs {} to {} with the twilight buffer",
                        format_minutes(opens),
                        format_minutes(closes)
                    );
                }
            }
            Self::Constant { phase } => {
                log_decorated!(
                    "The sun does not cross the horizon today, staying in {} mode {}",
                    phase.display_name().to_lowercase(),
                    phase.symbol()
                );
            }
        }
    }
}
