//! Implementation of the `times` command.
//!
//! Prints the day's sunrise, sunset and twilight-buffered day window for the
//! configured location, plus the current phase when the day is today. With
//! `--json` the same report is printed as JSON and all other logging is
//! suppressed so the output can be piped.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::common::logger::{Log, write_output};
use crate::geo::{Daylight, GeoConfig, PolarPolicy, format_minutes};
use crate::phase::Phase;
use crate::time_source::{self, LocalClock};

/// Sunrise, sunset and phase information for one local date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesReport {
    pub date: NaiveDate,
    pub day_of_year: u32,
    pub location: GeoConfig,
    pub daylight: Daylight,
    /// `HH:MM`, absent when the sun does not rise
    pub sunrise: Option<String>,
    /// `HH:MM`, absent when the sun does not set
    pub sunset: Option<String>,
    /// Start and end of the day window including the twilight buffer
    pub day_window: Option<(String, String)>,
    /// Current local time and phase, only when `date` is today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

impl TimesReport {
    /// Build the report for `date`. `now` is used only if it falls on `date`.
    pub fn build(
        geo: &GeoConfig,
        polar: PolarPolicy,
        date: NaiveDate,
        now: Option<LocalClock>,
    ) -> Result<Self> {
        let day_of_year = date.ordinal();
        let daylight = Daylight::compute(geo, day_of_year, polar)
            .with_context(|| format!("Failed to calculate sunrise and sunset for {date}"))?;

        let boundary = daylight.boundary();
        let now = now.filter(|clock| clock.date == date);

        Ok(Self {
            date,
            day_of_year,
            location: *geo,
            daylight,
            sunrise: boundary.map(|b| format_minutes(b.sunrise_minutes)),
            sunset: boundary.map(|b| format_minutes(b.sunset_minutes)),
            day_window: boundary
                .and_then(|b| b.day_window())
                .map(|(opens, closes)| (format_minutes(opens), format_minutes(closes))),
            now: now.map(|clock| format_minutes(clock.minutes)),
            phase: now.map(|clock| daylight.classify(clock.minutes)),
        })
    }

    fn log(&self) {
        log_block_start!(
            "Sun times for {} (day {})",
            self.date.format("%Y-%m-%d"),
            self.day_of_year
        );
        log_indented!(
            "Location: {:.4}, {:.4} at UTC{:+}",
            self.location.latitude(),
            self.location.longitude(),
            self.location.utc_offset()
        );

        match self.daylight {
            Daylight::Constant { phase } => {
                log_decorated!("No sunrise or sunset, {} all day", phase.as_str());
            }
            Daylight::Cycle(_) => self.daylight.log_summary(),
        }

        if let (Some(now), Some(phase)) = (&self.now, self.phase) {
            log_block_start!("Now {now}: {} {}", phase.display_name(), phase.symbol());
        }
    }
}

/// Handle the `times` command.
pub fn handle_times_command(date: Option<String>, json: bool) -> Result<()> {
    if json {
        Log::set_enabled(false);
    } else {
        log_version!();
    }

    let (config, geo, offset) = super::load_location()?;
    let now = LocalClock::read(time_source::current().as_ref(), offset);

    let date = match date {
        Some(text) => parse_date(&text)?,
        None => now.date,
    };

    let report = TimesReport::build(&geo, config.polar_policy(), date, Some(now))?;

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize times")?;
        write_output(&format!("{text}\n"));
    } else {
        report.log();
        log_end!();
    }

    Ok(())
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{text}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> GeoConfig {
        GeoConfig::new(51.5074, -0.1278, 1).unwrap()
    }

    fn midsummer() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-20").unwrap(), midsummer());
        assert!(parse_date("20/06/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_report_for_regular_day() {
        let now = LocalClock {
            date: midsummer(),
            day_of_year: 172,
            minutes: 12 * 60,
        };
        let report = TimesReport::build(&london(), PolarPolicy::Natural, midsummer(), Some(now))
            .unwrap();

        assert_eq!(report.day_of_year, 172);
        assert!(report.sunrise.as_deref().is_some_and(|t| t.starts_with("04:")));
        assert!(report.sunset.as_deref().is_some_and(|t| t.starts_with("21:")));
        assert_eq!(report.now.as_deref(), Some("12:00"));
        assert_eq!(report.phase, Some(Phase::Day));
    }

    #[test]
    fn test_now_ignored_for_other_dates() {
        let now = LocalClock {
            date: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            day_of_year: 173,
            minutes: 12 * 60,
        };
        let report = TimesReport::build(&london(), PolarPolicy::Natural, midsummer(), Some(now))
            .unwrap();
        assert_eq!(report.now, None);
        assert_eq!(report.phase, None);
    }

    #[test]
    fn test_report_for_polar_night() {
        let tromso = GeoConfig::new(69.6492, 18.9553, 1).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();

        let report = TimesReport::build(&tromso, PolarPolicy::Natural, date, None).unwrap();
        assert_eq!(report.sunrise, None);
        assert_eq!(report.day_window, None);
        assert_eq!(
            report.daylight,
            Daylight::Constant {
                phase: Phase::Night
            }
        );

        assert!(TimesReport::build(&tromso, PolarPolicy::Fail, date, None).is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let report = TimesReport::build(&london(), PolarPolicy::Natural, midsummer(), None).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["date"], "2024-06-20");
        assert_eq!(value["daylight"]["kind"], "cycle");
        assert_eq!(value["location"]["utc_offset"], 1);
        assert!(value.get("phase").is_none());
        assert!(value["day_window"].is_array());
    }
}
