//! Implementation of the `simulate` command.
//!
//! Installs a fast-forward [`SimulatedTimeSource`] and runs the normal main
//! loop from a start to an end time, so a user can check when their location
//! switches between day and night without waiting. Hooks are replaced by a
//! logging-only hook; nothing outside the log is touched.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::core::{Core, CoreParams};
use crate::hooks::{Hooks, LogHook};
use crate::signals::SignalState;
use crate::time_source::{self, SimulatedTimeSource};

/// Accepted format for simulation start and end times
const SIMULATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Handle the `simulate` command.
///
/// # Arguments
/// * `start_time` - Local start time as "YYYY-MM-DD HH:MM"
/// * `end_time` - Local end time as "YYYY-MM-DD HH:MM"
pub fn handle_simulate_command(start_time: &str, end_time: &str) -> Result<()> {
    let (config, geo, offset) = super::load_location()?;

    let start = parse_local_time(start_time, offset).context("Invalid start time")?;
    let end = parse_local_time(end_time, offset).context("Invalid end time")?;
    if end <= start {
        anyhow::bail!("End time must be after start time");
    }

    // Install the simulated clock before any logging so timestamps use it
    let simulated = Arc::new(SimulatedTimeSource::new(start, end));
    time_source::init_time_source(simulated.clone())?;
    time_source::set_clock_offset(offset);

    log_version!();
    log_block_start!("Simulation mode");
    log_decorated!(
        "Simulating from {} to {} (UTC{:+})",
        start.with_timezone(&offset).format(SIMULATE_TIME_FORMAT),
        end.with_timezone(&offset).format(SIMULATE_TIME_FORMAT),
        geo.utc_offset()
    );
    let duration = end.signed_duration_since(start);
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    log_indented!("Hooks are not run, phase changes are only logged");

    let core = Core::new(CoreParams {
        geo,
        refresh: config.refresh_policy(),
        polar: config.polar_policy(),
        interval: config.update_interval(),
        hooks: Hooks::new(Box::new(LogHook)),
        signal_state: SignalState::detached(),
        time: simulated,
        offset,
    })?;
    core.execute()?;

    log_end!();
    Ok(())
}

/// Parse "YYYY-MM-DD HH:MM" as a local time at `offset`.
pub fn parse_local_time(text: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), SIMULATE_TIME_FORMAT)
        .with_context(|| format!("'{text}' is not in the form YYYY-MM-DD HH:MM"))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .with_context(|| format!("'{text}' does not exist at UTC offset {offset}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_time_applies_offset() {
        let offset = time_source::offset_from_hours(2).unwrap();
        let parsed = parse_local_time("2024-06-20 01:30", offset).unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2024, 6, 19, 23, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_local_time_rejects_bad_input() {
        let offset = time_source::offset_from_hours(0).unwrap();
        assert!(parse_local_time("2024-06-20", offset).is_err());
        assert!(parse_local_time("2024-06-20 25:00", offset).is_err());
        assert!(parse_local_time("yesterday", offset).is_err());
    }
}
