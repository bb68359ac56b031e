//! Time source abstraction for real and simulated time.
//!
//! The main loop reads the clock and sleeps through a [`TimeSource`], so the
//! `simulate` command can fast-forward through days of transitions in an
//! instant. A process-wide source is installed once at startup; it defaults to
//! [`RealTimeSource`].

use anyhow::Result;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration as StdDuration;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Offset used to display simulated timestamps
static CLOCK_OFFSET: OnceLock<FixedOffset> = OnceLock::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Fast-forward time source: every sleep advances the clock instantly.
pub struct SimulatedTimeSource {
    current: Mutex<DateTime<Utc>>,
    end_time: DateTime<Utc>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start_time),
            end_time,
        }
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, duration: StdDuration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let step = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);
        *current = current
            .checked_add_signed(step)
            .unwrap_or(self.end_time)
            .min(self.end_time);
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.now() >= self.end_time
    }
}

/// Install the process-wide time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) -> Result<()> {
    TIME_SOURCE
        .set(source)
        .map_err(|_| anyhow::anyhow!("Time source already initialized"))
}

/// Set the UTC offset used for timestamps in log output.
pub fn set_clock_offset(offset: FixedOffset) {
    let _ = CLOCK_OFFSET.set(offset);
}

/// The process-wide time source, installing the real clock if none was set.
pub fn current() -> Arc<dyn TimeSource> {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .clone()
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

pub fn is_simulated() -> bool {
    TIME_SOURCE.get().is_some_and(|source| source.is_simulated())
}

pub fn now() -> DateTime<Utc> {
    current().now()
}

/// Current time in the offset registered with [`set_clock_offset`] (UTC if none).
pub fn now_local() -> DateTime<FixedOffset> {
    let offset = CLOCK_OFFSET.get().copied().unwrap_or_else(|| Utc.fix());
    now().with_timezone(&offset)
}

/// Build a fixed offset from whole hours east of UTC.
pub fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| anyhow::anyhow!("UTC offset of {hours} hours is out of range"))
}

/// A moment of local time reduced to what the phase calculation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    pub date: NaiveDate,
    /// Day of the year, 1 to 366
    pub day_of_year: u32,
    /// Minutes since local midnight, 0 to 1439
    pub minutes: u32,
}

impl LocalClock {
    pub fn from_datetime(local: &DateTime<FixedOffset>) -> Self {
        Self {
            date: local.date_naive(),
            day_of_year: local.ordinal(),
            minutes: local.hour() * 60 + local.minute(),
        }
    }

    /// Read `source` in the given offset.
    pub fn read(source: &dyn TimeSource, offset: FixedOffset) -> Self {
        Self::from_datetime(&source.now().with_timezone(&offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_simulated_sleep_advances_and_caps() {
        let source = SimulatedTimeSource::new(utc(2024, 6, 20, 0, 0), utc(2024, 6, 20, 1, 0));
        assert!(source.is_simulated());
        assert!(!source.is_ended());

        source.sleep(StdDuration::from_secs(40 * 60));
        assert_eq!(source.now(), utc(2024, 6, 20, 0, 40));

        source.sleep(StdDuration::from_secs(40 * 60));
        assert_eq!(source.now(), utc(2024, 6, 20, 1, 0));
        assert!(source.is_ended());
    }

    #[test]
    fn test_local_clock_applies_offset() {
        let source = SimulatedTimeSource::new(utc(2024, 12, 31, 23, 30), utc(2025, 1, 2, 0, 0));

        let in_utc = LocalClock::read(&source, offset_from_hours(0).unwrap());
        assert_eq!(in_utc.day_of_year, 366);
        assert_eq!(in_utc.minutes, 23 * 60 + 30);

        // Already the next day one hour east
        let east = LocalClock::read(&source, offset_from_hours(1).unwrap());
        assert_eq!(east.day_of_year, 1);
        assert_eq!(east.minutes, 30);
        assert_eq!(east.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_offset_range() {
        assert!(offset_from_hours(14).is_ok());
        assert!(offset_from_hours(-12).is_ok());
        assert!(offset_from_hours(48).is_err());
    }
}
