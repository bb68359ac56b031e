//! Sunrise and sunset times from the simplified solar-position method.
//!
//! The algorithm is the classic almanac approximation: an approximate event
//! time gives the sun's mean anomaly, from which its true longitude, right
//! ascension and declination follow. The local hour angle at which the sun
//! crosses the [`ZENITH_DEGREES`] zenith then yields the event time.
//!
//! Precision is a few minutes, which is plenty for switching a light or dark
//! setting but far from an ephemeris.

use serde::Serialize;
use thiserror::Error;

use crate::common::constants::*;

/// Which horizon crossing to calculate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarEvent {
    Sunrise,
    Sunset,
}

impl SolarEvent {
    /// Nominal local hour used to seed the approximate event time.
    fn nominal_hour(self) -> f64 {
        match self {
            Self::Sunrise => 6.0,
            Self::Sunset => 18.0,
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
        }
    }
}

/// Errors from solar calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolarError {
    #[error("latitude must be between {min} and {max} degrees (got {0})", min = MINIMUM_LATITUDE, max = MAXIMUM_LATITUDE)]
    InvalidLatitude(f64),

    #[error("longitude must be between {min} and {max} degrees (got {0})", min = MINIMUM_LONGITUDE, max = MAXIMUM_LONGITUDE)]
    InvalidLongitude(f64),

    #[error("utc_offset must be between {min} and {max} hours (got {0})", min = MINIMUM_UTC_OFFSET, max = MAXIMUM_UTC_OFFSET)]
    InvalidUtcOffset(i32),

    #[error("day of year must be between 1 and 366 (got {0})")]
    InvalidDayOfYear(u32),

    /// The sun does not cross the horizon on this day at this latitude.
    #[error("no {name} on this day, {reason} (cos H = {cos_hour_angle:.4})", name = .event.noun(), reason = polar_reason(.cos_hour_angle))]
    GeometryUndefined {
        event: SolarEvent,
        cos_hour_angle: f64,
    },
}

fn polar_reason(cos_hour_angle: &f64) -> &'static str {
    if *cos_hour_angle > 1.0 {
        "the sun stays below the horizon"
    } else {
        "the sun stays above the horizon"
    }
}

impl SolarError {
    /// For [`SolarError::GeometryUndefined`], whether the sun stays up all day.
    ///
    /// `cos H > 1` means the sun never reaches the horizon from below (polar
    /// night); `cos H < -1` means it never drops to it (polar day).
    pub fn is_polar_day(&self) -> Option<bool> {
        match self {
            Self::GeometryUndefined { cos_hour_angle, .. } => Some(*cos_hour_angle < -1.0),
            _ => None,
        }
    }
}

/// Observer location and clock offset, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoConfig {
    latitude: f64,
    longitude: f64,
    utc_offset: i32,
}

impl GeoConfig {
    /// Build a location, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64, utc_offset: i32) -> Result<Self, SolarError> {
        if !latitude.is_finite() || !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
            return Err(SolarError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude)
        {
            return Err(SolarError::InvalidLongitude(longitude));
        }
        if !(MINIMUM_UTC_OFFSET..=MAXIMUM_UTC_OFFSET).contains(&utc_offset) {
            return Err(SolarError::InvalidUtcOffset(utc_offset));
        }
        Ok(Self {
            latitude,
            longitude,
            utc_offset,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whole hours east of UTC.
    pub fn utc_offset(&self) -> i32 {
        self.utc_offset
    }
}

fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

/// Bring `value` into `[0, period)`.
fn normalize(value: f64, period: f64) -> f64 {
    value.rem_euclid(period)
}

/// Calculate the local time of a sunrise or sunset as minutes since midnight.
///
/// # Arguments
/// * `event` - Sunrise or sunset
/// * `day_of_year` - Calendar day, 1 to 366
/// * `geo` - Location and UTC offset; the result is in that offset's local time
///
/// # Returns
/// Minutes since local midnight in `0..=1439`, or
/// [`SolarError::GeometryUndefined`] when the sun does not cross the horizon
/// that day (inside the polar circles).
pub fn calculate(event: SolarEvent, day_of_year: u32, geo: &GeoConfig) -> Result<u32, SolarError> {
    if !(1..=366).contains(&day_of_year) {
        return Err(SolarError::InvalidDayOfYear(day_of_year));
    }

    let longitude_hour = geo.longitude / 15.0;
    let approx_time = f64::from(day_of_year) + (event.nominal_hour() - longitude_hour) / 24.0;

    let mean_anomaly = 0.9856 * approx_time - 3.289;

    let true_longitude = normalize(
        mean_anomaly
            + 1.916 * sin_deg(mean_anomaly)
            + 0.020 * sin_deg(2.0 * mean_anomaly)
            + 282.634,
        360.0,
    );

    // Right ascension must sit in the same quadrant as the true longitude
    let mut right_ascension = normalize(
        (0.91764 * tan_deg(true_longitude)).atan().to_degrees(),
        360.0,
    );
    let l_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ra_quadrant = (right_ascension / 90.0).floor() * 90.0;
    right_ascension += l_quadrant - ra_quadrant;
    let right_ascension_hours = right_ascension / 15.0;

    let sin_declination = 0.39782 * sin_deg(true_longitude);
    let cos_declination = sin_declination.asin().cos();

    let cos_hour_angle = (cos_deg(ZENITH_DEGREES) - sin_declination * sin_deg(geo.latitude))
        / (cos_declination * cos_deg(geo.latitude));
    if !(-1.0..=1.0).contains(&cos_hour_angle) {
        return Err(SolarError::GeometryUndefined {
            event,
            cos_hour_angle,
        });
    }

    let hour_angle = cos_hour_angle.acos().to_degrees();
    let hour_angle_hours = match event {
        SolarEvent::Sunrise => 360.0 - hour_angle,
        SolarEvent::Sunset => hour_angle,
    } / 15.0;

    let mean_local_time =
        hour_angle_hours + right_ascension_hours - 0.06571 * approx_time - 6.622;
    let universal_time = normalize(mean_local_time - longitude_hour, 24.0);
    let local_time = normalize(universal_time + f64::from(geo.utc_offset), 24.0);

    Ok(hours_to_minutes(local_time))
}

/// Split fractional hours into whole hours and rounded minutes.
///
/// Rounding can carry 23:59.5 up to 24:00, which wraps to midnight.
fn hours_to_minutes(hours: f64) -> u32 {
    let whole_hours = hours.floor();
    let minutes = ((hours - whole_hours) * 60.0).round();
    (whole_hours * 60.0 + minutes) as u32 % MINUTES_PER_DAY
}

/// Convenience: sunrise and sunset for one day, in that order.
pub fn calculate_day(day_of_year: u32, geo: &GeoConfig) -> Result<(u32, u32), SolarError> {
    Ok((
        calculate(SolarEvent::Sunrise, day_of_year, geo)?,
        calculate(SolarEvent::Sunset, day_of_year, geo)?,
    ))
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
