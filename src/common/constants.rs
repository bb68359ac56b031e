//! Application-wide constants: defaults, validation limits and exit codes.

// # Solar calculation

/// Half-width of the civil-twilight buffer applied around sunrise and sunset.
///
/// The day window is `(sunrise - TWILIGHT_HALF_MARGIN, sunset + TWILIGHT_HALF_MARGIN)`,
/// giving a total twilight allowance of 30 minutes per boundary.
pub const TWILIGHT_HALF_MARGIN: i32 = 15;

/// Zenith angle in degrees at which the sun is treated as crossing the horizon.
pub const ZENITH_DEGREES: f64 = 90.0;

/// Minutes in one day; valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 1440;

// # Configuration defaults

pub const DEFAULT_UPDATE_INTERVAL: u64 = 60; // seconds

// # Validation limits

pub const MINIMUM_UPDATE_INTERVAL: u64 = 10;
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 3600;

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

/// Real-world UTC offsets span UTC-12 (Baker Island) to UTC+14 (Line Islands).
pub const MINIMUM_UTC_OFFSET: i32 = -12;
pub const MAXIMUM_UTC_OFFSET: i32 = 14;

// # Files

pub const CONFIG_FILE_NAME: &str = "sunphase.toml";
pub const GEO_FILE_NAME: &str = "geo.toml";
pub const BACKGROUND_FILE_NAME: &str = "background";

/// Environment variable exported to phase commands.
pub const PHASE_ENV_VAR: &str = "SUNPHASE_PHASE";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
