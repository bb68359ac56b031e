//! Location-based sunrise/sunset calculations.
//!
//! ## Module Structure
//!
//! - [`solar`]: the solar-position calculator producing local minutes since midnight
//! - [`boundary`]: per-day boundaries, twilight-buffered classification and the
//!   fallback used inside the polar circles

pub mod boundary;
pub mod solar;

pub use boundary::{DayBoundary, Daylight, PolarPolicy};
pub use solar::{GeoConfig, SolarError, SolarEvent, calculate, calculate_day, format_minutes};
