//! Command-line command handlers for sunphase.
//!
//! `run` is handled by [`crate::Sunphase`]; the one-shot `times` command and
//! the `simulate` command live here, each in its own submodule.

pub mod simulate;
pub mod times;

use anyhow::Result;
use chrono::FixedOffset;

use crate::config::Config;
use crate::geo::GeoConfig;
use crate::time_source;

/// Load the configuration and derive the location and local offset from it.
pub(crate) fn load_location() -> Result<(Config, GeoConfig, FixedOffset)> {
    let config = Config::load()?;
    let geo = config.geo()?;
    let offset = time_source::offset_from_hours(geo.utc_offset())?;
    Ok((config, geo, offset))
}
