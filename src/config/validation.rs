//! Configuration validation.
//!
//! Rejects values the solar calculation or the main loop cannot work with,
//! naming the offending field and its allowed range.

use anyhow::Result;

use super::Config;
use crate::common::constants::*;

/// Validate every field that is present. Missing fields are checked separately
/// once defaults have been applied.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&lat)
    {
        anyhow::bail!(
            "latitude must be between {} and {} degrees (got {})",
            MINIMUM_LATITUDE,
            MAXIMUM_LATITUDE,
            lat
        );
    }

    if let Some(lon) = config.longitude
        && !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between {} and {} degrees (got {})",
            MINIMUM_LONGITUDE,
            MAXIMUM_LONGITUDE,
            lon
        );
    }

    if let Some(offset) = config.utc_offset
        && !(MINIMUM_UTC_OFFSET..=MAXIMUM_UTC_OFFSET).contains(&offset)
    {
        anyhow::bail!(
            "utc_offset ({} hours) must be between {} and {} hours",
            offset,
            MINIMUM_UTC_OFFSET,
            MAXIMUM_UTC_OFFSET
        );
    }

    if let Some(interval) = config.update_interval
        && !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "update_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_UPDATE_INTERVAL,
            MAXIMUM_UPDATE_INTERVAL
        );
    }

    for (field, command) in [
        ("day_command", &config.day_command),
        ("night_command", &config.night_command),
    ] {
        if let Some(command) = command
            && command.trim().is_empty()
        {
            anyhow::bail!("{field} is empty; remove it to use the default background action");
        }
    }

    if let Some(path) = &config.background_file
        && path.as_os_str().is_empty()
    {
        anyhow::bail!("background_file is empty");
    }

    Ok(())
}

/// Require the fields the solar calculation cannot run without.
pub fn validate_required(config: &Config) -> Result<()> {
    match (config.latitude, config.longitude) {
        (Some(_), Some(_)) => Ok(()),
        (None, None) => anyhow::bail!("latitude and longitude are not configured"),
        (None, Some(_)) => anyhow::bail!("latitude is not configured"),
        (Some(_), None) => anyhow::bail!("longitude is not configured"),
    }
}
