//! Configuration loading.
//!
//! Handles locating `sunphase.toml`, merging the `geo.toml` override,
//! validation, and filling in defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::{validate_config, validate_required};
use super::{Config, GeoOverride};
use crate::common::constants::*;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of `sunphase.toml`, honouring `--config`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("sunphase").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard location.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        anyhow::bail!(
            "No configuration found at {}\n\
             Create it with at least:\n\n    latitude = <degrees north>\n    longitude = <degrees east>",
            config_path.display()
        );
    }

    load_from_path(&config_path)
}

/// Load configuration from a specific path, merging any `geo.toml` that sits
/// next to it.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let mut config = parse(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    // geo.toml values are validated along with the rest
    load_geo_override_from_path(&mut config, path)?;

    validate_config(&config)?;
    validate_required(&config)?;
    apply_defaults(&mut config, host_utc_offset_hours);

    Ok(config)
}

/// Parse TOML text into a configuration without defaults or validation.
pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Apply `geo.toml` from the config file's directory, if present.
fn load_geo_override_from_path(config: &mut Config, config_path: &Path) -> Result<()> {
    let Some(geo_path) = config_path.parent().map(|dir| dir.join(GEO_FILE_NAME)) else {
        return Ok(());
    };
    if !geo_path.exists() {
        return Ok(());
    }

    let content = fs::read_to_string(&geo_path)
        .with_context(|| format!("Failed to read {}", geo_path.display()))?;
    let geo: GeoOverride = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", geo_path.display()))?;

    if geo.latitude.is_some() {
        config.latitude = geo.latitude;
    }
    if geo.longitude.is_some() {
        config.longitude = geo.longitude;
    }
    Ok(())
}

/// Fill in defaults for every optional setting that has one.
pub(crate) fn apply_defaults(config: &mut Config, host_offset_hours: impl FnOnce() -> i32) {
    config.update_interval.get_or_insert(DEFAULT_UPDATE_INTERVAL);
    config.refresh.get_or_insert_with(Default::default);
    config.polar.get_or_insert_with(Default::default);
    config.utc_offset.get_or_insert_with(host_offset_hours);
}

/// The host's current UTC offset, rounded to whole hours.
pub fn host_utc_offset_hours() -> i32 {
    let seconds = chrono::Local::now().offset().local_minus_utc();
    offset_seconds_to_hours(seconds)
}

pub(crate) fn offset_seconds_to_hours(seconds: i32) -> i32 {
    if seconds % 3600 != 0 {
        log_pipe!();
        log_warning!(
            "Host UTC offset {:+}:{:02} is not a whole hour, rounding",
            seconds / 3600,
            (seconds.abs() % 3600) / 60
        );
        log_indented!("Set utc_offset in the configuration to choose explicitly");
    }
    ((seconds as f64) / 3600.0)
        .round()
        .clamp(MINIMUM_UTC_OFFSET as f64, MAXIMUM_UTC_OFFSET as f64) as i32
}
