//! Configuration system for sunphase.
//!
//! Settings are read from `sunphase.toml` in `$XDG_CONFIG_HOME/sunphase/`
//! (or the directory given with `--config`):
//!
//! ```toml
//! #[Location]
//! latitude = 51.5          # Geographic latitude (-90 to 90)
//! longitude = -0.13        # Geographic longitude (-180 to 180)
//! utc_offset = 1           # Whole hours east of UTC (-12 to 14), defaults to the host offset
//!
//! #[Schedule]
//! update_interval = 60     # Seconds between checks (10-3600)
//! refresh = "daily"        # Recompute sunrise/sunset "daily" or "once" at startup
//! polar = "natural"        # Days without sunrise or sunset: "natural", "fail", "day", "night"
//!
//! #[Actions]
//! day_command = "gsettings set org.gnome.desktop.interface color-scheme default"
//! night_command = "gsettings set org.gnome.desktop.interface color-scheme prefer-dark"
//! background_file = "/run/user/1000/background"  # Written when a phase has no command
//! ```
//!
//! An optional `geo.toml` in the same directory overrides `latitude` and
//! `longitude`, so the location can be kept out of a shared configuration.
//!
//! Latitude and longitude are required; everything else has a default.

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::common::constants::*;
use crate::geo::{GeoConfig, PolarPolicy};

pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// When the day's sunrise and sunset are recalculated.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Recalculate whenever the local date changes.
    #[default]
    Daily,
    /// Calculate once at startup and keep the result for the whole run.
    Once,
}

impl RefreshPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Once => "once",
        }
    }
}

/// Contents of the optional `geo.toml` next to the main configuration.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GeoOverride {
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
}

/// Settings loaded from `sunphase.toml`.
///
/// Every field is optional in the file. After [`load`] the defaults are
/// filled in, so only `day_command`, `night_command` and `background_file`
/// can still be `None`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Geographic latitude in degrees (-90 to +90)
    pub latitude: Option<f64>,
    /// Geographic longitude in degrees (-180 to +180)
    pub longitude: Option<f64>,
    /// Whole hours east of UTC used for all local times
    pub utc_offset: Option<i32>,

    /// Seconds between phase checks
    pub update_interval: Option<u64>,
    pub refresh: Option<RefreshPolicy>,
    pub polar: Option<PolarPolicy>,

    /// Shell command run on entering daytime
    pub day_command: Option<String>,
    /// Shell command run on entering nighttime
    pub night_command: Option<String>,
    /// Where the default action records `light` or `dark`
    pub background_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// The validated location for solar calculations.
    pub fn geo(&self) -> Result<GeoConfig> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            anyhow::bail!("latitude and longitude must both be configured");
        };
        let utc_offset = self.utc_offset.unwrap_or_else(loading::host_utc_offset_hours);
        GeoConfig::new(latitude, longitude, utc_offset).context("Invalid location")
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL))
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh.unwrap_or_default()
    }

    pub fn polar_policy(&self) -> PolarPolicy {
        self.polar.unwrap_or_default()
    }

    /// Log the effective configuration as a block.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            let lat_dir = if lat >= 0.0 { "N" } else { "S" };
            let lon_dir = if lon >= 0.0 { "E" } else { "W" };
            log_indented!(
                "Location: {:.3}°{}, {:.3}°{}",
                lat.abs(),
                lat_dir,
                lon.abs(),
                lon_dir
            );
        }
        if let Some(offset) = self.utc_offset {
            log_indented!("UTC offset: {offset:+} h");
        }
        log_indented!("Update interval: {} seconds", self.update_interval().as_secs());
        log_indented!("Refresh: {}", self.refresh_policy().as_str());
        log_indented!("Polar days: {}", self.polar_policy().as_str());

        match &self.day_command {
            Some(command) => log_indented!("Day command: {command}"),
            None => log_indented!("Day action: light background"),
        }
        match &self.night_command {
            Some(command) => log_indented!("Night command: {command}"),
            None => log_indented!("Night action: dark background"),
        }
    }
}
