//! Application coordinator that manages the lifecycle of a `run`.
//!
//! It loads the configuration, resolves the location and hooks, installs
//! signal handling and then hands everything to [`Core`]:
//!
//! - Normal startup: `Sunphase::new(debug_enabled).run()`
//! - Embedded without the header line: `Sunphase::new(false).without_headers().run()`

use anyhow::{Context, Result};

use crate::{
    config::{self, Config},
    core::{Core, CoreParams},
    hooks::Hooks,
    signals::setup_signal_handler,
    time_source,
};

/// Builder for configuring and running the sunphase application.
///
/// ```no_run
/// use sunphase::Sunphase;
///
/// # fn main() -> anyhow::Result<()> {
/// Sunphase::new(false).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Sunphase {
    debug_enabled: bool,
    show_headers: bool,
}

impl Sunphase {
    /// Create a new runner with defaults matching a normal run
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
        }
    }

    /// Skip the version header
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Execute the application until a shutdown signal arrives.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
        }
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Debug mode enabled, showing hook and refresh details");
        }

        let config = Config::load().context("Configuration failed")?;

        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", custom_dir.display());
        }
        config.log_config();

        let geo = config.geo()?;
        let offset = time_source::offset_from_hours(geo.utc_offset())?;
        time_source::set_clock_offset(offset);

        let hooks = Hooks::from_config(&config)?;
        let signal_state = setup_signal_handler()?;

        let core = Core::new(CoreParams {
            geo,
            refresh: config.refresh_policy(),
            polar: config.polar_policy(),
            interval: config.update_interval(),
            hooks,
            signal_state,
            time: time_source::current(),
            offset,
        })?;
        core.execute()?;

        log_end!();
        Ok(())
    }
}
