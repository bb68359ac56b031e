//! Main application entry point.
//!
//! Parses the command line and dispatches to the matching action:
//!
//! - `run` (default): `Sunphase::new(debug_enabled).run()`
//! - `times`: `commands::times::handle_times_command`
//! - `simulate`: `commands::simulate::handle_simulate_command`
//!
//! Errors are reported through the logger and turn into a non-zero exit code.

use anyhow::Result;

use sunphase::Sunphase;
use sunphase::args::{self, CliAction, ParsedArgs};
use sunphase::commands;
use sunphase::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use sunphase::common::logger::Log;
use sunphase::config;
use sunphase::{log_error_exit, log_pipe, log_version, log_warning};

fn main() {
    let parsed = ParsedArgs::from_env();

    let code = match dispatch(parsed.action) {
        Ok(code) => code,
        Err(e) => {
            // `times --json` silences the log; errors must still be seen
            Log::set_enabled(true);
            log_error_exit!("{e:#}");
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}

fn dispatch(action: CliAction) -> Result<i32> {
    match action {
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            prepare(debug_enabled, config_dir)?;
            Sunphase::new(debug_enabled).run()?;
        }
        CliAction::Times {
            debug_enabled,
            config_dir,
            date,
            json,
        } => {
            prepare(debug_enabled, config_dir)?;
            commands::times::handle_times_command(date, json)?;
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            start_time,
            end_time,
        } => {
            prepare(debug_enabled, config_dir)?;
            commands::simulate::handle_simulate_command(&start_time, &end_time)?;
        }
        CliAction::ShowHelp => args::display_help(),
        CliAction::ShowVersion => args::display_version_info(),
        CliAction::ShowHelpDueToError => {
            log_version!();
            log_pipe!();
            log_warning!("Unknown or incomplete arguments");
            args::display_help();
            return Ok(EXIT_FAILURE);
        }
    }

    Ok(EXIT_SUCCESS)
}

fn prepare(debug_enabled: bool, config_dir: Option<String>) -> Result<()> {
    Log::set_debug(debug_enabled);
    config::set_config_dir(config_dir)
}
