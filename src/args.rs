//! Command-line argument parsing and processing.
//!
//! This module turns the raw argument list into a [`CliAction`]. It supports
//! the `run`, `times` and `simulate` commands, the standard help, version and
//! debug flags, and `--config` for a custom configuration directory. Unknown
//! options lead to the help text rather than a guess.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Watch the clock and apply phase changes (the default)
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print sunrise, sunset and the current phase for one day
    Times {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// Local date as `YYYY-MM-DD`, today if omitted
        date: Option<String>,
        json: bool,
    },
    /// Fast-forward through a period of local time, logging each transition
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// Local time as `YYYY-MM-DD HH:MM`
        start_time: String,
        /// Local time as `YYYY-MM-DD HH:MM`
        end_time: String,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first element is the program name and is skipped. `--version`
    /// takes precedence over `--help`, which takes precedence over
    /// everything else.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut date: Option<String> = None;
        let mut json = false;
        let mut unknown_arg_found = false;
        let mut positionals: Vec<String> = Vec::new();

        let mut iter = args_vec.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => match iter.next() {
                    Some(dir) => config_dir = Some(dir),
                    None => unknown_arg_found = true,
                },
                "--date" => match iter.next() {
                    Some(value) => date = Some(value),
                    None => unknown_arg_found = true,
                },
                "--json" => json = true,
                flag if flag.starts_with('-') => unknown_arg_found = true,
                _ => positionals.push(arg),
            }
        }

        if unknown_arg_found {
            return ParsedArgs {
                action: CliAction::ShowHelpDueToError,
            };
        }

        let times_options = date.is_some() || json;
        let (command, rest) = match positionals.split_first() {
            Some((command, rest)) => (Some(command.as_str()), rest),
            None => (None, &[][..]),
        };

        let action = match (command, rest.len()) {
            (None, _) | (Some("run" | "r"), 0) if !times_options => CliAction::Run {
                debug_enabled,
                config_dir,
            },
            (Some("times" | "t"), 0) => CliAction::Times {
                debug_enabled,
                config_dir,
                date,
                json,
            },
            (Some("simulate" | "S"), 2) if !times_options => CliAction::Simulate {
                debug_enabled,
                config_dir,
                start_time: rest[0].clone(),
                end_time: rest[1].clone(),
            },
            // Unquoted `simulate 2024-06-20 00:00 2024-06-21 00:00`
            (Some("simulate" | "S"), 4) if !times_options => CliAction::Simulate {
                debug_enabled,
                config_dir,
                start_time: format!("{} {}", rest[0], rest[1]),
                end_time: format!("{} {}", rest[2], rest[3]),
            },
            _ => CliAction::ShowHelpDueToError,
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::common::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("sunphase [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("run, r                 Watch for sunrise and sunset (default)");
    log_indented!("times, t               Print today's sunrise, sunset and phase");
    log_indented!("    --date <YYYY-MM-DD>  Print times for another day");
    log_indented!("    --json               Print as JSON");
    log_indented!("simulate, S <start> <end>");
    log_indented!("                       Fast-forward from <start> to <end>, logging each");
    log_indented!("                       change; times are local \"YYYY-MM-DD HH:MM\"");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(debug_enabled: bool, config_dir: Option<&str>) -> CliAction {
        CliAction::Run {
            debug_enabled,
            config_dir: config_dir.map(String::from),
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["sunphase"]);
        assert_eq!(parsed.action, run(false, None));
    }

    #[test]
    fn test_parse_debug_flags() {
        assert_eq!(
            ParsedArgs::parse(vec!["sunphase", "--debug"]).action,
            run(true, None)
        );
        assert_eq!(
            ParsedArgs::parse(vec!["sunphase", "-d", "run"]).action,
            run(true, None)
        );
    }

    #[test]
    fn test_parse_config_dir() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "--config", "/tmp/sp", "-d"]);
        assert_eq!(parsed.action, run(true, Some("/tmp/sp")));

        let parsed = ParsedArgs::parse(vec!["sunphase", "-c"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "--help", "--version", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);

        let parsed = ParsedArgs::parse(vec!["sunphase", "times", "-h"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "--debug", "--invalid"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_unknown_command() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "sunrise"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_times() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "times", "--date", "2024-06-20", "--json"]);
        assert_eq!(
            parsed.action,
            CliAction::Times {
                debug_enabled: false,
                config_dir: None,
                date: Some("2024-06-20".to_string()),
                json: true,
            }
        );

        let parsed = ParsedArgs::parse(vec!["sunphase", "t"]);
        assert_eq!(
            parsed.action,
            CliAction::Times {
                debug_enabled: false,
                config_dir: None,
                date: None,
                json: false,
            }
        );
    }

    #[test]
    fn test_times_options_need_times_command() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "--json"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);

        let parsed = ParsedArgs::parse(vec!["sunphase", "times", "--date"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate_quoted() {
        let parsed = ParsedArgs::parse(vec![
            "sunphase",
            "-d",
            "simulate",
            "2024-06-20 00:00",
            "2024-06-22 00:00",
        ]);
        assert_eq!(
            parsed.action,
            CliAction::Simulate {
                debug_enabled: true,
                config_dir: None,
                start_time: "2024-06-20 00:00".to_string(),
                end_time: "2024-06-22 00:00".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_simulate_unquoted() {
        let parsed = ParsedArgs::parse(vec![
            "sunphase",
            "S",
            "2024-06-20",
            "00:00",
            "2024-06-22",
            "12:30",
        ]);
        assert_eq!(
            parsed.action,
            CliAction::Simulate {
                debug_enabled: false,
                config_dir: None,
                start_time: "2024-06-20 00:00".to_string(),
                end_time: "2024-06-22 12:30".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_simulate_missing_end() {
        let parsed = ParsedArgs::parse(vec!["sunphase", "simulate", "2024-06-20 00:00"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }
}
