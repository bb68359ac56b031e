//! Structured logging with box-drawing output.
//!
//! Every line is written through [`write_output`] so that logging can be
//! silenced at runtime (tests, `times --json`) and so that simulated runs get a
//! `[HH:MM:SS]` prefix showing the simulated clock.
//!
//! ## Conventions
//!
//! - `log_version!` opens the run: `┏ sunphase vX.Y.Z ━━╸`
//! - `log_block_start!` starts a conceptual block: an empty `┃` line, then `┣ message`
//! - `log_decorated!` continues a block: `┣ message`
//! - `log_indented!` adds detail under the previous line: `┃   message`
//! - `log_pipe!` inserts a bare `┃` before a `log_warning!`/`log_error!` group
//! - `log_end!` closes the run: `╹`
//! - `log_info!`, `log_warning!`, `log_error!`, `log_critical!` use a colored `[LEVEL]` prefix
//! - `log_debug!` only prints when debug output was enabled with [`Log::set_debug`]

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Runtime switches for the logging macros.
pub struct Log;

impl Log {
    /// Enable or disable all logging output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Timestamp prefix for simulated runs, empty otherwise.
    pub fn get_timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now_local().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Write an already formatted line to stdout. Public for macro access.
pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

/// Shared implementation behind the public macros: `$layout` receives the
/// timestamp prefix and the formatted message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($layout:expr, $($arg:tt)+) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($($arg)+);
            let layout: fn(&str, &str) -> String = $layout;
            $crate::common::logger::write_output(&layout(&prefix, &message));
        }
    }};
}

/// Log a decorated message as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), $($arg)+)
    };
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), $($arg)+)
    };
}

/// Log a bare pipe for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!(|p, _| format!("{p}┃\n"), "")
    };
}

/// Start a new block of related messages.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), $($arg)+)
    };
}

/// Log the application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            |p, m| format!("{p}┏ sunphase v{m} ━━╸\n"),
            "{}",
            env!("CARGO_PKG_VERSION")
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!(|p, _| format!("{p}╹\n"), "")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"), $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"), $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"), $($arg)+)
    };
}

/// Log an error that ends the current flow: a pipe, then `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"), $($arg)+)
    };
}

#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)+) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mCRITICAL\x1b[0m] {m}\n"), $($arg)+)
    };
}

/// Log a debug message; silent unless debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        if $crate::common::logger::Log::is_debug() {
            $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"), $($arg)+)
        }
    };
}
