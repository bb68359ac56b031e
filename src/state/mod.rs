//! State directory resolution, following the XDG Base Directory layout.
//!
//! State (the recorded background setting) lives in
//! `$XDG_STATE_HOME/sunphase`, falling back to `~/.local/state/sunphase`,
//! keeping it apart from the configuration directory.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the sunphase state directory. The directory is not created.
pub fn get_state_dir() -> Result<PathBuf> {
    let state_home = match std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .context("Could not determine home directory for state storage")?
            .join(".local")
            .join("state"),
    };
    Ok(state_home.join("sunphase"))
}
