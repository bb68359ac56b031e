//! The default action: record the light or dark background setting.
//!
//! Editors, terminals and scripts can watch or read this file instead of
//! running their own sunrise calculations.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::PhaseHook;
use crate::common::constants::BACKGROUND_FILE_NAME;
use crate::phase::Phase;

/// Writes `light` or `dark` (plus a newline) to a file.
pub struct BackgroundHook {
    path: PathBuf,
}

impl BackgroundHook {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$XDG_STATE_HOME/sunphase/background`
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::state::get_state_dir()?.join(BACKGROUND_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the currently recorded background, if any.
    pub fn read(path: &Path) -> Option<String> {
        fs::read_to_string(path)
            .ok()
            .map(|content| content.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl PhaseHook for BackgroundHook {
    fn name(&self) -> &str {
        "background"
    }

    fn run(&mut self, phase: Phase) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory {}", parent.display())
            })?;
        }

        // Write then rename so readers never see a partial file
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, format!("{}\n", phase.background()))
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        log_indented!("Background set to {}", phase.background());
        Ok(())
    }
}
