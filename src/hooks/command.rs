//! User-configured shell commands.

use anyhow::{Context, Result};
use std::process::Command;

use super::PhaseHook;
use crate::common::constants::PHASE_ENV_VAR;
use crate::phase::Phase;

/// Runs a command through `sh -c`, exporting the entered phase as
/// `SUNPHASE_PHASE=day|night`. A non-zero exit status is an error.
pub struct CommandHook {
    command: String,
}

impl CommandHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl PhaseHook for CommandHook {
    fn name(&self) -> &str {
        "command"
    }

    fn run(&mut self, phase: Phase) -> Result<()> {
        log_debug!("Executing: {}", self.command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env(PHASE_ENV_VAR, phase.as_str())
            .output()
            .with_context(|| format!("Failed to start command '{}'", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}
