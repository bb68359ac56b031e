//! Actions run when the phase changes.
//!
//! Each phase may have its own [`PhaseHook`]; a phase without one falls back
//! to the default hook, which normally records the light or dark background
//! setting (see [`background::BackgroundHook`]).
//!
//! ## Hook implementations
//!
//! - [`command::CommandHook`]: runs a shell command from the configuration
//! - [`background::BackgroundHook`]: writes `light` or `dark` to a file
//! - [`FnHook`]: wraps a closure, for embedding the tracker in other programs
//! - [`LogHook`]: only logs, used by the `simulate` command

pub mod background;
pub mod command;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::phase::{Phase, TransitionEvent};

pub use background::BackgroundHook;
pub use command::CommandHook;

/// Something that can react to entering a phase.
pub trait PhaseHook {
    /// Short human-readable name for log output.
    fn name(&self) -> &str;

    /// Perform the action for `phase`.
    fn run(&mut self, phase: Phase) -> Result<()>;
}

/// Adapts a closure into a [`PhaseHook`].
pub struct FnHook<F> {
    name: String,
    action: F,
}

impl<F> FnHook<F>
where
    F: FnMut(Phase) -> Result<()>,
{
    pub fn new(name: impl Into<String>, action: F) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

impl<F> PhaseHook for FnHook<F>
where
    F: FnMut(Phase) -> Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, phase: Phase) -> Result<()> {
        (self.action)(phase)
    }
}

/// Logs the background that would be applied without touching anything.
pub struct LogHook;

impl PhaseHook for LogHook {
    fn name(&self) -> &str {
        "log"
    }

    fn run(&mut self, phase: Phase) -> Result<()> {
        log_indented!("Background set to {}", phase.background());
        Ok(())
    }
}

/// Routes transition events to the hook registered for the entered phase.
pub struct Hooks {
    day: Option<Box<dyn PhaseHook>>,
    night: Option<Box<dyn PhaseHook>>,
    fallback: Box<dyn PhaseHook>,
}

impl Hooks {
    /// Hooks with only a fallback; every phase uses it.
    pub fn new(fallback: Box<dyn PhaseHook>) -> Self {
        Self {
            day: None,
            night: None,
            fallback,
        }
    }

    pub fn with_day_hook(mut self, hook: Box<dyn PhaseHook>) -> Self {
        self.day = Some(hook);
        self
    }

    pub fn with_night_hook(mut self, hook: Box<dyn PhaseHook>) -> Self {
        self.night = Some(hook);
        self
    }

    /// Build hooks from configuration: `day_command`/`night_command` when set,
    /// the background file otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        let background_path = match &config.background_file {
            Some(path) => path.clone(),
            None => BackgroundHook::default_path()
                .context("Failed to determine where to store the background setting")?,
        };

        let background = BackgroundHook::new(background_path);
        log_debug!("Background file: {}", background.path().display());

        let mut hooks = Self::new(Box::new(background));
        if let Some(command) = &config.day_command {
            hooks = hooks.with_day_hook(Box::new(CommandHook::new(command)));
        }
        if let Some(command) = &config.night_command {
            hooks = hooks.with_night_hook(Box::new(CommandHook::new(command)));
        }
        Ok(hooks)
    }

    /// The hook that handles `phase`.
    pub fn hook_for(&self, phase: Phase) -> &dyn PhaseHook {
        let hook = match phase {
            Phase::Day => self.day.as_ref(),
            Phase::Night => self.night.as_ref(),
        };
        &**hook.unwrap_or(&self.fallback)
    }

    /// Run the hook for the phase entered by `event`.
    pub fn dispatch(&mut self, event: &TransitionEvent) -> Result<()> {
        let hook = match event.phase {
            Phase::Day => self.day.as_mut(),
            Phase::Night => self.night.as_mut(),
        }
        .unwrap_or(&mut self.fallback);

        let name = hook.name().to_string();
        log_debug!("Running {name} hook for {}", event.phase);
        hook.run(event.phase)
            .with_context(|| format!("{name} hook failed for {} mode", event.phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn PhaseHook> {
        let log = Rc::clone(log);
        let tag = name.to_string();
        Box::new(FnHook::new(name, move |phase: Phase| {
            log.borrow_mut().push(format!("{tag}:{}", phase.as_str()));
            Ok(())
        }))
    }

    fn event(phase: Phase) -> TransitionEvent {
        TransitionEvent {
            phase,
            at_minutes: 0,
            initial: false,
        }
    }

    #[test]
    fn test_fallback_handles_both_phases() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = Hooks::new(recorder("fallback", &log));

        hooks.dispatch(&event(Phase::Day)).unwrap();
        hooks.dispatch(&event(Phase::Night)).unwrap();
        assert_eq!(*log.borrow(), vec!["fallback:day", "fallback:night"]);
    }

    #[test]
    fn test_registered_hook_replaces_fallback_for_its_phase_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks =
            Hooks::new(recorder("fallback", &log)).with_night_hook(recorder("night", &log));

        hooks.dispatch(&event(Phase::Day)).unwrap();
        hooks.dispatch(&event(Phase::Night)).unwrap();
        assert_eq!(*log.borrow(), vec!["fallback:day", "night:night"]);
        assert_eq!(hooks.hook_for(Phase::Night).name(), "night");
        assert_eq!(hooks.hook_for(Phase::Day).name(), "fallback");
    }

    #[test]
    fn test_hook_error_carries_context() {
        let mut hooks = Hooks::new(Box::new(FnHook::new("broken", |_: Phase| {
            anyhow::bail!("display server went away")
        })));

        let err = hooks.dispatch(&event(Phase::Day)).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("broken hook failed for Day mode"));
        assert!(chain.contains("display server went away"));
    }
}
