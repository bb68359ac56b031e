//! Core application logic and state management.
//!
//! This module runs the phase-watching loop. Each iteration it:
//!
//! - reads the local clock through the configured [`TimeSource`]
//! - recalculates sunrise and sunset when the local date changes (daily refresh)
//! - classifies the current minute and reports a change of phase
//! - runs the hook registered for the phase that was entered
//!
//! The `Core` struct owns all runtime state, so the loop can be driven by
//! [`Core::execute`] in production or stepped by hand in tests.

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate};
use std::{sync::Arc, time::Duration};

use crate::{
    config::RefreshPolicy,
    geo::{Daylight, GeoConfig, PolarPolicy},
    hooks::Hooks,
    phase::{self, DayPhaseTracker, Phase, TransitionEvent},
    signals::{SignalState, WaitOutcome},
    time_source::{LocalClock, TimeSource},
};

/// Parameters for creating a Core instance.
///
/// Bundles every dependency of the loop so callers can assemble them
/// separately (configuration, simulation, tests).
pub struct CoreParams {
    pub geo: GeoConfig,
    pub refresh: RefreshPolicy,
    pub polar: PolarPolicy,
    /// Time between phase checks
    pub interval: Duration,
    pub hooks: Hooks,
    pub signal_state: SignalState,
    pub time: Arc<dyn TimeSource>,
    /// Offset used to turn the time source's UTC reading into local time
    pub offset: FixedOffset,
}

/// State machine for the main application loop.
pub struct Core {
    geo: GeoConfig,
    refresh: RefreshPolicy,
    polar: PolarPolicy,
    interval: Duration,
    hooks: Hooks,
    signal_state: SignalState,
    time: Arc<dyn TimeSource>,
    offset: FixedOffset,
    tracker: DayPhaseTracker,
    // Local date the tracker's schedule was computed for
    computed_for: NaiveDate,
}

impl Core {
    /// Create a Core, computing the schedule for the current local date.
    ///
    /// Fails if the schedule cannot be computed, which only happens under
    /// [`PolarPolicy::Fail`] on a day without sunrise or sunset.
    pub fn new(params: CoreParams) -> Result<Self> {
        let clock = LocalClock::read(params.time.as_ref(), params.offset);
        let daylight = compute_daylight(&params.geo, &clock, params.polar)?;

        log_block_start!("Sunrise and sunset for {}", clock.date.format("%Y-%m-%d"));
        daylight.log_summary();

        Ok(Self {
            geo: params.geo,
            refresh: params.refresh,
            polar: params.polar,
            interval: params.interval,
            hooks: params.hooks,
            signal_state: params.signal_state,
            time: params.time,
            offset: params.offset,
            tracker: DayPhaseTracker::new(daylight),
            computed_for: clock.date,
        })
    }

    /// The schedule currently used for classification.
    pub fn daylight(&self) -> &Daylight {
        self.tracker.daylight()
    }

    /// The phase observed by the last step, `None` before the first step.
    pub fn phase(&self) -> Option<Phase> {
        self.tracker.phase()
    }

    /// Run the loop until a shutdown is requested or simulated time runs out.
    pub fn execute(mut self) -> Result<()> {
        log_block_start!(
            "Checking every {} seconds ({} refresh)",
            self.interval.as_secs(),
            self.refresh.as_str()
        );

        while self.signal_state.is_running() {
            self.step()?;

            if self.time.is_ended() {
                log_block_start!("Simulation reached its end time");
                break;
            }

            if self.time.is_simulated() {
                self.time.sleep(self.interval);
            } else if self.signal_state.wait(self.interval) == WaitOutcome::Shutdown {
                break;
            }
        }

        log_block_start!("Shutting down sunphase...");
        Ok(())
    }

    /// Perform one check: refresh the schedule if the date changed, then
    /// classify the current minute and run the hook on a phase change.
    ///
    /// A failing hook is logged and does not stop the loop. A failed refresh
    /// is returned as an error.
    pub fn step(&mut self) -> Result<Option<TransitionEvent>> {
        let clock = LocalClock::read(self.time.as_ref(), self.offset);

        if self.refresh == RefreshPolicy::Daily && clock.date != self.computed_for {
            self.refresh_daylight(&clock)?;
        }

        let Some(event) = self.tracker.tick(clock.minutes) else {
            return Ok(None);
        };

        phase::log_transition(&event);
        if let Err(e) = self.hooks.dispatch(&event) {
            log_pipe!();
            log_warning!("{e:#}");
            log_indented!("Continuing, the next change will be applied as usual");
        }

        Ok(Some(event))
    }

    /// Recompute the schedule for a new local date. The tracker keeps its
    /// phase, so this alone never reports a transition.
    fn refresh_daylight(&mut self, clock: &LocalClock) -> Result<()> {
        let daylight = compute_daylight(&self.geo, clock, self.polar)?;

        if daylight != *self.tracker.daylight() {
            log_block_start!(
                "New day {}, recalculated sunrise and sunset",
                clock.date.format("%Y-%m-%d")
            );
            daylight.log_summary();
        } else {
            log_debug!("New day {}, schedule unchanged", clock.date);
        }

        self.tracker.replace_daylight(daylight);
        self.computed_for = clock.date;
        Ok(())
    }
}

fn compute_daylight(geo: &GeoConfig, clock: &LocalClock, polar: PolarPolicy) -> Result<Daylight> {
    Daylight::compute(geo, clock.day_of_year, polar).with_context(|| {
        format!(
            "Failed to calculate sunrise and sunset for {}",
            clock.date.format("%Y-%m-%d")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{FnHook, PhaseHook};
    use crate::time_source::{SimulatedTimeSource, offset_from_hours};
    use chrono::{DateTime, TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Recorded = Rc<RefCell<Vec<Phase>>>;

    fn london() -> GeoConfig {
        GeoConfig::new(51.5074, -0.1278, 1).unwrap()
    }

    fn tromso() -> GeoConfig {
        GeoConfig::new(69.6492, 18.9553, 1).unwrap()
    }

    /// UTC instant for a wall-clock time at UTC+1.
    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        offset_from_hours(1)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn recording_hooks() -> (Hooks, Recorded) {
        let recorded: Recorded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&recorded);
        let hook: Box<dyn PhaseHook> = Box::new(FnHook::new("recorder", move |phase| {
            sink.borrow_mut().push(phase);
            Ok(())
        }));
        (Hooks::new(hook), recorded)
    }

    fn core_for(
        geo: GeoConfig,
        refresh: RefreshPolicy,
        polar: PolarPolicy,
        time: Arc<SimulatedTimeSource>,
        hooks: Hooks,
    ) -> Result<Core> {
        Core::new(CoreParams {
            geo,
            refresh,
            polar,
            interval: Duration::from_secs(60),
            hooks,
            signal_state: SignalState::detached(),
            time,
            offset: offset_from_hours(1).unwrap(),
        })
    }

    #[test]
    fn test_two_days_produce_five_events() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 6, 20, 0, 0),
            local(2024, 6, 22, 0, 0),
        ));
        let (hooks, recorded) = recording_hooks();
        let core = core_for(
            london(),
            RefreshPolicy::Daily,
            PolarPolicy::Natural,
            time,
            hooks,
        )
        .unwrap();

        core.execute().unwrap();

        assert_eq!(
            *recorded.borrow(),
            vec![
                Phase::Night,
                Phase::Day,
                Phase::Night,
                Phase::Day,
                Phase::Night
            ]
        );
    }

    #[test]
    fn test_daily_refresh_recomputes_without_event() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 3, 20, 23, 50),
            local(2024, 3, 21, 1, 0),
        ));
        let (hooks, recorded) = recording_hooks();
        let mut core = core_for(
            london(),
            RefreshPolicy::Daily,
            PolarPolicy::Natural,
            time.clone(),
            hooks,
        )
        .unwrap();

        let first_day = Daylight::compute(&london(), 80, PolarPolicy::Natural).unwrap();
        let second_day = Daylight::compute(&london(), 81, PolarPolicy::Natural).unwrap();
        assert_ne!(first_day, second_day);
        assert_eq!(*core.daylight(), first_day);

        assert!(core.step().unwrap().is_some());
        time.sleep(Duration::from_secs(20 * 60));
        assert!(core.step().unwrap().is_none());

        assert_eq!(*core.daylight(), second_day);
        assert_eq!(*recorded.borrow(), vec![Phase::Night]);
    }

    #[test]
    fn test_once_policy_keeps_first_schedule() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 3, 20, 23, 50),
            local(2024, 3, 21, 1, 0),
        ));
        let (hooks, _) = recording_hooks();
        let mut core = core_for(
            london(),
            RefreshPolicy::Once,
            PolarPolicy::Natural,
            time.clone(),
            hooks,
        )
        .unwrap();

        let first_day = *core.daylight();
        core.step().unwrap();
        time.sleep(Duration::from_secs(20 * 60));
        core.step().unwrap();

        assert_eq!(*core.daylight(), first_day);
    }

    #[test]
    fn test_polar_night_is_constant_under_natural_policy() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 12, 20, 0, 0),
            local(2024, 12, 21, 0, 0),
        ));
        let (hooks, recorded) = recording_hooks();
        let core = core_for(
            tromso(),
            RefreshPolicy::Daily,
            PolarPolicy::Natural,
            time,
            hooks,
        )
        .unwrap();

        assert_eq!(
            *core.daylight(),
            Daylight::Constant {
                phase: Phase::Night
            }
        );
        core.execute().unwrap();
        assert_eq!(*recorded.borrow(), vec![Phase::Night]);
    }

    #[test]
    fn test_fail_policy_rejects_polar_day() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 12, 20, 12, 0),
            local(2024, 12, 21, 0, 0),
        ));
        let (hooks, _) = recording_hooks();
        let result = core_for(
            tromso(),
            RefreshPolicy::Daily,
            PolarPolicy::Fail,
            time,
            hooks,
        );

        let err = result.err().expect("polar night should be rejected");
        assert!(format!("{err:#}").contains("no sunrise"));
    }

    #[test]
    fn test_failing_hook_does_not_stop_loop() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 6, 20, 0, 0),
            local(2024, 6, 21, 0, 0),
        ));
        let attempts = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&attempts);
        let hooks = Hooks::new(Box::new(FnHook::new("broken", move |_| {
            *counter.borrow_mut() += 1;
            anyhow::bail!("display unavailable")
        })));

        let core = core_for(
            london(),
            RefreshPolicy::Daily,
            PolarPolicy::Natural,
            time,
            hooks,
        )
        .unwrap();
        core.execute().unwrap();

        // Night at midnight, day after sunrise, night after sunset
        assert_eq!(*attempts.borrow(), 3);
    }

    #[test]
    fn test_shutdown_before_start_skips_loop() {
        let time = Arc::new(SimulatedTimeSource::new(
            local(2024, 6, 20, 12, 0),
            local(2024, 6, 21, 0, 0),
        ));
        let (hooks, recorded) = recording_hooks();
        let signal_state = SignalState::detached();
        signal_state.request_shutdown();

        let core = Core::new(CoreParams {
            geo: london(),
            refresh: RefreshPolicy::Daily,
            polar: PolarPolicy::Natural,
            interval: Duration::from_secs(60),
            hooks,
            signal_state,
            time,
            offset: offset_from_hours(1).unwrap(),
        })
        .unwrap();
        core.execute().unwrap();

        assert!(recorded.borrow().is_empty());
    }
}
