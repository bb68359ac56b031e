//! Transition detection over successive ticks.

use crate::geo::Daylight;
use crate::phase::{Phase, TransitionEvent};

/// Holds the day's schedule and the last observed phase.
///
/// `tick` reports a [`TransitionEvent`] exactly once per phase change, and on
/// the first tick so the caller can apply the starting phase.
#[derive(Debug, Clone)]
pub struct DayPhaseTracker {
    daylight: Daylight,
    phase: Option<Phase>,
}

impl DayPhaseTracker {
    pub fn new(daylight: Daylight) -> Self {
        Self {
            daylight,
            phase: None,
        }
    }

    pub fn daylight(&self) -> &Daylight {
        &self.daylight
    }

    /// The phase recorded by the last tick, `None` before the first tick.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Swap in a freshly computed schedule, keeping the recorded phase so the
    /// next tick only fires if the new schedule disagrees with it.
    pub fn replace_daylight(&mut self, daylight: Daylight) {
        self.daylight = daylight;
    }

    /// Classify `now_minutes` and report a change against the recorded phase.
    pub fn tick(&mut self, now_minutes: u32) -> Option<TransitionEvent> {
        let new_phase = self.daylight.classify(now_minutes);
        let initial = self.phase.is_none();

        if self.phase == Some(new_phase) {
            return None;
        }

        self.phase = Some(new_phase);
        Some(TransitionEvent {
            phase: new_phase,
            at_minutes: now_minutes,
            initial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::DayBoundary;

    fn six_to_six() -> DayPhaseTracker {
        DayPhaseTracker::new(Daylight::Cycle(DayBoundary::new(360, 1080)))
    }

    #[test]
    fn test_first_tick_always_fires() {
        let mut tracker = six_to_six();
        assert_eq!(tracker.phase(), None);

        let event = tracker.tick(720).expect("first tick should report a phase");
        assert_eq!(event.phase, Phase::Day);
        assert!(event.initial);
        assert_eq!(tracker.phase(), Some(Phase::Day));
    }

    #[test]
    fn test_repeated_ticks_are_silent() {
        let mut tracker = six_to_six();
        tracker.tick(100);
        for _ in 0..5 {
            assert_eq!(tracker.tick(100), None);
        }
        // Still night, different minute
        assert_eq!(tracker.tick(200), None);
    }

    #[test]
    fn test_fires_once_per_crossing() {
        let mut tracker = six_to_six();
        let events: Vec<_> = (0..1440).filter_map(|m| tracker.tick(m)).collect();

        let phases: Vec<_> = events.iter().map(|e| (e.phase, e.at_minutes)).collect();
        assert_eq!(
            phases,
            vec![(Phase::Night, 0), (Phase::Day, 346), (Phase::Night, 1095)]
        );
        assert!(events[0].initial);
        assert!(!events[1].initial && !events[2].initial);
    }

    #[test]
    fn test_sunset_after_midnight_still_cycles() {
        let mut tracker = DayPhaseTracker::new(Daylight::Cycle(DayBoundary::new(529, 74)));
        let events: Vec<_> = (0..1440).filter_map(|m| tracker.tick(m)).collect();

        let phases: Vec<_> = events.iter().map(|e| (e.phase, e.at_minutes)).collect();
        assert_eq!(
            phases,
            vec![(Phase::Day, 0), (Phase::Night, 89), (Phase::Day, 515)]
        );
    }

    #[test]
    fn test_replacing_daylight_keeps_phase() {
        let mut tracker = six_to_six();
        tracker.tick(720);

        // Tomorrow's boundary is a minute different; still daytime at noon
        tracker.replace_daylight(Daylight::Cycle(DayBoundary::new(359, 1081)));
        assert_eq!(tracker.tick(720), None);
        assert_eq!(tracker.phase(), Some(Phase::Day));
    }

    #[test]
    fn test_constant_daylight_never_transitions() {
        let mut tracker = DayPhaseTracker::new(Daylight::Constant { phase: Phase::Night });
        assert_eq!(tracker.tick(0).map(|e| e.phase), Some(Phase::Night));
        assert!((1..1440).all(|m| tracker.tick(m).is_none()));
    }

    #[test]
    fn test_switching_to_polar_schedule_fires() {
        let mut tracker = six_to_six();
        tracker.tick(720);
        tracker.replace_daylight(Daylight::Constant { phase: Phase::Night });

        let event = tracker.tick(720).expect("schedule change should be reported");
        assert_eq!(event.phase, Phase::Night);
        assert!(!event.initial);
    }
}
