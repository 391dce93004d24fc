//! Auto-run scheduling on stored wall-clock timestamps.
//!
//! The scheduler never sleeps. It records when the current waiting period
//! started and answers "is the next turn due?" against an explicit `now`,
//! so elapsed time is always recomputed from the stored timestamp. A
//! process restart resumes the same waiting period instead of starting a
//! new one, and tests drive the state machine without real clocks.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use trialogue_models::AutoRunFlags;

/// Scheduler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Auto-run disabled.
    Idle,
    /// Waiting for the delay to elapse since `scheduled_at`.
    Armed {
        /// Wall-clock start of the current waiting period.
        scheduled_at: DateTime<Utc>,
    },
    /// The delay has elapsed; one turn should run.
    Due,
}

/// Decides when the next automatic turn runs.
#[derive(Debug, Clone)]
pub struct AutoRunScheduler {
    state: SchedulerState,
    delay: Duration,
}

impl AutoRunScheduler {
    /// Creates a disabled scheduler with the given inter-turn delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            delay,
        }
    }

    /// Restores a scheduler from persisted flags.
    ///
    /// An enabled flag set without a stored timestamp means a waiting
    /// period completed (or was interrupted mid-turn); the next turn is due
    /// immediately rather than after a fresh delay.
    pub fn from_flags(flags: &AutoRunFlags) -> Self {
        let delay = Duration::from_secs_f64(flags.delay_seconds.max(0.0));
        let state = if !flags.enabled {
            SchedulerState::Idle
        } else {
            match flags.scheduled_at {
                Some(scheduled_at) => SchedulerState::Armed { scheduled_at },
                None => SchedulerState::Due,
            }
        };
        Self { state, delay }
    }

    /// Persistable view of the scheduler.
    pub fn flags(&self) -> AutoRunFlags {
        AutoRunFlags {
            enabled: !matches!(self.state, SchedulerState::Idle),
            delay_seconds: self.delay.as_secs_f64(),
            scheduled_at: match self.state {
                SchedulerState::Armed { scheduled_at } => Some(scheduled_at),
                _ => None,
            },
        }
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether auto-run is on.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, SchedulerState::Idle)
    }

    /// The inter-turn delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the inter-turn delay. Takes effect on the current waiting
    /// period, since elapsed time is recomputed on every check.
    pub fn set_delay(&mut self, seconds: f64) {
        self.delay = Duration::from_secs_f64(seconds.max(0.0));
    }

    /// Enables auto-run, arming a waiting period that starts at `now`.
    ///
    /// Enabling an already-enabled scheduler keeps the existing timestamp;
    /// the clock is never restarted by a repeat enable.
    pub fn enable(&mut self, now: DateTime<Utc>) {
        if matches!(self.state, SchedulerState::Idle) {
            debug!(delay_secs = self.delay.as_secs_f64(), "auto-run enabled");
            self.state = SchedulerState::Armed { scheduled_at: now };
        }
    }

    /// Disables auto-run immediately, clearing any stored timestamp.
    pub fn disable(&mut self) {
        if self.is_enabled() {
            debug!("auto-run disabled");
        }
        self.state = SchedulerState::Idle;
    }

    /// Whether the delay has elapsed at `now`, moving Armed to Due when it
    /// has. A not-yet check writes no new timestamp.
    pub fn check(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            SchedulerState::Idle => false,
            SchedulerState::Due => true,
            SchedulerState::Armed { scheduled_at } => {
                // A timestamp ahead of the clock (skew, restored snapshot)
                // is treated as not yet elapsed.
                let due = now
                    .signed_duration_since(scheduled_at)
                    .to_std()
                    .map_or(false, |elapsed| elapsed >= self.delay);
                if due {
                    self.state = SchedulerState::Due;
                }
                due
            }
        }
    }

    /// Claims a Due state for one turn. The caller must `rearm` or
    /// `disable` once the turn finishes.
    pub fn fire(&mut self) -> bool {
        matches!(self.state, SchedulerState::Due)
    }

    /// Starts a fresh waiting period at `now`. No-op when disabled.
    pub fn rearm(&mut self, now: DateTime<Utc>) {
        if self.is_enabled() {
            self.state = SchedulerState::Armed { scheduled_at: now };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        "2026-08-23T12:00:00Z".parse().unwrap()
    }

    fn secs(s: i64) -> TimeDelta {
        TimeDelta::seconds(s)
    }

    #[test]
    fn test_early_check_stays_armed() {
        let mut scheduler = AutoRunScheduler::new(Duration::from_secs(4));
        scheduler.enable(t0());

        assert!(!scheduler.check(t0() + secs(3)));
        assert_eq!(
            scheduler.state(),
            SchedulerState::Armed { scheduled_at: t0() }
        );
    }

    #[test]
    fn test_fires_once_then_rearms_fresh() {
        let mut scheduler = AutoRunScheduler::new(Duration::from_secs(4));
        scheduler.enable(t0());

        assert!(scheduler.check(t0() + secs(4)));
        assert!(scheduler.fire());

        let turn_end = t0() + secs(6);
        scheduler.rearm(turn_end);
        assert!(!scheduler.check(turn_end + secs(3)));
        assert!(scheduler.check(turn_end + secs(4)));
    }

    #[test]
    fn test_repeat_enable_keeps_waiting_period() {
        let mut scheduler = AutoRunScheduler::new(Duration::from_secs(4));
        scheduler.enable(t0());
        // Re-enabling two seconds in must not restart the clock.
        scheduler.enable(t0() + secs(2));

        assert!(scheduler.check(t0() + secs(4)));
    }

    #[test]
    fn test_disable_is_immediate() {
        let mut scheduler = AutoRunScheduler::new(Duration::from_secs(4));
        scheduler.enable(t0());
        scheduler.disable();

        assert!(!scheduler.is_enabled());
        assert!(!scheduler.check(t0() + secs(100)));
        assert!(scheduler.flags().scheduled_at.is_none());
    }

    #[test]
    fn test_restore_resumes_waiting_period() {
        let flags = AutoRunFlags {
            enabled: true,
            delay_seconds: 4.0,
            scheduled_at: Some(t0()),
        };
        let mut scheduler = AutoRunScheduler::from_flags(&flags);

        // Restarted one second into the wait: three seconds remain.
        assert!(!scheduler.check(t0() + secs(1)));
        assert!(scheduler.check(t0() + secs(4)));
    }

    #[test]
    fn test_restore_enabled_without_timestamp_is_due() {
        let flags = AutoRunFlags {
            enabled: true,
            delay_seconds: 4.0,
            scheduled_at: None,
        };
        let mut scheduler = AutoRunScheduler::from_flags(&flags);
        assert!(scheduler.check(t0()));
    }

    #[test]
    fn test_future_timestamp_not_due() {
        let flags = AutoRunFlags {
            enabled: true,
            delay_seconds: 4.0,
            scheduled_at: Some(t0() + secs(60)),
        };
        let mut scheduler = AutoRunScheduler::from_flags(&flags);
        assert!(!scheduler.check(t0()));
    }

    #[test]
    fn test_flags_roundtrip() {
        let mut scheduler = AutoRunScheduler::new(Duration::from_secs_f64(2.5));
        scheduler.enable(t0());

        let flags = scheduler.flags();
        assert!(flags.enabled);
        assert_eq!(flags.delay_seconds, 2.5);
        assert_eq!(flags.scheduled_at, Some(t0()));

        let restored = AutoRunScheduler::from_flags(&flags);
        assert_eq!(restored.state(), scheduler.state());
        assert_eq!(restored.delay(), scheduler.delay());
    }

    #[test]
    fn test_set_delay_applies_to_current_period() {
        let mut scheduler = AutoRunScheduler::new(Duration::from_secs(10));
        scheduler.enable(t0());
        scheduler.set_delay(2.0);
        assert!(scheduler.check(t0() + secs(2)));
    }
}
