//! Polling loop that chains automatic turns.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use trialogue_models::{ConversationState, SessionSnapshot};
use trialogue_persistence::SessionStore;

use crate::executor::{TurnConfig, TurnExecutor, TurnOutcome};
use crate::scheduler::AutoRunScheduler;

/// How often the driver checks the scheduler.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Ticks the scheduler and runs due turns until shut down.
///
/// The poll interval bounds how quickly a disable or shutdown is observed;
/// the inter-turn cadence itself comes from the scheduler's delay. The
/// driver persists a snapshot after every turn and scheduler transition;
/// save failures are logged and in-memory state stays authoritative.
pub struct AutoRunDriver {
    executor: TurnExecutor,
    scheduler: AutoRunScheduler,
    store: Option<SessionStore>,
    config: TurnConfig,
    poll_interval: Duration,
    max_turns: Option<u64>,
    turns_run: u64,
}

impl AutoRunDriver {
    /// Creates a driver over an executor and scheduler.
    pub fn new(executor: TurnExecutor, scheduler: AutoRunScheduler, config: TurnConfig) -> Self {
        Self {
            executor,
            scheduler,
            store: None,
            config,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_turns: None,
            turns_run: 0,
        }
    }

    /// Persists snapshots through the given store.
    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Overrides the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Stops after this many committed turns.
    pub fn with_max_turns(mut self, max_turns: u64) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// The scheduler, for inspection.
    pub fn scheduler(&self) -> &AutoRunScheduler {
        &self.scheduler
    }

    /// Runs until the shutdown channel signals, the sender drops, or the
    /// turn limit is reached.
    pub async fn run(
        &mut self,
        state: &mut ConversationState,
        mut shutdown: watch::Receiver<bool>,
    ) {
        // Persist the armed schedule up front so a crash during the first
        // waiting period resumes with the same timestamp.
        self.save(state);

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            poll_ms = self.poll_interval.as_millis() as u64,
            delay_secs = self.scheduler.delay().as_secs_f64(),
            "auto-run driver started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.tick(state).await {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("auto-run driver shutting down");
                        break;
                    }
                }
            }
        }
        self.save(state);
    }

    /// One scheduler poll. Returns true when the driver should stop.
    async fn tick(&mut self, state: &mut ConversationState) -> bool {
        if !self.scheduler.check(Utc::now()) || !self.scheduler.fire() {
            return false;
        }

        match self.executor.execute_turn(state, &self.config).await {
            Ok(TurnOutcome::Committed(message)) => {
                self.turns_run += 1;
                info!(
                    speaker = %message.speaker,
                    turns_run = self.turns_run,
                    "auto-run turn committed"
                );
            }
            Ok(TurnOutcome::AlreadyRunning) => {
                // A turn holds the guard; stay due and retry next tick.
                return false;
            }
            Ok(TurnOutcome::Duplicate) => {
                warn!("auto-run turn suppressed as duplicate");
            }
            Err(err) => {
                // The executor recorded the notice; keep the cadence going.
                warn!(error = %err, "auto-run turn failed");
            }
        }

        self.scheduler.rearm(Utc::now());
        self.save(state);

        if let Some(max) = self.max_turns {
            if self.turns_run >= max {
                info!(turns_run = self.turns_run, "auto-run reached turn limit");
                self.scheduler.disable();
                return true;
            }
        }
        false
    }

    fn save(&self, state: &ConversationState) {
        let Some(store) = &self.store else {
            return;
        };
        let snapshot = SessionSnapshot::new(state.clone(), self.scheduler.flags());
        if let Err(err) = store.save(&snapshot) {
            warn!(error = %err, path = %store.path().display(), "failed to persist session");
        }
    }
}
