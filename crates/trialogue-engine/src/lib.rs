//! Trialogue Engine - turn orchestration.
//!
//! The engine owns the turn lifecycle: prompt construction, streaming or
//! blocking generation, token batching, duplicate suppression, optional
//! speech synthesis, and the commit that advances the speaker rotation. An
//! auto-run scheduler and its polling driver chain turns together on a
//! wall-clock timer that survives process restarts.
//!
//! The engine talks to external services only through the traits in
//! `trialogue-client` and renders only through [`DisplaySurface`], so every
//! piece here is testable with in-process fakes.

pub mod batcher;
pub mod display;
pub mod driver;
pub mod error;
pub mod executor;
pub mod scheduler;

pub use batcher::{BatchUpdate, StreamingBatcher, DEFAULT_BATCH_SIZE};
pub use display::{DisplaySurface, NullDisplay};
pub use driver::{AutoRunDriver, DEFAULT_POLL_INTERVAL};
pub use error::{Result, TurnError};
pub use executor::{TurnConfig, TurnExecutor, TurnOutcome};
pub use scheduler::{AutoRunScheduler, SchedulerState};
