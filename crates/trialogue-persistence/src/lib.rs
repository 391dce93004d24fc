//! Trialogue Persistence - crash-safe session snapshots.
//!
//! Sessions are stored as a single pretty-printed JSON file, written
//! atomically (temp file + rename) so a crash mid-write never leaves a
//! corrupt snapshot. Load is called once at startup; save after every
//! committed turn and scheduler transition. Persistence failures are
//! non-fatal by contract: callers log and keep the in-memory state
//! authoritative.

pub mod atomic;
pub mod error;
pub mod session_store;

pub use error::{PersistenceError, Result};
pub use session_store::{SessionStore, SESSION_FILE};
