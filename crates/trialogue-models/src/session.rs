//! Serializable session snapshot: conversation plus auto-run flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::ConversationState;

/// Default inter-turn delay for auto-run, in seconds.
pub const DEFAULT_AUTO_DELAY_SECONDS: f64 = 4.0;

/// Persisted auto-run scheduler flags.
///
/// `scheduled_at` records when the current waiting period started. Elapsed
/// time is always recomputed from this stored timestamp, which is what lets
/// the timer survive process re-invocation without restarting the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoRunFlags {
    /// Whether auto-run is enabled.
    pub enabled: bool,
    /// Inter-turn delay in seconds.
    pub delay_seconds: f64,
    /// Wall-clock start of the current waiting period, if armed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Default for AutoRunFlags {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_seconds: DEFAULT_AUTO_DELAY_SECONDS,
            scheduled_at: None,
        }
    }
}

/// The unit of persistence: everything needed to resume a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Conversation history and rotation state.
    pub conversation: ConversationState,
    /// Auto-run scheduler flags.
    pub auto_run: AutoRunFlags,
}

impl SessionSnapshot {
    /// Builds a snapshot from current state.
    pub fn new(conversation: ConversationState, auto_run: AutoRunFlags) -> Self {
        Self {
            conversation,
            auto_run,
        }
    }
}
