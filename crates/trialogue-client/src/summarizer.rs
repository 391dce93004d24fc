//! Periodic conversation summaries.
//!
//! Invoked by the host loop between turns, never by the turn executor; the
//! orchestration core carries no summarization logic of its own.

use std::sync::Arc;

use tracing::debug;
use trialogue_models::ConversationState;

use crate::completion::CompletionService;
use crate::config::ModelConfig;
use crate::error::Result;

/// Summarize every N committed turns by default.
pub const DEFAULT_SUMMARY_INTERVAL: u64 = 5;

/// How many trailing messages feed a summary.
const SUMMARY_WINDOW: usize = 20;

/// Whether a summary is due at this turn count.
pub fn should_summarize(turn_count: u64, interval: u64) -> bool {
    interval > 0 && turn_count > 0 && turn_count % interval == 0
}

/// Generates rolling summaries of the conversation.
pub struct Summarizer {
    service: Arc<dyn CompletionService>,
    config: ModelConfig,
}

impl Summarizer {
    /// Creates a summarizer over the given completion service.
    pub fn new(service: Arc<dyn CompletionService>, config: ModelConfig) -> Self {
        Self { service, config }
    }

    /// Summarizes the recent conversation, optionally folding in the
    /// previous summary for continuity.
    pub async fn summarize(
        &self,
        state: &ConversationState,
        previous: Option<&str>,
    ) -> Result<String> {
        let mut recent: Vec<String> = state
            .history
            .iter()
            .rev()
            .filter(|m| !m.notice)
            .take(SUMMARY_WINDOW)
            .map(|m| format!("{}: {}", m.speaker.label(), m.text))
            .collect();
        recent.reverse();
        let transcript = recent.join("\n");

        let prompt = match previous {
            Some(previous) => format!(
                "Based on the previous summary and the recent conversation, provide an \
                 updated 2-3 sentence summary of the discussion.\n\nPrevious summary: \
                 {}\n\nRecent conversation:\n{}",
                previous, transcript
            ),
            None => format!(
                "Provide a concise 2-3 sentence summary of this conversation.\n\n{}",
                transcript
            ),
        };

        debug!(
            messages = recent.len(),
            incremental = previous.is_some(),
            "generating conversation summary"
        );
        self.service.complete(&prompt, &self.config).await
    }
}
