//! Prompt rendering from conversation state.

use std::path::Path;

use tracing::debug;
use trialogue_models::ConversationState;

use crate::directive::load_directive;

/// Renders a model-ready prompt: directive, transcript, next-speaker
/// instruction.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    directive: String,
}

impl PromptBuilder {
    /// Creates a builder with an explicit directive.
    pub fn new(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
        }
    }

    /// Creates a builder from a directive file, falling back to the
    /// built-in default when the file is absent.
    pub fn from_file(path: &Path) -> Self {
        Self::new(load_directive(path))
    }

    /// The directive in use.
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Builds the full prompt for the next turn.
    ///
    /// History is rendered chronologically as `"{label}: {text}"` lines.
    /// Failure notices are display artifacts and are excluded from the
    /// transcript.
    pub fn build(&self, state: &ConversationState) -> String {
        let mut lines = Vec::with_capacity(state.len() + 6);
        lines.push(self.directive.clone());
        lines.push(String::new());
        lines.push("Transcript so far:".to_string());
        lines.push(String::new());

        for message in state.history.iter().filter(|m| !m.notice) {
            lines.push(format!("{}: {}", message.speaker.label(), message.text));
        }

        lines.push(String::new());
        lines.push(format!(
            "Now continue as {}. Reply only with what you say next.",
            state.next_speaker.label()
        ));

        let prompt = lines.join("\n");
        debug!(
            next_speaker = %state.next_speaker,
            len = prompt.len(),
            "built prompt"
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialogue_models::{Speaker, SEED_GREETING};

    fn builder() -> PromptBuilder {
        PromptBuilder::new("Be brief.")
    }

    #[test]
    fn test_prompt_shape() {
        let state = ConversationState::new();
        let prompt = builder().build(&state);

        assert!(prompt.starts_with("Be brief.\n"));
        assert!(prompt.contains("Transcript so far:"));
        assert!(prompt.contains(&format!("Moderator: {}", SEED_GREETING)));
        assert!(prompt.ends_with("Now continue as Agent A. Reply only with what you say next."));
    }

    #[test]
    fn test_history_in_chronological_order() {
        let mut state = ConversationState::new();
        state.append_message(Speaker::AgentA, "first point", None);
        state.append_message(Speaker::AgentB, "counterpoint", None);
        let prompt = builder().build(&state);

        let a = prompt.find("Agent A: first point").unwrap();
        let b = prompt.find("Agent B: counterpoint").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_notices_excluded_from_transcript() {
        let mut state = ConversationState::new();
        state.append_notice(Speaker::AgentA, "Generation failed: timeout");
        let prompt = builder().build(&state);
        assert!(!prompt.contains("Generation failed"));
    }

    #[test]
    fn test_names_next_speaker() {
        let mut state = ConversationState::new();
        state.next_speaker = Speaker::AgentB;
        let prompt = builder().build(&state);
        assert!(prompt.contains("Now continue as Agent B."));
    }

    #[test]
    fn test_user_messages_included() {
        let mut state = ConversationState::new();
        state.inject_user_message("what about safety?");
        let prompt = builder().build(&state);
        assert!(prompt.contains("User: what about safety?"));
    }
}
