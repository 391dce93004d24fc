//! Conversation state: ordered history and whose-turn-is-next.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::speaker::Speaker;

/// Seed greeting appended by `reset()` as the single opening message.
pub const SEED_GREETING: &str =
    "Welcome to the show. Our two guests will take the conversation from here.";

/// Owned state of one conversation.
///
/// Mutated only by the turn executor (append, advance, count) and the
/// user-injection path. `turn_in_progress` is transient re-entry state and
/// is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Ordered message history.
    pub history: Vec<Message>,
    /// The speaker that takes the next rotation slot.
    pub next_speaker: Speaker,
    /// Number of committed turns.
    pub turn_count: u64,
    /// True only strictly inside a turn-executor invocation.
    #[serde(skip)]
    pub turn_in_progress: bool,
    /// Wall-clock duration of the most recently committed turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_latency: Option<Duration>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Creates a freshly reset conversation: one seed greeting from the
    /// moderator, with the first agent up next.
    pub fn new() -> Self {
        let mut state = Self {
            history: Vec::new(),
            next_speaker: Speaker::AgentA,
            turn_count: 0,
            turn_in_progress: false,
            last_latency: None,
        };
        state.reset();
        state
    }

    /// Appends a message and returns a reference to the stored entry.
    ///
    /// Does not touch rotation state; callers advance explicitly.
    pub fn append_message(
        &mut self,
        speaker: Speaker,
        text: impl Into<String>,
        audio: Option<Vec<u8>>,
    ) -> &Message {
        let mut message = Message::new(speaker, text);
        message.audio = audio;
        self.history.push(message);
        self.history
            .last()
            .unwrap_or_else(|| unreachable!("history cannot be empty after push"))
    }

    /// Appends an inline failure notice. Notices never advance rotation.
    pub fn append_notice(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.history.push(Message::notice(speaker, text));
    }

    /// Advances `next_speaker` past the most recent rotation-bearing
    /// message. User injections and notices are skipped over.
    pub fn advance_speaker(&mut self) {
        let last_rotating = self
            .history
            .iter()
            .rev()
            .find(|m| m.speaker.is_rotating() && !m.notice)
            .map(|m| m.speaker);
        self.next_speaker = match last_rotating {
            Some(speaker) => speaker.next_in_rotation(),
            None => Speaker::AgentA,
        };
    }

    /// Appends a user message without consuming a rotation slot.
    pub fn inject_user_message(&mut self, text: impl Into<String>) {
        self.history.push(Message::new(Speaker::User, text));
    }

    /// Clears the conversation back to a single seed greeting.
    pub fn reset(&mut self) {
        self.history.clear();
        self.history.push(Message::new(Speaker::Moderator, SEED_GREETING));
        self.next_speaker = Speaker::AgentA;
        self.turn_count = 0;
        self.turn_in_progress = false;
        self.last_latency = None;
    }

    /// The most recently appended message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    /// Whether the history holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of messages in the history.
    pub fn len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_seeds_single_greeting() {
        let state = ConversationState::new();
        assert_eq!(state.len(), 1);
        assert_eq!(state.history[0].speaker, Speaker::Moderator);
        assert_eq!(state.next_speaker, Speaker::AgentA);
        assert_eq!(state.turn_count, 0);
    }

    #[test]
    fn test_advance_follows_rotation() {
        let mut state = ConversationState::new();
        state.append_message(Speaker::AgentA, "first", None);
        state.advance_speaker();
        assert_eq!(state.next_speaker, Speaker::AgentB);

        state.append_message(Speaker::AgentB, "second", None);
        state.advance_speaker();
        assert_eq!(state.next_speaker, Speaker::Moderator);

        state.append_message(Speaker::Moderator, "third", None);
        state.advance_speaker();
        assert_eq!(state.next_speaker, Speaker::AgentA);
    }

    #[test]
    fn test_user_injection_does_not_advance() {
        let mut state = ConversationState::new();
        state.append_message(Speaker::AgentA, "first", None);
        state.advance_speaker();
        assert_eq!(state.next_speaker, Speaker::AgentB);

        state.inject_user_message("a question from the audience");
        assert_eq!(state.next_speaker, Speaker::AgentB);
        assert_eq!(state.last_message().unwrap().speaker, Speaker::User);
    }

    #[test]
    fn test_advance_skips_user_and_notice_messages() {
        let mut state = ConversationState::new();
        state.append_message(Speaker::AgentA, "first", None);
        state.inject_user_message("interjection");
        state.append_notice(Speaker::AgentB, "Generation failed: timeout");
        state.advance_speaker();
        // Rotation keys off AgentA, the last rotation-bearing utterance.
        assert_eq!(state.next_speaker, Speaker::AgentB);
    }

    #[test]
    fn test_reset_after_activity() {
        let mut state = ConversationState::new();
        state.append_message(Speaker::AgentA, "first", None);
        state.turn_count = 3;
        state.reset();
        assert_eq!(state.len(), 1);
        assert_eq!(state.turn_count, 0);
        assert_eq!(state.next_speaker, Speaker::AgentA);
    }

    #[test]
    fn test_turn_in_progress_not_serialized() {
        let mut state = ConversationState::new();
        state.turn_in_progress = true;
        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert!(!back.turn_in_progress);
        assert_eq!(back.len(), state.len());
    }
}
