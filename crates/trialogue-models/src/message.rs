//! A single utterance in the conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::speaker::Speaker;

/// One message in the conversation.
///
/// Created exactly once when a turn commits (or when a user injects text)
/// and immutable afterwards, except for lazy audio attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who said it.
    pub speaker: Speaker,
    /// The message text.
    pub text: String,
    /// Synthesized audio, attached lazily when synthesis is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<u8>>,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// Character count of `text`, recorded at creation.
    pub char_count: usize,
    /// True for inline failure notices. Notices are display artifacts: they
    /// are excluded from prompt transcripts and never synthesized.
    #[serde(default)]
    pub notice: bool,
}

impl Message {
    /// Creates a new message, stamping the timestamp and character count.
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            speaker,
            char_count: text.chars().count(),
            text,
            audio: None,
            created_at: Utc::now(),
            notice: false,
        }
    }

    /// Creates a message with audio already attached.
    pub fn with_audio(speaker: Speaker, text: impl Into<String>, audio: Vec<u8>) -> Self {
        let mut message = Self::new(speaker, text);
        message.audio = Some(audio);
        message
    }

    /// Creates an inline failure notice.
    pub fn notice(speaker: Speaker, text: impl Into<String>) -> Self {
        let mut message = Self::new(speaker, text);
        message.notice = true;
        message
    }

    /// Attaches audio to an existing message.
    pub fn attach_audio(&mut self, audio: Vec<u8>) {
        self.audio = Some(audio);
    }

    /// Whether synthesized audio is attached.
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_char_count() {
        let message = Message::new(Speaker::AgentA, "hello there");
        assert_eq!(message.char_count, 11);
        assert!(!message.notice);
        assert!(!message.has_audio());
    }

    #[test]
    fn test_notice_constructor() {
        let message = Message::notice(Speaker::AgentB, "Generation failed: timeout");
        assert!(message.notice);
        assert_eq!(message.speaker, Speaker::AgentB);
    }

    #[test]
    fn test_attach_audio() {
        let mut message = Message::new(Speaker::Moderator, "welcome");
        message.attach_audio(vec![1, 2, 3]);
        assert!(message.has_audio());
        assert_eq!(message.audio.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_serde_roundtrip_without_audio() {
        let message = Message::new(Speaker::AgentA, "hi");
        let json = serde_json::to_string(&message).unwrap();
        // Absent audio is omitted from the wire form entirely.
        assert!(!json.contains("audio"));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
