//! Speech-synthesis service contract.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Default synthesis model.
pub const DEFAULT_SPEECH_MODEL: &str = "gpt-4o-mini-tts";

/// Text-to-speech contract. Failures must be catchable and non-fatal to
/// callers; a turn commits with or without audio.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesizes `text` with the given voice identifier, returning raw
    /// audio bytes.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;
}

/// Audio-speech request body.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    /// Synthesis model.
    pub model: String,
    /// Voice identifier.
    pub voice: String,
    /// Text to read aloud.
    pub input: String,
    /// Playback speed.
    pub speed: f32,
}

impl SpeechRequest {
    /// Builds a request with the default synthesis model and speed.
    pub fn new(text: &str, voice: &str) -> Self {
        Self {
            model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: voice.to_string(),
            input: text.to_string(),
            speed: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_request_serialization() {
        let request = SpeechRequest::new("Hello there.", "verse");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o-mini-tts\""));
        assert!(json.contains("\"voice\":\"verse\""));
        assert!(json.contains("\"input\":\"Hello there.\""));
    }
}
