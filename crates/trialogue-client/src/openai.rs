//! OpenAI-compatible Responses API client.

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::completion::{CompletionService, TokenStream};
use crate::config::ModelConfig;
use crate::error::{ClientError, Result};

/// Environment variable for the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for an OpenAI-compatible Responses API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Uses `OPENAI_API_KEY`, with `OPENAI_BASE_URL` as an optional
    /// endpoint override.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a client from an arbitrary key-value lookup. Lets tests
    /// exercise the environment wiring without mutating process globals.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV).ok_or_else(|| {
            ClientError::Configuration(format!("missing {} environment variable", API_KEY_ENV))
        })?;
        let mut client = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            client.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(client)
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }

    /// Sends a request, retrying connection failures and server errors with
    /// exponential backoff.
    async fn post_with_retry<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let mut attempt = 0u32;
        loop {
            let result = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            let retriable = match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    let body = response.text().await.unwrap_or_default();
                    if !status.is_server_error() || attempt + 1 >= MAX_RETRIES {
                        return Err(ClientError::Api { status, body });
                    }
                    format!("api error {}", status)
                }
                Err(e) => {
                    if attempt + 1 >= MAX_RETRIES {
                        return Err(e.into());
                    }
                    e.to_string()
                }
            };

            let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
            attempt += 1;
            warn!(
                attempt,
                max = MAX_RETRIES,
                delay_ms = delay.as_millis() as u64,
                cause = %retriable,
                "request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String> {
        let request = ResponsesRequest::new(prompt, config, false);
        trace!(model = %request.model, "sending completion request");

        let response = self.post_with_retry(&self.responses_url(), &request).await?;
        let reply: ResponsesReply = response.json().await?;

        let text = reply.text().ok_or(ClientError::EmptyResponse)?;
        debug!(chars = text.len(), "completion received");
        Ok(text)
    }

    async fn stream(&self, prompt: &str, config: &ModelConfig) -> Result<TokenStream> {
        let request = ResponsesRequest::new(prompt, config, true);
        trace!(model = %request.model, "opening completion stream");

        let response = self.post_with_retry(&self.responses_url(), &request).await?;

        let tokens = response
            .bytes_stream()
            .eventsource()
            .filter_map(|event| async move {
                match event {
                    Ok(event) => parse_stream_event(&event.data),
                    Err(e) => Some(Err(ClientError::Stream(e.to_string()))),
                }
            })
            .boxed();
        Ok(tokens)
    }
}

/// Maps one SSE payload to an optional token delta.
fn parse_stream_event(data: &str) -> Option<Result<String>> {
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    match serde_json::from_str::<StreamEvent>(data) {
        Ok(event) if event.kind == "response.output_text.delta" => {
            event.delta.filter(|d| !d.is_empty()).map(Ok)
        }
        // Lifecycle events (response.created, response.completed, ...) carry
        // no text and are skipped.
        Ok(_) => None,
        Err(e) => Some(Err(ClientError::Stream(format!(
            "bad event payload: {}",
            e
        )))),
    }
}

/// Responses API request body.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// Model identifier.
    pub model: String,
    /// Prompt text.
    pub input: String,
    /// Reasoning parameters.
    pub reasoning: ReasoningConfig,
    /// Text output parameters.
    pub text: TextConfig,
    /// Hard token cap.
    pub max_output_tokens: u32,
    /// Sampling temperature, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Whether to stream the reply as SSE.
    pub stream: bool,
}

impl ResponsesRequest {
    fn new(prompt: &str, config: &ModelConfig, stream: bool) -> Self {
        Self {
            model: config.model.clone(),
            input: prompt.to_string(),
            reasoning: ReasoningConfig {
                effort: config.reasoning_effort.clone(),
            },
            text: TextConfig {
                verbosity: config.verbosity.clone(),
            },
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            stream,
        }
    }
}

/// Reasoning block of a Responses request.
#[derive(Debug, Clone, Serialize)]
pub struct ReasoningConfig {
    /// Effort hint.
    pub effort: String,
}

/// Text block of a Responses request.
#[derive(Debug, Clone, Serialize)]
pub struct TextConfig {
    /// Verbosity hint.
    pub verbosity: String,
}

/// Non-streaming Responses reply.
///
/// The wire body carries the generated text inside the `output` array, as
/// `output_text` content parts on message items; reasoning items carry no
/// content and are skipped. Some compatible servers also flatten the text
/// into a top-level `output_text` field, kept as a fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesReply {
    /// Output items in generation order.
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// Flattened output text, when the server provides it.
    #[serde(default)]
    pub output_text: Option<String>,
}

impl ResponsesReply {
    /// The generated text: all `output_text` content parts concatenated in
    /// order, falling back to the flattened field. `None` when the reply
    /// carries no text at all.
    pub fn text(&self) -> Option<String> {
        let joined: String = self
            .output
            .iter()
            .flat_map(|item| &item.content)
            .filter(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
            .collect();
        if !joined.is_empty() {
            return Some(joined);
        }
        self.output_text.clone().filter(|t| !t.is_empty())
    }
}

/// One item of a Responses reply's `output` array.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    /// Item kind (`message`, `reasoning`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Content parts; empty for non-message items.
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

/// One content part of an output message item.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    /// Part kind; only `output_text` parts carry reply text.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text payload.
    #[serde(default)]
    pub text: String,
}

/// One SSE event payload from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<String>,
}

#[async_trait]
impl crate::speech::SpeechService for OpenAiClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyInput);
        }

        let request = crate::speech::SpeechRequest::new(text, voice);
        debug!(voice = %voice, chars = text.len(), "synthesizing speech");

        let response = self.post_with_retry(&self.speech_url(), &request).await?;
        let audio = response.bytes().await?.to_vec();
        debug!(bytes = audio.len(), "speech synthesis complete");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let config = ModelConfig::default().with_temperature(0.4);
        let request = ResponsesRequest::new("Say hi.", &config, true);
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"model\":\"gpt-5-mini\""));
        assert!(json.contains("\"input\":\"Say hi.\""));
        assert!(json.contains("\"effort\":\"low\""));
        assert!(json.contains("\"stream\":true"));
        assert!(json.contains("\"temperature\":0.4"));
    }

    #[test]
    fn test_request_omits_unset_temperature() {
        let request = ResponsesRequest::new("Say hi.", &ModelConfig::default(), false);
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_reply_text_from_output_array() {
        // Wire-shaped body: a reasoning item with no content, then the
        // message item carrying the text.
        let body = r#"{
            "id": "resp-1",
            "status": "completed",
            "output": [
                {"type": "reasoning", "id": "rs-1", "summary": []},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "annotations": [], "text": "Hello "},
                    {"type": "output_text", "annotations": [], "text": "there!"}
                ]}
            ]
        }"#;
        let reply: ResponsesReply = serde_json::from_str(body).unwrap();
        assert_eq!(reply.text().as_deref(), Some("Hello there!"));
    }

    #[test]
    fn test_reply_text_falls_back_to_flattened_field() {
        let reply: ResponsesReply =
            serde_json::from_str(r#"{"id":"resp-1","output_text":"Hello!"}"#).unwrap();
        assert_eq!(reply.text().as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_reply_without_text_is_none() {
        let reply: ResponsesReply = serde_json::from_str(r#"{"id":"resp-2"}"#).unwrap();
        assert!(reply.text().is_none());

        let body = r#"{"output":[{"type":"reasoning","summary":[]}],"output_text":""}"#;
        let reply: ResponsesReply = serde_json::from_str(body).unwrap();
        assert!(reply.text().is_none());
    }

    #[test]
    fn test_parse_delta_event() {
        let data = r#"{"type":"response.output_text.delta","delta":"Hel"}"#;
        let parsed = parse_stream_event(data).unwrap().unwrap();
        assert_eq!(parsed, "Hel");
    }

    #[test]
    fn test_parse_skips_lifecycle_events() {
        assert!(parse_stream_event(r#"{"type":"response.created"}"#).is_none());
        assert!(parse_stream_event(r#"{"type":"response.completed"}"#).is_none());
        assert!(parse_stream_event("[DONE]").is_none());
        assert!(parse_stream_event("").is_none());
    }

    #[test]
    fn test_parse_skips_empty_delta() {
        let data = r#"{"type":"response.output_text.delta","delta":""}"#;
        assert!(parse_stream_event(data).is_none());
    }

    #[test]
    fn test_parse_bad_payload_is_error() {
        let parsed = parse_stream_event("not json").unwrap();
        assert!(matches!(parsed, Err(ClientError::Stream(_))));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let result = OpenAiClient::from_lookup(|_| None);
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_lookup_reads_key_and_endpoint_override() {
        let client = OpenAiClient::from_lookup(|key| match key {
            API_KEY_ENV => Some("sk-test".to_string()),
            BASE_URL_ENV => Some("http://localhost:8080/v1/".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(client.responses_url(), "http://localhost:8080/v1/responses");
    }

    #[test]
    fn test_base_url_override() {
        let client = OpenAiClient::new("key").with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.responses_url(), "http://localhost:8080/v1/responses");
        assert_eq!(client.speech_url(), "http://localhost:8080/v1/audio/speech");
    }
}
