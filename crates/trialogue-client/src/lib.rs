//! Trialogue Client - external service contracts and their HTTP clients.
//!
//! This crate owns everything that crosses the process boundary:
//!
//! - **completion**: the `CompletionService` trait (blocking and streaming
//!   text generation)
//! - **openai**: an OpenAI-compatible Responses API client with SSE
//!   streaming and retry
//! - **speech**: the `SpeechService` trait and its audio-speech client
//! - **summarizer**: periodic conversation summaries, built on
//!   `CompletionService`
//!
//! The orchestration engine depends only on the traits; the binary picks
//! the concrete client.

pub mod completion;
pub mod config;
pub mod error;
pub mod openai;
pub mod speech;
pub mod summarizer;

pub use completion::{CompletionService, TokenStream};
pub use config::ModelConfig;
pub use error::{ClientError, Result};
pub use openai::OpenAiClient;
pub use speech::SpeechService;
pub use summarizer::{should_summarize, Summarizer, DEFAULT_SUMMARY_INTERVAL};
