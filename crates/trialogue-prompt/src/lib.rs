//! Trialogue Prompt - renders model-ready prompts from conversation state.
//!
//! A prompt is the fixed system directive, the full transcript so far, and a
//! closing instruction naming the speaker whose turn it is. Truncation and
//! summarization are deliberately not this crate's concern; the completion
//! service owns its own context window.

pub mod builder;
pub mod directive;

pub use builder::PromptBuilder;
pub use directive::{load_directive, DEFAULT_DIRECTIVE};
