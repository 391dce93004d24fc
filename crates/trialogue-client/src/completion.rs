//! Completion service contract.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::ModelConfig;
use crate::error::Result;

/// A lazy, finite, non-restartable sequence of text fragments.
pub type TokenStream = BoxStream<'static, Result<String>>;

/// Text-generation contract the turn executor depends on.
///
/// Both modes must fail with a distinguishable error rather than silently
/// returning empty text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generates the complete reply in one call.
    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String>;

    /// Opens a token stream for the reply.
    async fn stream(&self, prompt: &str, config: &ModelConfig) -> Result<TokenStream>;
}
