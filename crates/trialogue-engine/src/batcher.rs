//! Token batching for streamed replies.
//!
//! Streamed tokens arrive far faster than a display needs repainting.
//! The batcher accumulates fragments and emits one update per
//! `batch_size` fragments, each carrying the full concatenation so far,
//! plus an unconditional final update when the stream ends. No fragment
//! is dropped, reordered, or duplicated.

use futures::StreamExt;
use tracing::trace;
use trialogue_client::{ClientError, TokenStream};
use trialogue_models::Speaker;

use crate::display::DisplaySurface;

/// Fragments per display repaint.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// One display update produced by the batcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchUpdate {
    /// Full accumulated text so far.
    pub text: String,
    /// True exactly once, for the closing update.
    pub is_final: bool,
}

/// Accumulates stream fragments and decides when to repaint.
#[derive(Debug)]
pub struct StreamingBatcher {
    batch_size: usize,
    pending: usize,
    text: String,
}

impl StreamingBatcher {
    /// Creates a batcher. A zero `batch_size` is clamped to 1.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            pending: 0,
            text: String::new(),
        }
    }

    /// Appends a fragment; returns an update when a full batch has
    /// accumulated since the last emission.
    pub fn push(&mut self, fragment: &str) -> Option<BatchUpdate> {
        self.text.push_str(fragment);
        self.pending += 1;
        if self.pending < self.batch_size {
            return None;
        }
        self.pending = 0;
        Some(BatchUpdate {
            text: self.text.clone(),
            is_final: false,
        })
    }

    /// Closes the batch, always emitting a final update with the complete
    /// text, even when it is empty.
    pub fn finish(self) -> BatchUpdate {
        BatchUpdate {
            text: self.text,
            is_final: true,
        }
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Drives a token stream through a batcher into a display sink and returns
/// the complete text.
///
/// On a mid-stream error the partial accumulation is pushed as a non-final
/// update first, so the display is left consistent with what was received,
/// then the error propagates.
pub async fn consume(
    mut stream: TokenStream,
    batch_size: usize,
    speaker: Speaker,
    display: &dyn DisplaySurface,
) -> Result<String, ClientError> {
    let mut batcher = StreamingBatcher::new(batch_size);
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                trace!(speaker = %speaker, len = fragment.len(), "stream fragment");
                if let Some(update) = batcher.push(&fragment) {
                    display.on_update(speaker, &update.text, false);
                }
            }
            Err(err) => {
                if !batcher.text().is_empty() {
                    display.on_update(speaker, batcher.text(), false);
                }
                return Err(err);
            }
        }
    }
    let update = batcher.finish();
    display.on_update(speaker, &update.text, true);
    Ok(update.text)
}
