//! Error types for turn execution.

use thiserror::Error;
use trialogue_client::ClientError;

/// Errors that can occur while executing a turn.
///
/// Guard hits and duplicate suppression are not errors; they surface as
/// [`crate::TurnOutcome`] variants. Synthesis failures never surface at all;
/// a turn commits with or without audio.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Text generation failed. The executor has already appended an inline
    /// failure notice and left rotation state untouched.
    #[error("generation failed: {0}")]
    GenerationFailed(#[from] ClientError),
}

/// Result type for turn execution.
pub type Result<T> = std::result::Result<T, TurnError>;
