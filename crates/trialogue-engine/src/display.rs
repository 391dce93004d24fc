//! Display sink for in-progress and committed turn text.

use trialogue_models::Speaker;

/// Receives progressive text updates during a turn.
///
/// Called many times per streamed turn: each call carries the full
/// accumulated text so far, and exactly one call per turn has
/// `is_final = true`. Blocking turns see a single final call.
pub trait DisplaySurface: Send + Sync {
    /// Renders the accumulated `text` for `speaker`.
    fn on_update(&self, speaker: Speaker, text: &str, is_final: bool);
}

/// Display that drops every update. Used in tests and headless runs.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl DisplaySurface for NullDisplay {
    fn on_update(&self, _speaker: Speaker, _text: &str, _is_final: bool) {}
}
