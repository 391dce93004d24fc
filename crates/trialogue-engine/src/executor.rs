//! Turn execution: generate, suppress duplicates, synthesize, commit.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use trialogue_client::{ClientError, CompletionService, ModelConfig, SpeechService};
use trialogue_models::{ConversationState, Message, Speaker};
use trialogue_prompt::PromptBuilder;

use crate::batcher::{self, DEFAULT_BATCH_SIZE};
use crate::display::{DisplaySurface, NullDisplay};
use crate::error::{Result, TurnError};

/// Per-turn behavior switches.
#[derive(Debug, Clone)]
pub struct TurnConfig {
    /// Stream tokens through the batcher instead of one blocking call.
    pub streaming: bool,
    /// Fragments per display repaint when streaming.
    pub batch_size: usize,
    /// Synthesize audio for committed turns.
    pub synthesis: bool,
    /// Generation parameters.
    pub model: ModelConfig,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            streaming: true,
            batch_size: DEFAULT_BATCH_SIZE,
            synthesis: false,
            model: ModelConfig::default(),
        }
    }
}

impl TurnConfig {
    /// Sets streaming mode.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Sets the display batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enables or disables speech synthesis.
    pub fn with_synthesis(mut self, synthesis: bool) -> Self {
        self.synthesis = synthesis;
        self
    }

    /// Sets generation parameters.
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }
}

/// How a turn ended.
///
/// The re-entry guard and duplicate suppression are expected conditions,
/// not failures, so they get their own variants instead of error codes.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The turn committed: message appended, rotation advanced.
    Committed(Message),
    /// Another turn already holds the in-progress guard. Nothing happened.
    AlreadyRunning,
    /// The generated text matched the previous message from the same
    /// speaker. Nothing was appended and rotation did not advance.
    Duplicate,
}

/// Runs one conversation turn against the wired services.
pub struct TurnExecutor {
    completion: Arc<dyn CompletionService>,
    speech: Option<Arc<dyn SpeechService>>,
    prompt: PromptBuilder,
    display: Arc<dyn DisplaySurface>,
}

impl TurnExecutor {
    /// Creates an executor with no speech service and a null display.
    pub fn new(completion: Arc<dyn CompletionService>, prompt: PromptBuilder) -> Self {
        Self {
            completion,
            speech: None,
            prompt,
            display: Arc::new(NullDisplay),
        }
    }

    /// Attaches a speech-synthesis service.
    pub fn with_speech(mut self, speech: Arc<dyn SpeechService>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Attaches a display sink for progressive updates.
    pub fn with_display(mut self, display: Arc<dyn DisplaySurface>) -> Self {
        self.display = display;
        self
    }

    /// Executes one turn for `state.next_speaker`.
    ///
    /// Exactly one of the following happens: a message commits and rotation
    /// advances; the guard or duplicate check turns the call into a no-op;
    /// or generation fails, a notice is appended, and rotation stays put.
    /// `turn_in_progress` is true only strictly inside this call.
    pub async fn execute_turn(
        &self,
        state: &mut ConversationState,
        config: &TurnConfig,
    ) -> Result<TurnOutcome> {
        if state.turn_in_progress {
            debug!(speaker = %state.next_speaker, "turn already in progress, skipping");
            return Ok(TurnOutcome::AlreadyRunning);
        }
        state.turn_in_progress = true;
        let result = self.run_turn(state, config).await;
        state.turn_in_progress = false;
        result
    }

    async fn run_turn(
        &self,
        state: &mut ConversationState,
        config: &TurnConfig,
    ) -> Result<TurnOutcome> {
        let speaker = state.next_speaker;
        let prompt = self.prompt.build(state);
        let started = Instant::now();

        let text = if config.streaming {
            let stream = match self.completion.stream(&prompt, &config.model).await {
                Ok(stream) => stream,
                Err(err) => return self.fail_turn(state, speaker, err),
            };
            match batcher::consume(stream, config.batch_size, speaker, self.display.as_ref())
                .await
            {
                Ok(text) => text,
                Err(err) => return self.fail_turn(state, speaker, err),
            }
        } else {
            match self.completion.complete(&prompt, &config.model).await {
                Ok(text) => {
                    self.display.on_update(speaker, &text, true);
                    text
                }
                Err(err) => return self.fail_turn(state, speaker, err),
            }
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return self.fail_turn(state, speaker, ClientError::EmptyResponse);
        }

        if let Some(last) = state.last_message() {
            if !last.notice && last.speaker == speaker && last.text == text {
                warn!(speaker = %speaker, "suppressing duplicate turn");
                return Ok(TurnOutcome::Duplicate);
            }
        }

        let audio = if config.synthesis {
            self.synthesize(speaker, &text).await
        } else {
            None
        };

        let message = state.append_message(speaker, text, audio).clone();
        state.advance_speaker();
        state.turn_count += 1;
        state.last_latency = Some(started.elapsed());
        info!(
            speaker = %speaker,
            turn = state.turn_count,
            chars = message.char_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "turn committed"
        );
        Ok(TurnOutcome::Committed(message))
    }

    /// Records a generation failure: inline notice in the history, final
    /// display update, rotation and turn count untouched.
    fn fail_turn(
        &self,
        state: &mut ConversationState,
        speaker: Speaker,
        err: ClientError,
    ) -> Result<TurnOutcome> {
        error!(speaker = %speaker, error = %err, "turn generation failed");
        let notice = format!("Generation failed: {err}");
        self.display.on_update(speaker, &notice, true);
        state.append_notice(speaker, notice);
        Err(TurnError::GenerationFailed(err))
    }

    async fn synthesize(&self, speaker: Speaker, text: &str) -> Option<Vec<u8>> {
        let speech = self.speech.as_ref()?;
        match speech.synthesize(text, speaker.voice()).await {
            Ok(audio) => Some(audio),
            Err(err) => {
                warn!(
                    speaker = %speaker,
                    error = %err,
                    "speech synthesis failed, committing turn without audio"
                );
                None
            }
        }
    }
}
