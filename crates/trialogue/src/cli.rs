//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;
use trialogue_client::DEFAULT_SUMMARY_INTERVAL;
use trialogue_engine::DEFAULT_BATCH_SIZE;

/// Trialogue - a moderated three-speaker AI dialogue.
#[derive(Parser, Debug)]
#[command(name = "trialogue")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to state directory
    #[arg(short, long, env = "TRIALOGUE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Run turns automatically on a timer until interrupted
    #[arg(long)]
    pub auto: bool,

    /// Seconds between automatic turns (defaults to the saved session's
    /// delay, or 4.0 on a fresh session)
    #[arg(long)]
    pub delay: Option<f64>,

    /// Number of turns to run (manual mode defaults to 3)
    #[arg(short, long)]
    pub turns: Option<u64>,

    /// Generate each reply in one blocking call instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Synthesize speech audio for committed turns
    #[arg(long)]
    pub synthesis: bool,

    /// Streamed fragments per display repaint
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Model identifier
    #[arg(short, long, default_value = "gpt-5-mini")]
    pub model: String,

    /// Inject a user message before the first turn
    #[arg(long)]
    pub topic: Option<String>,

    /// Discard the saved session and start fresh
    #[arg(long)]
    pub reset: bool,

    /// Summarize the discussion every N turns (0 disables)
    #[arg(long, default_value_t = DEFAULT_SUMMARY_INTERVAL)]
    pub summary_interval: u64,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Resolved state directory, defaulting to `~/.trialogue`.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".trialogue")
        })
    }
}
