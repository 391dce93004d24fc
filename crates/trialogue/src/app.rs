//! Session bootstrap and the two run modes.

use std::fs;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};
use trialogue_client::{
    should_summarize, ClientError, CompletionService, ModelConfig, OpenAiClient, Summarizer,
};
use trialogue_engine::{
    AutoRunDriver, AutoRunScheduler, TurnConfig, TurnExecutor, TurnOutcome,
};
use trialogue_models::{AutoRunFlags, ConversationState, SessionSnapshot};
use trialogue_persistence::{PersistenceError, SessionStore};
use trialogue_prompt::PromptBuilder;

use crate::cli::Cli;
use crate::display::TerminalDisplay;

/// Directive file looked up inside the state directory.
const DIRECTIVE_FILE: &str = "directive.txt";

/// Manual-mode turn count when `--turns` is not given.
const DEFAULT_MANUAL_TURNS: u64 = 3;

/// Fatal bootstrap or run errors surfaced by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Loads or seeds the session, wires the services, and runs turns.
pub async fn run(cli: Cli) -> Result<()> {
    let state_dir = cli.state_dir();
    fs::create_dir_all(&state_dir)?;
    let store = SessionStore::in_dir(&state_dir);

    let loaded = if cli.reset { None } else { store.load()? };
    let (mut state, flags) = match loaded {
        Some(snapshot) => {
            info!(
                messages = snapshot.conversation.len(),
                turns = snapshot.conversation.turn_count,
                "resuming saved session"
            );
            (snapshot.conversation, snapshot.auto_run)
        }
        None => {
            info!("starting a fresh session");
            (ConversationState::new(), AutoRunFlags::default())
        }
    };

    if let Some(topic) = &cli.topic {
        state.inject_user_message(topic.clone());
        println!("User: {topic}");
        // Persist the injection right away; it must survive a crash before
        // the first turn commits.
        if let Err(err) = store.save(&SessionSnapshot::new(state.clone(), flags.clone())) {
            warn!(error = %err, "failed to persist session");
        }
    }

    let client = OpenAiClient::from_env()?;
    let completion: Arc<dyn CompletionService> = Arc::new(client.clone());
    let prompt = PromptBuilder::from_file(&state_dir.join(DIRECTIVE_FILE));
    let model = ModelConfig::default().with_model(&cli.model);
    let config = TurnConfig::default()
        .with_streaming(!cli.no_stream)
        .with_batch_size(cli.batch_size)
        .with_synthesis(cli.synthesis)
        .with_model(model.clone());

    let mut executor = TurnExecutor::new(completion.clone(), prompt)
        .with_display(Arc::new(TerminalDisplay::new()));
    if cli.synthesis {
        executor = executor.with_speech(Arc::new(client));
    }

    let summarizer = (cli.summary_interval > 0)
        .then(|| Summarizer::new(completion, model));

    if cli.auto {
        run_auto(cli, state, flags, store, executor, config, summarizer).await
    } else {
        run_manual(cli, state, flags, store, executor, config, summarizer).await
    }
}

/// Timer-driven mode: the driver chains turns until ctrl-c or the turn
/// limit.
async fn run_auto(
    cli: Cli,
    mut state: ConversationState,
    flags: AutoRunFlags,
    store: SessionStore,
    executor: TurnExecutor,
    config: TurnConfig,
    summarizer: Option<Summarizer>,
) -> Result<()> {
    let mut scheduler = AutoRunScheduler::from_flags(&flags);
    // The saved delay survives a resume; an explicit --delay overrides it.
    if let Some(delay) = cli.delay {
        scheduler.set_delay(delay);
    }
    scheduler.enable(Utc::now());

    let mut driver =
        AutoRunDriver::new(executor, scheduler, config).with_store(store.clone());
    if let Some(turns) = cli.turns {
        driver = driver.with_max_turns(turns);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    driver.run(&mut state, shutdown_rx).await;

    if let Some(summarizer) = &summarizer {
        if state.turn_count > 0 {
            print_summary(summarizer, &state, None).await;
        }
    }
    Ok(())
}

/// Sequential mode: a fixed number of turns, saving after each.
async fn run_manual(
    cli: Cli,
    mut state: ConversationState,
    saved: AutoRunFlags,
    store: SessionStore,
    executor: TurnExecutor,
    config: TurnConfig,
    summarizer: Option<Summarizer>,
) -> Result<()> {
    let flags = AutoRunFlags {
        enabled: false,
        delay_seconds: cli.delay.unwrap_or(saved.delay_seconds),
        scheduled_at: None,
    };
    let turns = cli.turns.unwrap_or(DEFAULT_MANUAL_TURNS);
    let mut summary: Option<String> = None;

    for _ in 0..turns {
        match executor.execute_turn(&mut state, &config).await {
            Ok(TurnOutcome::Committed(_)) => {}
            Ok(TurnOutcome::AlreadyRunning) => {
                warn!("turn skipped: another turn is in progress");
            }
            Ok(TurnOutcome::Duplicate) => {
                warn!("turn suppressed as a duplicate");
            }
            Err(err) => {
                // The notice is already in the history; the next iteration
                // retries the same speaker.
                warn!(error = %err, "turn failed");
            }
        }

        if let Err(err) = store.save(&SessionSnapshot::new(state.clone(), flags.clone())) {
            warn!(error = %err, "failed to persist session");
        }

        if let Some(summarizer) = &summarizer {
            if should_summarize(state.turn_count, cli.summary_interval) {
                summary = print_summary(summarizer, &state, summary.as_deref()).await;
            }
        }
    }
    Ok(())
}

async fn print_summary(
    summarizer: &Summarizer,
    state: &ConversationState,
    previous: Option<&str>,
) -> Option<String> {
    match summarizer.summarize(state, previous).await {
        Ok(summary) => {
            println!("\n--- Summary ---\n{summary}\n");
            Some(summary)
        }
        Err(err) => {
            warn!(error = %err, "summary generation failed");
            previous.map(|s| s.to_string())
        }
    }
}
