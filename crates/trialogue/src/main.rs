//! Trialogue entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod cli;
mod display;

#[tokio::main]
async fn main() {
    // Load .env if it exists (for OPENAI_API_KEY etc.)
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = app::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
