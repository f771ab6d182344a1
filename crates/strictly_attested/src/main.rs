//! Strictly Attested - CLI entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_attested::{AttestConfig, EasSettings, build_controller, parse_moves, run_replay, tui};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,strictly_attested=debug,strictly_board=debug";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match &cli.command {
        Command::Play => initialize_file_tracing()?,
        _ => initialize_stderr_tracing(),
    }

    match &cli.command {
        Command::Play => {
            let game = build_controller(&cli.game_options()).await?;
            tui::run_tui(game).await
        }
        Command::Replay { moves, json } => {
            let moves = parse_moves(moves)?;
            let game = build_controller(&cli.game_options()).await?;
            let mut stdout = std::io::stdout();
            run_replay(game, &moves, *json, &mut stdout).await?;
            Ok(())
        }
        Command::CheckConfig => check_config(&cli),
    }
}

/// Parses every configured value and prints the result without the key.
#[instrument(skip(cli))]
fn check_config(cli: &Cli) -> Result<()> {
    let config = AttestConfig::load(cli.config.as_deref())?;
    let settings = EasSettings::parse(&config)?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    println!("signer: {:?}", settings.signer_address());
    info!("Configuration is valid");
    Ok(())
}

/// Logs to a file so the terminal UI stays readable.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create(tui::LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn initialize_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}
