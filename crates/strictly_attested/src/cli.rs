//! Command-line interface for strictly_attested.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_attested::GameOptions;

/// Strictly Attested - tic-tac-toe with every move attested on-chain
#[derive(Parser, Debug)]
#[command(name = "strictly_attested")]
#[command(about = "Tic-tac-toe with EAS move attestations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML config file (ATTEST_* environment variables override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Play without attesting moves
    #[arg(long, global = true)]
    pub offline: bool,

    /// Player address recorded with each move
    #[arg(long, global = true)]
    pub player_address: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Options for building the game controller.
    pub fn game_options(&self) -> GameOptions {
        GameOptions {
            config: self.config.clone(),
            offline: self.offline,
            player_address: self.player_address.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play,

    /// Play a fixed list of moves without a UI
    Replay {
        /// Moves as indices 0-8 or labels, comma separated (e.g. 4,0,top-right)
        #[arg(long, value_delimiter = ',', required = true)]
        moves: Vec<String>,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the attestation configuration without sending anything
    CheckConfig,
}
