//! Strictly Attested - tic-tac-toe with on-chain move attestations.
//!
//! # Architecture
//!
//! - **Config**: [`AttestConfig`] built once from a TOML file and `ATTEST_*`
//!   environment variables
//! - **EAS**: [`EasAttestor`], the [`AttestationPort`](strictly_board::AttestationPort)
//!   that signs and submits one attestation per move
//! - **TUI**: ratatui front end over a [`BoardController`](strictly_board::BoardController)
//! - **Replay**: headless play from a move list

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod eas;
mod error;
mod replay;
mod setup;
pub mod tui;

pub use config::{
    AttestConfig, ConfigError, ENV_CHAIN_ID, ENV_CONFIRMATIONS, ENV_CONTRACT_ADDRESS,
    ENV_PLAYER_ADDRESS, ENV_PRIVATE_KEY, ENV_RPC_URL, ENV_SCHEMA_UID, ENV_TIMEOUT_SECS,
};
pub use eas::{
    ATTEST_SIGNATURE, ATTESTED_EVENT, EasAttestor, EasSettings, MOVE_SCHEMA, attest_calldata,
    attested_uid, encode_move_payload,
};
pub use error::SetupError;
pub use replay::{ReplaySummary, parse_moves, run_replay};
pub use setup::{GameOptions, build_controller};
