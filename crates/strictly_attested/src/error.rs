//! Startup errors.

use crate::config::ConfigError;
use derive_more::{Display, Error, From};
use strictly_board::AttestError;

/// Anything that stops the game from starting.
#[derive(Debug, Display, Error, From)]
pub enum SetupError {
    /// Missing or malformed configuration.
    #[display("{}", _0)]
    Config(ConfigError),
    /// The attestation service could not be reached.
    #[display("{}", _0)]
    Attest(AttestError),
}
