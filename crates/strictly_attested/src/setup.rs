//! Wiring the controller to its attestation port.

use crate::config::AttestConfig;
use crate::eas::EasAttestor;
use crate::error::SetupError;
use std::path::PathBuf;
use std::sync::Arc;
use strictly_board::{BoardController, Identity};
use tracing::{info, instrument, warn};

/// Options shared by every command that plays a game.
#[derive(Debug, Clone, Default)]
pub struct GameOptions {
    /// Optional TOML configuration file.
    pub config: Option<PathBuf>,
    /// Skip attestation entirely.
    pub offline: bool,
    /// Player address overriding the configured one.
    pub player_address: Option<String>,
}

/// Builds a controller, connecting to EAS unless offline.
///
/// # Errors
///
/// Fails on missing or malformed configuration, or if the attestation
/// endpoint cannot be reached.
#[instrument]
pub async fn build_controller(options: &GameOptions) -> Result<BoardController, SetupError> {
    if options.offline {
        info!("Offline mode, moves will not be attested");
        let identity = Identity::or_placeholder(options.player_address.as_deref());
        return Ok(BoardController::with_port(None, identity));
    }

    let config = AttestConfig::load(options.config.as_deref())?;
    let attestor = EasAttestor::connect(&config).await?;

    let address = options
        .player_address
        .as_deref()
        .or(config.player_address().as_deref());
    let identity = Identity::or_placeholder(address);
    if identity.is_placeholder() {
        warn!("No player address configured, attesting as the zero address");
    }

    Ok(BoardController::new(Arc::new(attestor), identity))
}
