//! The attestation port the controller calls for every legal move.
//!
//! The controller only knows this trait. Concrete implementations (an EAS
//! client, a test double) are injected at construction.

use crate::{Player, Position};
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Placeholder identity used when no player address is known.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Address-like identity of the acting player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{}", _0)]
pub struct Identity(String);

impl Identity {
    /// Wraps an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Uses `address` when present and non-blank, otherwise the zero address.
    pub fn or_placeholder(address: Option<&str>) -> Self {
        match address.map(str::trim) {
            Some(addr) if !addr.is_empty() => Self::new(addr),
            _ => Self::placeholder(),
        }
    }

    /// The all-zero placeholder identity.
    pub fn placeholder() -> Self {
        Self::new(ZERO_ADDRESS)
    }

    /// True for the all-zero placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0.eq_ignore_ascii_case(ZERO_ADDRESS)
    }

    /// The raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Result of a confirmed attestation. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Attestation UID (hex).
    pub uid: String,
    /// Transaction hash (hex).
    pub transaction: String,
}

impl AttestationRecord {
    /// Creates a record from UID and transaction hash.
    pub fn new(uid: impl Into<String>, transaction: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            transaction: transaction.into(),
        }
    }
}

/// Attestation failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Attestation error: {} at {}:{}", message, file, line)]
pub struct AttestError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AttestError {
    /// Creates a new attestation error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Records a move with an external attestation service.
#[async_trait]
pub trait AttestationPort: Send + Sync {
    /// Attests that `player` placed a mark at `position` acting as `identity`.
    async fn attest(
        &self,
        position: Position,
        player: Player,
        identity: &Identity,
    ) -> Result<AttestationRecord, AttestError>;
}

/// State of the attestation panel.
///
/// `Idle` until the first call, `Attesting` while one is in flight, then the
/// last settled result until the next call starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttestationStatus {
    /// No attestation attempted yet.
    #[default]
    Idle,
    /// A call is in flight.
    Attesting,
    /// The last call succeeded.
    Confirmed(AttestationRecord),
    /// The last call failed with this message.
    Failed(String),
}

impl AttestationStatus {
    /// True while a call is in flight.
    pub fn is_attesting(&self) -> bool {
        matches!(self, AttestationStatus::Attesting)
    }
}
