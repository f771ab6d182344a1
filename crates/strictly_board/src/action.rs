//! Moves as first-class domain events.

use crate::{Player, Position};
use serde::{Deserialize, Serialize};

/// A player placing their mark at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// Where the mark goes.
    pub position: Position,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position.label())
    }
}

/// Why a move request was not applied.
///
/// These are expected during play (clicking a taken cell, clicking after the
/// game ended) and are never shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Index {} is off the board", _0)]
    OutOfBounds(usize),

    /// The square is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game has a winner or is drawn.
    #[display("Game is already over")]
    GameOver,

    /// Another move is still waiting on its attestation.
    #[display("A move is already being attested")]
    MovePending,
}

impl std::error::Error for MoveError {}
