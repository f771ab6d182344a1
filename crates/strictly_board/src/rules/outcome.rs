//! Derived game outcome.

use super::{check_winner, is_full};
use crate::{Board, Player};
use serde::{Deserialize, Serialize};

/// Outcome of a board: always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves are still accepted.
    InProgress,
    /// A player completed a triple.
    Winner(Player),
    /// Full board, no triple.
    Draw,
}

impl Outcome {
    /// Evaluates a board. A winner takes precedence over a full board.
    pub fn of(board: &Board) -> Self {
        match check_winner(board) {
            Some(player) => Outcome::Winner(player),
            None if is_full(board) => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            _ => None,
        }
    }

    /// True for a win or a draw.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Winner(player) => write!(f, "Winner: {}", player),
            Outcome::Draw => write!(f, "Draw!"),
        }
    }
}
