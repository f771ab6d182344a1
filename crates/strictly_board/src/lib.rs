//! Tic-tac-toe board logic with per-move attestation.
//!
//! # Architecture
//!
//! - **Types**: [`Player`], [`Square`], [`Board`], [`Position`], [`Move`]
//! - **Rules**: pure win/draw detection and the derived [`Outcome`]
//! - **Controller**: [`BoardController`] applies moves, calling an injected
//!   [`AttestationPort`] before each commit
//!
//! # Example
//!
//! ```
//! use strictly_board::{BoardController, Outcome, Player};
//!
//! # async fn example() {
//! let mut game = BoardController::offline();
//! for index in [0, 1, 3, 2, 6] {
//!     game.submit_move(index).await;
//! }
//! assert_eq!(game.outcome(), Outcome::Winner(Player::X));
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod attestation;
mod controller;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use attestation::{
    AttestError, AttestationPort, AttestationRecord, AttestationStatus, Identity, ZERO_ADDRESS,
};
pub use controller::{
    ATTESTATION_ADVISORY, BoardController, CommittedMove, MoveAttestation, MoveReport, MoveTicket,
    attest_ticket,
};
pub use position::Position;
pub use rules::Outcome;
pub use types::{Board, Player, Square};
