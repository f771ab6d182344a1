//! Board controller: turn-taking, outcome tracking and attested moves.
//!
//! A legal move goes through three steps: [`BoardController::begin_move`]
//! validates it and marks it pending, [`attest_ticket`] runs the injected
//! [`AttestationPort`], and [`BoardController::commit_move`] writes the mark.
//! The commit happens whatever the attestation result was; a failure only
//! sets the advisory text. [`BoardController::submit_move`] chains the three
//! for callers that can simply await.
//!
//! Only one move may be pending at a time. `reset` bumps the epoch so a move
//! still waiting on its attestation commits nothing when it settles. A ticket
//! commits at most once, and only into the game that issued it.

use crate::action::{Move, MoveError};
use crate::attestation::{
    AttestError, AttestationPort, AttestationRecord, AttestationStatus, Identity,
};
use crate::rules::{Outcome, winning_line};
use crate::{Board, Player, Position, Square};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Advisory shown when a move was committed without an attestation.
pub const ATTESTATION_ADVISORY: &str =
    "Failed to create attestation. The move was recorded, but not attested on the blockchain.";

/// A validated move waiting for its attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTicket {
    mv: Move,
    identity: Identity,
    epoch: u64,
}

impl MoveTicket {
    /// The move to commit.
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Identity the move is attested for.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Game epoch the ticket was issued in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// What happened on the attestation side of a move.
#[derive(Debug, Clone)]
pub enum MoveAttestation {
    /// No port configured.
    Offline,
    /// The service confirmed the attestation.
    Confirmed(AttestationRecord),
    /// The call failed; the move still commits.
    Failed(AttestError),
}

/// A move that reached the board.
#[derive(Debug, Clone)]
pub struct CommittedMove {
    /// The move applied.
    pub mv: Move,
    /// Outcome after the move.
    pub outcome: Outcome,
    /// Attestation result for the move.
    pub attestation: MoveAttestation,
}

/// Result of a move request.
#[derive(Debug, Clone)]
pub enum MoveReport {
    /// Request did not pass validation; nothing changed.
    Ignored(MoveError),
    /// Mark written to the board.
    Committed(CommittedMove),
    /// Ticket no longer matches the pending move (settled after a reset, or
    /// already committed); nothing changed.
    Stale(Move),
}

impl MoveReport {
    /// True if the board changed.
    pub fn is_committed(&self) -> bool {
        matches!(self, MoveReport::Committed(_))
    }
}

/// Runs the attestation for a ticket. Never fails: errors are returned as
/// [`MoveAttestation::Failed`] after logging the detail.
#[instrument(
    skip(port, ticket),
    fields(position = %ticket.mv.position, player = %ticket.mv.player, identity = %ticket.identity)
)]
pub async fn attest_ticket(
    port: Option<&dyn AttestationPort>,
    ticket: &MoveTicket,
) -> MoveAttestation {
    let Some(port) = port else {
        debug!("No attestation port, move stays local");
        return MoveAttestation::Offline;
    };

    match port
        .attest(ticket.mv.position, ticket.mv.player, &ticket.identity)
        .await
    {
        Ok(record) => {
            info!(uid = %record.uid, tx = %record.transaction, "Move attested");
            MoveAttestation::Confirmed(record)
        }
        Err(e) => {
            error!(error = %e, "Error creating attestation");
            MoveAttestation::Failed(e)
        }
    }
}

/// Owns the board and applies move requests.
pub struct BoardController {
    board: Board,
    to_move: Player,
    history: Vec<Move>,
    advisory: Option<String>,
    attestation: AttestationStatus,
    pending: Option<Position>,
    epoch: u64,
    identity: Identity,
    port: Option<Arc<dyn AttestationPort>>,
}

impl BoardController {
    /// Creates a controller that attests every move through `port`.
    #[instrument(skip(port))]
    pub fn new(port: Arc<dyn AttestationPort>, identity: Identity) -> Self {
        Self::with_port(Some(port), identity)
    }

    /// Creates a controller with no attestation.
    #[instrument]
    pub fn offline() -> Self {
        Self::with_port(None, Identity::placeholder())
    }

    /// Creates a controller with an optional port.
    #[instrument(skip(port), fields(attested = port.is_some()))]
    pub fn with_port(port: Option<Arc<dyn AttestationPort>>, identity: Identity) -> Self {
        Self {
            board: Board::new(),
            to_move: Player::X,
            history: Vec::new(),
            advisory: None,
            attestation: AttestationStatus::Idle,
            pending: None,
            epoch: 0,
            identity,
            port,
        }
    }

    /// Validates a move request and marks it pending.
    ///
    /// # Errors
    ///
    /// Returns the reason the request is not a legal move right now.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn begin_move(&mut self, index: usize) -> Result<MoveTicket, MoveError> {
        let position = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        if self.outcome().is_terminal() {
            return Err(MoveError::GameOver);
        }
        if self.pending.is_some() {
            return Err(MoveError::MovePending);
        }
        if !self.board.is_empty(position) {
            return Err(MoveError::SquareOccupied(position));
        }

        self.pending = Some(position);
        self.advisory = None;
        if self.port.is_some() {
            self.attestation = AttestationStatus::Attesting;
        }

        let mv = Move::new(self.to_move, position);
        debug!(%mv, epoch = self.epoch, "Move pending");
        Ok(MoveTicket {
            mv,
            identity: self.identity.clone(),
            epoch: self.epoch,
        })
    }

    /// Writes a pending move to the board whatever the attestation result.
    ///
    /// Only the ticket for the current pending move commits. Anything else is
    /// reported as [`MoveReport::Stale`] and leaves the board alone; its result
    /// still reaches the attestation panel unless a newer move is attesting.
    #[instrument(skip(self, attestation), fields(mv = %ticket.mv, epoch = ticket.epoch))]
    pub fn commit_move(&mut self, ticket: MoveTicket, attestation: MoveAttestation) -> MoveReport {
        let mv = ticket.mv;
        let current = ticket.epoch == self.epoch
            && self.pending == Some(mv.position)
            && mv.player == self.to_move
            && self.board.is_empty(mv.position);

        if current || self.pending.is_none() {
            match &attestation {
                MoveAttestation::Offline => {}
                MoveAttestation::Confirmed(record) => {
                    self.attestation = AttestationStatus::Confirmed(record.clone());
                }
                MoveAttestation::Failed(e) => {
                    self.attestation = AttestationStatus::Failed(e.message.clone());
                }
            }
        }

        if !current {
            warn!(
                current_epoch = self.epoch,
                pending = ?self.pending,
                "Ticket does not match the pending move, dropping it"
            );
            return MoveReport::Stale(mv);
        }

        self.pending = None;

        if matches!(attestation, MoveAttestation::Failed(_)) {
            self.advisory = Some(ATTESTATION_ADVISORY.to_string());
        }

        self.board.set(mv.position, Square::Occupied(mv.player));
        self.history.push(mv);

        let outcome = self.outcome();
        if !outcome.is_terminal() {
            self.to_move = mv.player.opponent();
        }

        info!(%outcome, "Move committed");
        MoveReport::Committed(CommittedMove {
            mv,
            outcome,
            attestation,
        })
    }

    /// Applies a move at `index`, attesting it first.
    ///
    /// Illegal requests are ignored and reported as [`MoveReport::Ignored`].
    #[instrument(skip(self))]
    pub async fn submit_move(&mut self, index: usize) -> MoveReport {
        let ticket = match self.begin_move(index) {
            Ok(ticket) => ticket,
            Err(e) => {
                debug!(reason = %e, "Ignoring move request");
                return MoveReport::Ignored(e);
            }
        };

        let port = self.port.clone();
        let attestation = attest_ticket(port.as_deref(), &ticket).await;
        self.commit_move(ticket, attestation)
    }

    /// Restores the initial board. The attestation panel keeps its last result.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(moves = self.history.len(), "Resetting game");
        self.board = Board::new();
        self.to_move = Player::X;
        self.history.clear();
        self.advisory = None;
        self.pending = None;
        self.epoch += 1;
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Outcome derived from the board.
    pub fn outcome(&self) -> Outcome {
        Outcome::of(&self.board)
    }

    /// Completed triple, if any.
    pub fn winning_line(&self) -> Option<[Position; 3]> {
        winning_line(&self.board).map(|(_, line)| line)
    }

    /// Committed moves in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Advisory text after an unattested move.
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Attestation panel state.
    pub fn attestation(&self) -> &AttestationStatus {
        &self.attestation
    }

    /// True if a move is waiting on its attestation.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The position of the pending move.
    pub fn pending(&self) -> Option<Position> {
        self.pending
    }

    /// Identity attached to new moves.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Replaces the identity used for later moves.
    #[instrument(skip(self))]
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    /// The injected attestation port.
    pub fn port(&self) -> Option<Arc<dyn AttestationPort>> {
        self.port.clone()
    }

    /// True if a move is attested when submitted.
    pub fn is_attested(&self) -> bool {
        self.port.is_some()
    }

    /// A cell accepts a click while empty and the game is undecided.
    pub fn is_cell_enabled(&self, position: Position) -> bool {
        self.board.is_empty(position) && !self.outcome().is_terminal()
    }

    /// One-line status: next player, winner or draw.
    pub fn status_line(&self) -> String {
        match self.outcome() {
            Outcome::InProgress => format!("Next player: {}", self.to_move),
            terminal => terminal.to_string(),
        }
    }
}

impl Default for BoardController {
    fn default() -> Self {
        Self::offline()
    }
}

impl std::fmt::Debug for BoardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardController")
            .field("board", &self.board)
            .field("to_move", &self.to_move)
            .field("history", &self.history)
            .field("advisory", &self.advisory)
            .field("attestation", &self.attestation)
            .field("pending", &self.pending)
            .field("epoch", &self.epoch)
            .field("identity", &self.identity)
            .field("attested", &self.port.is_some())
            .finish()
    }
}
