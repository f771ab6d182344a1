//! Headless play from a list of moves.

use anyhow::{Result, bail};
use serde::Serialize;
use std::io::Write;
use strictly_board::{
    AttestationRecord, Board, BoardController, Move, MoveAttestation, MoveReport, Outcome, Position,
};
use tracing::{info, instrument, warn};

/// Final state of a replayed game.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Board after the last move.
    pub board: Board,
    /// Moves that reached the board.
    pub history: Vec<Move>,
    /// Outcome after the last move.
    pub outcome: Outcome,
    /// Attestations confirmed along the way.
    pub attestations: Vec<AttestationRecord>,
    /// Requests that were ignored, with the reason.
    pub ignored: Vec<String>,
}

/// Parses moves given as indices or labels.
///
/// # Errors
///
/// Names the first entry that is neither.
#[instrument]
pub fn parse_moves(moves: &[String]) -> Result<Vec<Position>> {
    moves
        .iter()
        .map(|raw| match Position::from_label_or_number(raw) {
            Some(position) => Ok(position),
            None => bail!("Not a board position: {:?} (use 0-8 or a label like \"center\")", raw),
        })
        .collect()
}

/// Submits every move in order, writing the board after each one, then the
/// summary (as JSON when `json` is set).
#[instrument(skip(game, out))]
pub async fn run_replay(
    mut game: BoardController,
    moves: &[Position],
    json: bool,
    out: &mut impl Write,
) -> Result<ReplaySummary> {
    let mut attestations = Vec::new();
    let mut ignored = Vec::new();

    for &position in moves {
        let player = game.to_move();
        match game.submit_move(position.to_index()).await {
            MoveReport::Committed(committed) => {
                if let MoveAttestation::Confirmed(record) = committed.attestation {
                    attestations.push(record);
                }
                if !json {
                    writeln!(out, "{} plays {}", player, position)?;
                    writeln!(out, "{}", game.board().display())?;
                    writeln!(out, "{}", game.status_line())?;
                    if let Some(advisory) = game.advisory() {
                        writeln!(out, "warning: {}", advisory)?;
                    }
                    writeln!(out)?;
                }
            }
            MoveReport::Ignored(reason) => {
                warn!(%position, %reason, "Move ignored");
                ignored.push(format!("{}: {}", position, reason));
            }
            MoveReport::Stale(mv) => warn!(%mv, "Move dropped"),
        }
    }

    let summary = ReplaySummary {
        board: game.board().clone(),
        history: game.history().to_vec(),
        outcome: game.outcome(),
        attestations,
        ignored,
    };
    info!(outcome = %summary.outcome, moves = summary.history.len(), "Replay finished");

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(out, "Result: {}", game.status_line())?;
        for record in &summary.attestations {
            writeln!(out, "attested {} in {}", record.uid, record.transaction)?;
        }
    }

    Ok(summary)
}
