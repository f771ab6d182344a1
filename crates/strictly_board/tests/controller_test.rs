//! Tests for the board controller and its attestation port.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use strictly_board::{
    ATTESTATION_ADVISORY, AttestError, AttestationPort, AttestationRecord, AttestationStatus,
    BoardController, Identity, MoveAttestation, MoveError, MoveReport, Outcome, Player, Position,
    Square, attest_ticket,
};

/// Records every call and confirms it.
#[derive(Default)]
struct RecordingPort {
    calls: Mutex<Vec<(Position, Player, Identity)>>,
}

#[async_trait]
impl AttestationPort for RecordingPort {
    async fn attest(
        &self,
        position: Position,
        player: Player,
        identity: &Identity,
    ) -> Result<AttestationRecord, AttestError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((position, player, identity.clone()));
        Ok(AttestationRecord::new(
            format!("0xuid{}", calls.len()),
            format!("0xtx{}", calls.len()),
        ))
    }
}

/// Fails every call, like an unreachable service.
struct UnreachablePort;

#[async_trait]
impl AttestationPort for UnreachablePort {
    async fn attest(
        &self,
        _position: Position,
        _player: Player,
        _identity: &Identity,
    ) -> Result<AttestationRecord, AttestError> {
        Err(AttestError::new("connection refused"))
    }
}

async fn play(game: &mut BoardController, moves: &[usize]) {
    for &index in moves {
        let report = game.submit_move(index).await;
        assert!(report.is_committed(), "move {index} rejected: {report:?}");
    }
}

#[tokio::test]
async fn test_center_move_flips_turn() {
    let mut game = BoardController::offline();
    let report = game.submit_move(4).await;

    assert!(report.is_committed());
    assert_eq!(game.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.outcome(), Outcome::InProgress);
    assert_eq!(game.status_line(), "Next player: O");
}

#[tokio::test]
async fn test_column_win_locks_board() {
    let mut game = BoardController::offline();
    play(&mut game, &[0, 1, 3, 2, 6]).await;

    assert_eq!(game.outcome(), Outcome::Winner(Player::X));
    assert_eq!(
        game.winning_line(),
        Some([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft])
    );
    assert_eq!(game.status_line(), "Winner: X");

    let before = game.board().clone();
    let report = game.submit_move(8).await;
    assert!(matches!(report, MoveReport::Ignored(MoveError::GameOver)));
    assert_eq!(game.board(), &before);
    assert_eq!(game.to_move(), Player::X);
    assert!(!game.is_cell_enabled(Position::BottomRight));
}

#[tokio::test]
async fn test_full_board_without_triple_is_draw() {
    let mut game = BoardController::offline();
    play(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).await;

    assert_eq!(game.outcome(), Outcome::Draw);
    assert_eq!(game.status_line(), "Draw!");
    assert!(game.board().is_full());
    assert_eq!(game.history().len(), 9);
}

#[tokio::test]
async fn test_unreachable_service_still_commits() {
    let mut game = BoardController::new(Arc::new(UnreachablePort), Identity::placeholder());
    let report = game.submit_move(4).await;

    match report {
        MoveReport::Committed(committed) => {
            assert!(matches!(committed.attestation, MoveAttestation::Failed(_)));
        }
        other => panic!("expected commit, got {other:?}"),
    }
    assert_eq!(game.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.advisory(), Some(ATTESTATION_ADVISORY));
    assert_eq!(
        game.attestation(),
        &AttestationStatus::Failed("connection refused".to_string())
    );
}

#[tokio::test]
async fn test_next_move_clears_advisory() {
    let mut game = BoardController::new(Arc::new(UnreachablePort), Identity::placeholder());
    game.submit_move(0).await;
    assert!(game.advisory().is_some());

    // Rejected requests leave the advisory alone.
    game.submit_move(0).await;
    assert!(game.advisory().is_some());

    let ticket = game.begin_move(1).expect("legal move");
    assert_eq!(game.advisory(), None);
    game.commit_move(ticket, MoveAttestation::Offline);
    assert_eq!(game.advisory(), None);
}

#[tokio::test]
async fn test_reset_mid_game_restores_initial_state() {
    let mut game = BoardController::new(Arc::new(UnreachablePort), Identity::placeholder());
    play(&mut game, &[0, 4, 8]).await;
    game.reset();

    assert!(game.board().squares().iter().all(|s| *s == Square::Empty));
    assert_eq!(game.to_move(), Player::X);
    assert_eq!(game.outcome(), Outcome::InProgress);
    assert_eq!(game.advisory(), None);
    assert!(game.history().is_empty());

    // Resetting twice changes nothing further.
    let board = game.board().clone();
    game.reset();
    assert_eq!(game.board(), &board);
    assert_eq!(game.to_move(), Player::X);
}

#[tokio::test]
async fn test_occupied_cell_is_ignored() {
    let mut game = BoardController::offline();
    game.submit_move(4).await;

    let report = game.submit_move(4).await;
    assert!(matches!(
        report,
        MoveReport::Ignored(MoveError::SquareOccupied(Position::Center))
    ));
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.history().len(), 1);
}

#[tokio::test]
async fn test_out_of_bounds_is_ignored() {
    let mut game = BoardController::offline();
    let report = game.submit_move(9).await;
    assert!(matches!(report, MoveReport::Ignored(MoveError::OutOfBounds(9))));
    assert_eq!(game.board().occupied(), 0);
}

#[tokio::test]
async fn test_turns_alternate_from_x() {
    let mut game = BoardController::offline();
    for (n, index) in [4, 0, 8, 2, 6, 7].into_iter().enumerate() {
        let expected = if n % 2 == 0 { Player::X } else { Player::O };
        assert_eq!(game.to_move(), expected);
        game.submit_move(index).await;
    }
}

#[tokio::test]
async fn test_port_receives_move_and_identity() {
    let port = Arc::new(RecordingPort::default());
    let identity = Identity::new("0x1111111111111111111111111111111111111111");
    let mut game = BoardController::new(port.clone(), identity.clone());

    play(&mut game, &[2, 6]).await;

    let calls = port.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            (Position::TopRight, Player::X, identity.clone()),
            (Position::BottomLeft, Player::O, identity),
        ]
    );
    assert_eq!(
        game.attestation(),
        &AttestationStatus::Confirmed(AttestationRecord::new("0xuid2", "0xtx2"))
    );
}

#[tokio::test]
async fn test_ignored_move_is_not_attested() {
    let port = Arc::new(RecordingPort::default());
    let mut game = BoardController::new(port.clone(), Identity::placeholder());
    game.submit_move(0).await;
    game.submit_move(0).await;
    assert_eq!(port.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_move_waits_for_pending_one() {
    let mut game =
        BoardController::new(Arc::new(RecordingPort::default()), Identity::placeholder());
    let ticket = game.begin_move(0).expect("legal move");
    assert!(game.is_pending());
    assert!(game.attestation().is_attesting());

    assert_eq!(game.begin_move(1), Err(MoveError::MovePending));

    let port = game.port();
    let attestation = attest_ticket(port.as_deref(), &ticket).await;
    assert!(game.commit_move(ticket, attestation).is_committed());
    assert!(!game.is_pending());
    assert!(game.begin_move(1).is_ok());
}

#[tokio::test]
async fn test_reset_drops_in_flight_move() {
    let mut game = BoardController::new(Arc::new(UnreachablePort), Identity::placeholder());
    let ticket = game.begin_move(4).expect("legal move");
    game.reset();

    let port = game.port();
    let attestation = attest_ticket(port.as_deref(), &ticket).await;
    let report = game.commit_move(ticket, attestation);

    assert!(matches!(report, MoveReport::Stale(_)));
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.to_move(), Player::X);
    assert_eq!(game.advisory(), None);
    // The panel still shows what happened to the call.
    assert!(matches!(game.attestation(), AttestationStatus::Failed(_)));
    // The reset game takes moves again.
    assert!(game.submit_move(4).await.is_committed());
}

#[test]
fn test_ticket_commits_once() {
    let mut game = BoardController::offline();
    let ticket = game.begin_move(4).expect("legal move");

    assert!(game.commit_move(ticket.clone(), MoveAttestation::Offline).is_committed());
    let replayed = game.commit_move(ticket, MoveAttestation::Offline);

    assert!(matches!(replayed, MoveReport::Stale(_)));
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(game.to_move(), Player::O);
}

#[tokio::test]
async fn test_foreign_ticket_is_dropped() {
    let mut a = BoardController::offline();
    let mut b = BoardController::offline();
    assert!(b.submit_move(4).await.is_committed());

    let foreign = a.begin_move(4).expect("legal move in its own game");
    let report = b.commit_move(foreign, MoveAttestation::Offline);

    assert!(matches!(report, MoveReport::Stale(_)));
    assert_eq!(b.history().len(), 1);
    assert_eq!(b.board().get(Position::Center), Square::Occupied(Player::X));
    assert_eq!(b.to_move(), Player::O);

    // A pending move on the same square does not let another game's ticket in.
    let own = b.begin_move(0).expect("legal move");
    let mut c = BoardController::offline();
    let other = c.begin_move(0).expect("legal move");
    assert!(matches!(b.commit_move(other, MoveAttestation::Offline), MoveReport::Stale(_)));
    assert_eq!(b.pending(), Some(Position::TopLeft));
    assert!(b.commit_move(own, MoveAttestation::Offline).is_committed());
    assert_eq!(b.history().len(), 2);
}

#[tokio::test]
async fn test_stale_settle_keeps_newer_move_attesting() {
    let mut game = BoardController::new(Arc::new(UnreachablePort), Identity::placeholder());
    let old = game.begin_move(4).expect("legal move");
    game.reset();
    let _newer = game.begin_move(0).expect("legal move after reset");

    let port = game.port();
    let attestation = attest_ticket(port.as_deref(), &old).await;
    let report = game.commit_move(old, attestation);

    assert!(matches!(report, MoveReport::Stale(_)));
    assert!(game.attestation().is_attesting());
    assert_eq!(game.pending(), Some(Position::TopLeft));
    assert_eq!(game.board().occupied(), 0);
}

#[tokio::test]
async fn test_identity_change_applies_to_later_moves() {
    let port = Arc::new(RecordingPort::default());
    let mut game = BoardController::new(port.clone(), Identity::placeholder());
    game.submit_move(0).await;
    game.set_identity(Identity::new("0x2222222222222222222222222222222222222222"));
    game.submit_move(1).await;

    let calls = port.calls.lock().unwrap();
    assert!(calls[0].2.is_placeholder());
    assert_eq!(calls[1].2.as_str(), "0x2222222222222222222222222222222222222222");
}

#[test]
fn test_identity_placeholder_for_missing_address() {
    assert!(Identity::or_placeholder(None).is_placeholder());
    assert!(Identity::or_placeholder(Some("  ")).is_placeholder());
    assert_eq!(Identity::or_placeholder(Some("0xabc")).as_str(), "0xabc");
}
