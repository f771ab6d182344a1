//! Tests for terminal app state, driven without a terminal.

use ratatui::layout::Rect;
use strictly_attested::tui::{Action, App};
use strictly_board::{
    AttestError, BoardController, MoveAttestation, MoveReport, Outcome, Player, Position, Square,
};

fn place(app: &mut App, position: Position) -> MoveReport {
    let ticket = app.apply(Action::Place(position)).expect("legal move");
    app.settle(ticket, MoveAttestation::Offline)
}

#[test]
fn test_place_moves_cursor_and_commits() {
    let mut app = App::new(BoardController::offline());
    assert!(place(&mut app, Position::TopRight).is_committed());
    assert_eq!(app.cursor(), Position::TopRight);
    assert_eq!(app.game().board().get(Position::TopRight), Square::Occupied(Player::X));
    assert!(app.log().is_empty());
}

#[test]
fn test_click_on_taken_cell_gives_no_ticket() {
    let mut app = App::new(BoardController::offline());
    place(&mut app, Position::Center);
    assert!(app.apply(Action::Place(Position::Center)).is_none());
    assert_eq!(app.game().to_move(), Player::O);
}

#[test]
fn test_failed_attestation_is_logged_and_advised() {
    let mut app = App::new(BoardController::offline());
    let ticket = app.apply(Action::Place(Position::Center)).unwrap();
    app.settle(ticket, MoveAttestation::Failed(AttestError::new("rpc down")));

    assert_eq!(app.log().len(), 1);
    assert!(app.log()[0].ends_with("X -> Center not attested: rpc down"), "{}", app.log()[0]);
    assert!(app.game().advisory().is_some());
}

#[test]
fn test_reset_and_quit() {
    let mut app = App::new(BoardController::offline());
    for pos in [
        Position::TopLeft,
        Position::Center,
        Position::TopCenter,
        Position::BottomLeft,
        Position::TopRight,
    ] {
        place(&mut app, pos);
    }
    assert_eq!(app.game().outcome(), Outcome::Winner(Player::X));
    assert!(app.apply(Action::Place(Position::BottomRight)).is_none());

    assert!(app.apply(Action::Reset).is_none());
    assert_eq!(app.game().board().occupied(), 0);
    assert!(!app.should_quit());

    app.apply(Action::Quit);
    assert!(app.should_quit());
}

#[test]
fn test_cell_hit_testing() {
    let mut app = App::new(BoardController::offline());
    let mut cells = [Rect::default(); 9];
    for (i, cell) in cells.iter_mut().enumerate() {
        let (row, col) = (i as u16 / 3, i as u16 % 3);
        *cell = Rect::new(col * 14, row * 4, 13, 3);
    }
    app.set_cells(cells);

    assert_eq!(app.cell_at(0, 0), Some(Position::TopLeft));
    assert_eq!(app.cell_at(14 + 12, 4 + 2), Some(Position::Center));
    assert_eq!(app.cell_at(13, 0), None);
    assert_eq!(app.cell_at(28, 8), Some(Position::BottomRight));
}
