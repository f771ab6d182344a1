//! Exhaustive checks of outcome rules over every 3x3 marking.

use strictly_board::rules::{LINES, check_winner, is_draw};
use strictly_board::{Board, Outcome, Player, Position, Square};

/// Every assignment of {empty, X, O} to the nine squares.
fn all_boards() -> impl Iterator<Item = Board> {
    (0..3usize.pow(9)).map(|mut code| {
        let mut board = Board::new();
        for pos in Position::ALL {
            match code % 3 {
                1 => board.set(pos, Square::Occupied(Player::X)),
                2 => board.set(pos, Square::Occupied(Player::O)),
                _ => {}
            }
            code /= 3;
        }
        board
    })
}

fn owns_a_line(board: &Board, player: Player) -> bool {
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == Square::Occupied(player)))
}

#[test]
fn test_single_line_owner_is_winner() {
    for board in all_boards() {
        let x = owns_a_line(&board, Player::X);
        let o = owns_a_line(&board, Player::O);
        match (x, o) {
            (true, false) => assert_eq!(Outcome::of(&board), Outcome::Winner(Player::X)),
            (false, true) => assert_eq!(Outcome::of(&board), Outcome::Winner(Player::O)),
            // Both players can only own lines on boards unreachable in play.
            (true, true) => assert!(check_winner(&board).is_some()),
            (false, false) => assert_eq!(check_winner(&board), None),
        }
    }
}

#[test]
fn test_full_board_without_line_is_draw() {
    for board in all_boards().filter(Board::is_full) {
        let no_line = !owns_a_line(&board, Player::X) && !owns_a_line(&board, Player::O);
        assert_eq!(is_draw(&board), no_line);
        if no_line {
            assert_eq!(Outcome::of(&board), Outcome::Draw);
        }
    }
}

#[test]
fn test_exactly_one_outcome_per_board() {
    for board in all_boards() {
        let outcome = Outcome::of(&board);
        let terminal = outcome.winner().is_some() || is_draw(&board);
        assert_eq!(outcome.is_terminal(), terminal, "{}", board.display());
    }
}

#[test]
fn test_valid_moves_are_the_empty_squares() {
    let mut board = Board::new();
    board.set(Position::TopLeft, Square::Occupied(Player::X));
    board.set(Position::Center, Square::Occupied(Player::O));

    let valid = Position::valid_moves(&board);
    assert_eq!(valid.len(), 7);
    assert!(!valid.contains(&Position::TopLeft));
    assert!(!valid.contains(&Position::Center));
    assert!(valid.contains(&Position::BottomRight));
}
