//! Rules for evaluating a board.
//!
//! Pure functions over [`Board`](crate::Board). The controller never stores
//! an outcome; it asks these functions after every committed move.

pub mod draw;
pub mod outcome;
pub mod win;

pub use draw::{is_draw, is_full};
pub use outcome::Outcome;
pub use win::{LINES, check_winner, winning_line};
