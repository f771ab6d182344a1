//! Application state for the terminal game.

use super::input::Action;
use ratatui::layout::Rect;
use strictly_board::{BoardController, MoveAttestation, MoveReport, MoveTicket, Position};
use tracing::{debug, instrument};

/// Attestation log lines kept for display.
const LOG_CAPACITY: usize = 50;

/// Main application state.
#[derive(Debug)]
pub struct App {
    game: BoardController,
    cursor: Position,
    cells: [Rect; 9],
    log: Vec<String>,
    should_quit: bool,
}

impl App {
    /// Creates the app around a controller.
    pub fn new(game: BoardController) -> Self {
        Self {
            game,
            cursor: Position::Center,
            cells: [Rect::default(); 9],
            log: Vec::new(),
            should_quit: false,
        }
    }

    /// The game.
    pub fn game(&self) -> &BoardController {
        &self.game
    }

    /// Cell under the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Timestamped attestation results, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// True once the player asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies an input action. Returns a ticket when a move must be attested
    /// before it is committed.
    #[instrument(skip(self))]
    pub fn apply(&mut self, action: Action) -> Option<MoveTicket> {
        match action {
            Action::Cursor(position) => {
                self.cursor = position;
                None
            }
            Action::Place(position) => {
                self.cursor = position;
                match self.game.begin_move(position.to_index()) {
                    Ok(ticket) => Some(ticket),
                    Err(e) => {
                        debug!(reason = %e, "Ignoring click");
                        None
                    }
                }
            }
            Action::Reset => {
                self.game.reset();
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
        }
    }

    /// Commits a move once its attestation settled.
    #[instrument(skip(self, attestation))]
    pub fn settle(&mut self, ticket: MoveTicket, attestation: MoveAttestation) -> MoveReport {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        let line = match &attestation {
            MoveAttestation::Offline => None,
            MoveAttestation::Confirmed(record) => {
                Some(format!("{} {} attested {}", stamp, ticket.mv(), record.uid))
            }
            MoveAttestation::Failed(e) => {
                Some(format!("{} {} not attested: {}", stamp, ticket.mv(), e.message))
            }
        };
        if let Some(line) = line {
            if self.log.len() == LOG_CAPACITY {
                self.log.remove(0);
            }
            self.log.push(line);
        }
        self.game.commit_move(ticket, attestation)
    }

    /// Records where each cell was drawn.
    pub fn set_cells(&mut self, cells: [Rect; 9]) {
        self.cells = cells;
    }

    /// Cell under a terminal coordinate.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        self.cells
            .iter()
            .position(|r| {
                column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .and_then(Position::from_index)
    }
}
