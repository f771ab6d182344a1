//! Terminal UI.
//!
//! Attestation calls run on spawned tasks and report back over a channel, so
//! the screen keeps redrawing (and reset keeps working) while a move waits.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Action, key_action, move_cursor};
pub use ui::LOG_FILE;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use strictly_board::{BoardController, MoveAttestation, MoveTicket, attest_ticket};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

type Settled = (MoveTicket, MoveAttestation);

/// Runs the game until the player quits.
pub async fn run_tui(game: BoardController) -> Result<()> {
    info!(attested = game.is_attested(), identity = %game.identity(), "Starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(game);
    let res = run_game(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!(moves = app.game().history().len(), "TUI closed");
    res
}

#[instrument(skip_all)]
async fn run_game(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Settled>();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok((ticket, attestation)) = rx.try_recv() {
            app.settle(ticket, attestation);
        }

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    key_action(app.cursor(), key.code)
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => app.cell_at(column, row).map(Action::Place),
                _ => None,
            };

            if let Some(ticket) = action.and_then(|action| app.apply(action)) {
                dispatch(app, ticket, &tx);
            }
        }
    }
}

/// Commits offline moves at once; otherwise attests on a task.
fn dispatch(app: &mut App, ticket: MoveTicket, tx: &mpsc::UnboundedSender<Settled>) {
    let Some(port) = app.game().port() else {
        app.settle(ticket, MoveAttestation::Offline);
        return;
    };

    let tx = tx.clone();
    tokio::spawn(async move {
        let attestation = attest_ticket(Some(port.as_ref()), &ticket).await;
        if tx.send((ticket, attestation)).is_err() {
            warn!("UI closed before the attestation settled");
        }
    });
}
