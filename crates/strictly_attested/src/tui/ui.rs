//! Rendering for the terminal game.

use super::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use strictly_board::{AttestationStatus, BoardController, Player, Position, Square};

/// Log file named in error hints.
pub const LOG_FILE: &str = "strictly_attested.log";

const CELL_WIDTH: u16 = 13;
const CELL_HEIGHT: u16 = 3;

/// Renders the whole screen and records the cell areas for mouse input.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Status
            Constraint::Min(11),   // Board
            Constraint::Length(4), // Advisory
            Constraint::Length(7), // Attestations
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let status = Paragraph::new(app.game().status_line())
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::bordered());
    frame.render_widget(status, chunks[1]);

    let cells = draw_board(frame, chunks[2], app.game(), app.cursor());
    app.set_cells(cells);

    draw_advisory(frame, chunks[3], app.game());
    draw_attestations(frame, chunks[4], app);

    let help = Paragraph::new("1-9 / arrows + Enter / click: place   r: reset   q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}

fn draw_board(
    frame: &mut Frame,
    area: Rect,
    game: &BoardController,
    cursor: Position,
) -> [Rect; 9] {
    let board_area = center_rect(area, CELL_WIDTH * 3 + 2, CELL_HEIGHT * 3 + 2);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(CELL_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(CELL_HEIGHT),
        ])
        .split(board_area);

    let winning = game.winning_line();
    let mut cells = [Rect::default(); 9];
    for (row, row_area) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(CELL_WIDTH),
                Constraint::Length(1),
                Constraint::Length(CELL_WIDTH),
                Constraint::Length(1),
                Constraint::Length(CELL_WIDTH),
            ])
            .split(row_area);

        for (col, cell_area) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
            let index = row * 3 + col;
            if let Some(pos) = Position::from_index(index) {
                let highlighted = winning.is_some_and(|line| line.contains(&pos));
                draw_cell(frame, cell_area, game, pos, pos == cursor, highlighted);
                cells[index] = cell_area;
            }
        }
        draw_separator_vertical(frame, cols[1]);
        draw_separator_vertical(frame, cols[3]);
    }
    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);

    cells
}

fn draw_cell(
    frame: &mut Frame,
    area: Rect,
    game: &BoardController,
    pos: Position,
    under_cursor: bool,
    highlighted: bool,
) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let (symbol, mut style) = match game.board().get(pos) {
        Square::Occupied(Player::X) => ("X".to_string(), bold.fg(Color::Blue)),
        Square::Occupied(Player::O) => ("O".to_string(), bold.fg(Color::Red)),
        Square::Empty if game.pending() == Some(pos) => (
            game.to_move().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Square::Empty if game.is_cell_enabled(pos) => (
            (pos.to_index() + 1).to_string(),
            Style::default().fg(Color::Gray),
        ),
        Square::Empty => ("·".to_string(), Style::default().fg(Color::DarkGray)),
    };

    if highlighted {
        style = style.bg(Color::Green).fg(Color::Black);
    }
    if under_cursor {
        style = style.bg(Color::White).fg(Color::Black);
    }

    let text = vec![Line::from(""), Line::from(Span::styled(format!("  {}  ", symbol), style))];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_advisory(frame: &mut Frame, area: Rect, game: &BoardController) {
    let Some(advisory) = game.advisory() else {
        return;
    };
    let text = vec![
        Line::from(Span::styled(advisory, Style::default().fg(Color::Red))),
        Line::from(Span::styled(
            format!("Check {} for more details.", LOG_FILE),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(Color::Red)));
    frame.render_widget(paragraph, area);
}

fn draw_attestations(frame: &mut Frame, area: Rect, app: &App) {
    let game = app.game();
    let mut lines = vec![Line::from(Span::styled(
        format!("Player: {}", game.identity()),
        Style::default().fg(Color::DarkGray),
    ))];

    match game.attestation() {
        AttestationStatus::Idle if !game.is_attested() => {
            lines.push(Line::from("Offline: moves are not attested"));
        }
        AttestationStatus::Idle => lines.push(Line::from("No attestations yet")),
        AttestationStatus::Attesting => lines.push(Line::from(Span::styled(
            "Creating attestation...",
            Style::default().fg(Color::Yellow),
        ))),
        AttestationStatus::Confirmed(record) => lines.push(Line::from(Span::styled(
            format!("Attestation created: {}", record.uid),
            Style::default().fg(Color::Green),
        ))),
        AttestationStatus::Failed(message) => {
            lines.push(Line::from(Span::styled(
                format!("Error: {}", message),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(format!("Please check {} for more details.", LOG_FILE)));
        }
    }

    let room = usize::from(area.height.saturating_sub(2)).saturating_sub(lines.len());
    let recent = app.log().iter().rev().take(room).rev();
    let muted = Style::default().fg(Color::Gray);
    lines.extend(recent.map(|entry| Line::from(Span::styled(entry.as_str(), muted))));

    let paragraph = Paragraph::new(lines).block(Block::bordered().title("Game Attestations"));
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
