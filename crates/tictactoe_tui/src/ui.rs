//! Stateless rendering of the game screen.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_board::{Player, SIZE, Square};

use crate::app::{App, CONFIRM_QUIT_MESSAGE, Mode};

const CELL_WIDTH: u16 = 7;
const CELL_HEIGHT: u16 = 3;

/// Renders the whole screen and returns where each cell was drawn.
pub fn draw(frame: &mut Frame, app: &App) -> Vec<(Rect, (usize, usize))> {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Menu
            Constraint::Min(grid_height()), // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Prompt or message
        ])
        .split(area);

    let title = Paragraph::new("Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_menu(frame, chunks[1], app);
    let cells = draw_board(frame, chunks[2], app);

    let display = app.display();
    let status = Paragraph::new(display.status_text().as_str())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[3]);

    draw_footer(frame, chunks[4], app);
    cells
}

fn draw_menu(frame: &mut Frame, area: Rect, app: &App) {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    let save_style = if *app.display().save_enabled() {
        enabled
    } else {
        disabled
    };

    let menu = Line::from(vec![
        Span::styled("[r] Reset  ", enabled),
        Span::styled("[s] Save  ", save_style),
        Span::styled("[o] Load  ", enabled),
        Span::styled("[q] Quit", enabled),
    ]);
    frame.render_widget(Paragraph::new(menu).alignment(Alignment::Center), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let text = match app.mode() {
        Mode::Prompt { kind, input } => {
            let mut line = format!("{}: {}_", kind, input);
            if let Some(message) = app.message() {
                line = format!("{}  ({})", line, message);
            }
            line
        }
        Mode::ConfirmQuit => CONFIRM_QUIT_MESSAGE.to_string(),
        Mode::Playing => app.message().unwrap_or_default().to_string(),
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn grid_width() -> u16 {
    CELL_WIDTH * SIZE as u16 + (SIZE as u16 - 1)
}

fn grid_height() -> u16 {
    CELL_HEIGHT * SIZE as u16 + (SIZE as u16 - 1)
}

/// Builds cell constraints interleaved with one-wide separators.
fn interleaved(cell: u16) -> Vec<Constraint> {
    (0..SIZE)
        .flat_map(|i| {
            let sep = (i + 1 < SIZE).then_some(Constraint::Length(1));
            std::iter::once(Constraint::Length(cell)).chain(sep)
        })
        .collect()
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) -> Vec<(Rect, (usize, usize))> {
    let board_area = center_rect(area, grid_width(), grid_height());
    let display = app.display();
    let dim = Style::default().fg(Color::DarkGray);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(interleaved(CELL_HEIGHT))
        .split(board_area);

    let mut cells = Vec::with_capacity(SIZE * SIZE);
    for x in 0..SIZE {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(interleaved(CELL_WIDTH))
            .split(rows[x * 2]);

        for y in 0..SIZE {
            let cell_area = cols[y * 2];
            let square = display.cells()[x][y];
            draw_cell(frame, cell_area, square, app.cursor() == (x, y));
            cells.push((cell_area, (x, y)));

            if y + 1 < SIZE {
                frame.render_widget(Paragraph::new("│\n│\n│").style(dim), cols[y * 2 + 1]);
            }
        }

        if x + 1 < SIZE {
            let sep = "─".repeat(board_area.width as usize);
            frame.render_widget(Paragraph::new(sep).style(dim), rows[x * 2 + 1]);
        }
    }
    cells
}

fn draw_cell(frame: &mut Frame, area: Rect, square: Square, selected: bool) {
    let (symbol, base_style) = match square {
        Square::Empty => (" ", Style::default().fg(Color::DarkGray)),
        Square::Occupied(Player::X) => (
            "X",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Player::O) => (
            "O",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if selected {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    // Middle line of the cell carries the mark.
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(symbol, style)),
        Line::from(""),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).style(if selected {
        Style::default().bg(Color::White)
    } else {
        Style::default()
    });
    frame.render_widget(paragraph, area);
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
