use std::io;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use tracing::{debug, info};

use crate::engine::{Cell, Minefield, Position};
use crate::error::Result;
use crate::game::{Action, Minesweeper};

const CELL_WIDTH: u16 = 2; // glyph + space

/// Runs the keyboard/mouse front end until the player quits.
///
/// `new_field` is called for the first game and again on every restart.
pub fn run_tui<F>(mut new_field: F) -> Result<()>
where
    F: FnMut() -> Result<Minefield>,
{
    let mut game = Minesweeper::new(new_field()?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let _guard = TermGuard;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut grid_area = Rect::default();
    loop {
        terminal.draw(|f| { grid_area = ui(f, &game); })?;

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let cursor = game.minefield().cursor();
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('h') | KeyCode::Left => Some(Action::MoveCursor { dx: -1, dy: 0 }),
                    KeyCode::Char('l') | KeyCode::Right => Some(Action::MoveCursor { dx: 1, dy: 0 }),
                    KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveCursor { dx: 0, dy: -1 }),
                    KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveCursor { dx: 0, dy: 1 }),
                    KeyCode::Char('f') | KeyCode::Char('F') => Some(Action::Flag(cursor)),
                    KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => Some(Action::Reveal(cursor)),
                    KeyCode::Char('n') => {
                        info!("starting new game");
                        game = Minesweeper::new(new_field()?);
                        None
                    }
                    _ => None,
                }
            }
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Down(btn) => {
                    let field = game.minefield();
                    pos_to_cell(m.column, m.row, grid_area, field.width(), field.height()).and_then(|pos| match btn {
                        MouseButton::Left => Some(Action::Reveal(pos)),
                        MouseButton::Right => Some(Action::Flag(pos)),
                        MouseButton::Middle => None,
                    })
                }
                _ => None,
            },
            _ => None,
        };

        if let Some(action) = action {
            debug!(?action, "dispatching");
            let was_over = game.is_game_over();
            game.apply(action)?;
            if game.is_game_over() && !was_over {
                game.minefield_mut().reveal_all();
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

fn ui(f: &mut ratatui::Frame, game: &Minesweeper) -> Rect {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let (status, color) = if game.is_game_over() {
        ("Game Over! You revealed a mine. n new game, q quit", Color::Red)
    } else if game.is_victory() {
        ("Congratulations! You cleared the minefield. n new game, q quit", Color::Green)
    } else {
        ("Arrows/HJKL move, Enter/Space reveal, f flag, n new, q quit", Color::Cyan)
    };
    let header = Paragraph::new(status)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Minesweeper"));
    f.render_widget(header, root[0]);

    let field = game.minefield();
    let panel = Block::default().borders(Borders::ALL).title("Minefield");
    let grid = grid_area(panel.inner(root[1]), field);
    f.render_widget(panel, root[1]);
    draw_board(f, field, grid);

    let footer = Paragraph::new(format!(
        "Size: {}x{}  Mines: {}  Flags: {}",
        field.width(),
        field.height(),
        field.mine_count(),
        field.flag_count()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, root[2]);
    grid
}

/// Grid rectangle anchored at the minefield's top-left offset, clipped to `inner`.
fn grid_area(inner: Rect, field: &Minefield) -> Rect {
    let offset = field.top_left();
    let dx = u16::try_from(offset.x).unwrap_or(u16::MAX).min(inner.width);
    let dy = u16::try_from(offset.y).unwrap_or(u16::MAX).min(inner.height);
    let cols = u16::try_from(field.width()).unwrap_or(u16::MAX);
    let rows = u16::try_from(field.height()).unwrap_or(u16::MAX);
    Rect {
        x: inner.x + dx,
        y: inner.y + dy,
        width: cols.saturating_mul(CELL_WIDTH).min(inner.width - dx),
        height: rows.min(inner.height - dy),
    }
}

fn draw_board(f: &mut ratatui::Frame, field: &Minefield, area: Rect) {
    let cursor = field.cursor();
    let mut lines: Vec<Line> = Vec::with_capacity(field.height());
    for y in 0..field.height() {
        let mut spans: Vec<Span> = Vec::with_capacity(field.width());
        for x in 0..field.width() {
            let pos = Position::new(x, y);
            let Ok(cell) = field.cell(pos) else { continue };
            let mut style = cell_style(cell);
            if pos == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{} ", cell.glyph()), style));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn cell_style(cell: &Cell) -> Style {
    if cell.is_revealed() && cell.is_mine() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if cell.is_flagged() {
        Style::default().fg(Color::Yellow)
    } else if cell.is_revealed() {
        number_style(cell.adjacent_mines())
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn number_style(n: u8) -> Style {
    match n {
        0 => Style::default().fg(Color::Gray),
        1 => Style::default().fg(Color::Blue),
        2 => Style::default().fg(Color::Green),
        3 => Style::default().fg(Color::Red),
        4 => Style::default().fg(Color::Magenta),
        5 => Style::default().fg(Color::Yellow),
        6 => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    }
}

fn pos_to_cell(mx: u16, my: u16, grid: Rect, cols: usize, rows: usize) -> Option<Position> {
    if mx < grid.x || my < grid.y { return None; }
    if mx >= grid.x.saturating_add(grid.width) || my >= grid.y.saturating_add(grid.height) { return None; }
    let cx = usize::from((mx - grid.x) / CELL_WIDTH);
    let cy = usize::from(my - grid.y);
    (cx < cols && cy < rows).then_some(Position::new(cx, cy))
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
