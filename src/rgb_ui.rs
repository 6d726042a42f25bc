// Terminal UI rendering and event handling
// Drives the session loop: input translation, per-tick redraw, win/loss banners

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crate::rgb_color;
use crate::rgb_game::{save_config, CellView, Config, Game};
use crate::rgb_lang::Lang;
use unicode_width::UnicodeWidthStr;

// Fixed session configuration: one board per run, no difficulty selection
const GRID_WIDTH: usize = 10;
const GRID_HEIGHT: usize = 10;
const MINE_COUNT: usize = 10;
// Each board cell spans this many terminal columns
const CELL_COLS: u16 = 2;
// Redraw pacing (~30 Hz)
const TICK_RATE: Duration = Duration::from_millis(33);

/// Map a terminal position to a board cell
/// Offsets into the board's inner area, then integer-divides by the cell
/// width in columns; anything outside the grid maps to None and is ignored
fn cell_at(inner: Rect, column: u16, row: u16, w: usize, h: usize) -> Option<(usize, usize)> {
    if column < inner.x || row < inner.y {
        return None;
    }
    let cx = ((column - inner.x) / CELL_COLS) as usize;
    let cy = (row - inner.y) as usize;
    if cx < w && cy < h {
        Some((cx, cy))
    } else {
        None
    }
}

pub fn run(cfg: &mut Config, lang: &Lang) -> Result<(), Box<dyn Error>> {
    // Build the board before touching the terminal so an invalid
    // configuration fails fast without leaving raw mode behind
    let mut game = Game::new(GRID_WIDTH, GRID_HEIGHT, MINE_COUNT)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut board_rect: Option<Rect> = None;

    // Glyph computation helper: compute glyphs based on ascii_icons setting.
    let make_glyphs = |ascii: bool| {
        (
            if ascii { "▪" } else { "■" },
            if ascii { "*" } else { "☼" },
            if ascii { "F" } else { "⚑" },
        )
    };
    let g_init = make_glyphs(cfg.ascii_icons);
    let mut glyph_unopened = g_init.0;
    let mut glyph_mine = g_init.1;
    let mut glyph_flag = g_init.2;

    // cursor indicator appearance
    let indicator_char = "▸";

    let min_twidth = ((GRID_WIDTH as u16) * CELL_COLS + 3).max(46);
    let min_theight = GRID_HEIGHT as u16 + 5;

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let size = f.size();
            // If terminal too small, render a centered warning and skip normal UI
            if size.width < min_twidth || size.height < min_theight {
                let dim_line = lang
                    .assets
                    .tsmsg_line2
                    .replacen("{}", &min_twidth.to_string(), 1)
                    .replacen("{}", &min_theight.to_string(), 1);
                let warn_lines = vec![
                    Spans::from(Span::raw(lang.assets.tsmsg_line1)),
                    Spans::from(Span::raw(dim_line)),
                ];
                let warn = Paragraph::new(Text::from(warn_lines))
                    .block(Block::default().borders(Borders::ALL).title(lang.assets.tsmsg_title))
                    .alignment(Alignment::Center);
                f.render_widget(Clear, size);
                let w = 40u16.min(size.width.saturating_sub(2));
                let h = 5u16.min(size.height.saturating_sub(2));
                let area = center_rect(w, h, size);
                f.render_widget(warn, area);
                board_rect = None;
                return;
            }

            // layout: center board, bottom status
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(0)
                .constraints([Constraint::Min(6), Constraint::Length(3)].as_ref())
                .split(size);

            // board area
            let board_area = center_rect(
                (GRID_WIDTH as u16) * CELL_COLS + 3,
                GRID_HEIGHT as u16 + 2,
                chunks[0],
            );
            board_rect = Some(board_area);
            let board_bg = rgb_color::board_bg();
            let mut lines = vec![];
            for y in 0..game.h {
                let mut spans = vec![];
                for x in 0..game.w {
                    let (s, mut style) = match game.view(x, y) {
                        CellView::Covered { flagged: false } => (
                            glyph_unopened.to_string(),
                            Style::default()
                                .fg(rgb_color::covered_fg())
                                .bg(rgb_color::covered_bg()),
                        ),
                        CellView::Covered { flagged: true } => (
                            glyph_flag.to_string(),
                            Style::default()
                                .fg(rgb_color::flag_color())
                                .bg(rgb_color::covered_bg()),
                        ),
                        CellView::Mine => (
                            glyph_mine.to_string(),
                            Style::default()
                                .fg(rgb_color::mine_fg())
                                .bg(rgb_color::mine_bg()),
                        ),
                        CellView::Open(0) => (
                            " ".to_string(),
                            Style::default().bg(rgb_color::open_bg(0)),
                        ),
                        CellView::Open(n) => (
                            format!("{}", n),
                            Style::default()
                                .fg(rgb_color::number_color(n))
                                .bg(rgb_color::open_bg(n))
                                .add_modifier(Modifier::BOLD),
                        ),
                    };
                    if game.cursor == (x, y) {
                        style = style.bg(rgb_color::cursor_bg());
                    }
                    // render cursor indicator if enabled and the cursor is on this cell
                    if cfg.show_indicator && game.cursor == (x, y) {
                        let indicator_style = style
                            .fg(rgb_color::flag_color())
                            .add_modifier(Modifier::BOLD);
                        spans.push(Span::styled(indicator_char.to_string(), indicator_style));
                        spans.push(Span::styled(s, style));
                    } else {
                        spans.push(Span::styled(format!(" {}", s), style));
                    }
                }
                // one-character padding column so the right edge keeps the board background
                spans.push(Span::styled(" ", Style::default().bg(board_bg)));
                lines.push(Spans::from(spans));
            }
            let paragraph = Paragraph::new(Text::from(lines))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(lang.assets.board_title)
                        .title_alignment(Alignment::Center),
                )
                .alignment(Alignment::Left);
            f.render_widget(paragraph, board_area);

            // status row (left mine counter + right-aligned key hints)
            let left_text = lang
                .assets
                .status_mines_fmt
                .replacen("{}", &game.remaining_mines().to_string(), 1);
            let right_text = format!(
                "{}   {}   {} ",
                lang.assets.hint_new, lang.assets.hint_concede, lang.assets.hint_quit
            );
            let inner_w = chunks[1].width.saturating_sub(2) as usize;
            let left_w = left_text.as_str().width();
            let right_w = right_text.as_str().width();
            let mid_spaces = if inner_w > left_w + right_w + 1 {
                inner_w - left_w - right_w - 1
            } else {
                1
            };
            let status_spans = vec![
                Span::raw(left_text),
                Span::raw(" ".repeat(mid_spaces)),
                Span::raw(right_text),
            ];
            let status = Paragraph::new(Text::from(Spans::from(status_spans)))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Left);
            f.render_widget(status, chunks[1]);

            // Overlay banners, recomputed every frame from board state.
            // A lost (or conceded) game takes priority over the win banner.
            if game.is_over() {
                draw_banner(
                    f,
                    size,
                    lang.assets.loss_title,
                    lang.assets.loss_message,
                    lang.assets.hint_new,
                    rgb_color::loss_color(),
                );
            } else if game.check_win() {
                draw_banner(
                    f,
                    size,
                    lang.assets.win_title,
                    lang.assets.win_message,
                    lang.assets.hint_new,
                    rgb_color::win_color(),
                );
            }
        })?;

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) => {
                    if kind == KeyEventKind::Press {
                        match code {
                            // intentional concede: end the game and uncover the mines
                            KeyCode::Esc => game.concede(),
                            KeyCode::Char('q') | KeyCode::Char('Q') => break,
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                break
                            }
                            KeyCode::Char('n') | KeyCode::Char('N') => {
                                game = Game::new(GRID_WIDTH, GRID_HEIGHT, MINE_COUNT)?;
                            }
                            KeyCode::Char('i') | KeyCode::Char('I') => {
                                cfg.show_indicator = !cfg.show_indicator;
                                save_config(cfg);
                            }
                            KeyCode::Char('a') | KeyCode::Char('A') => {
                                cfg.ascii_icons = !cfg.ascii_icons;
                                let g = make_glyphs(cfg.ascii_icons);
                                glyph_unopened = g.0;
                                glyph_mine = g.1;
                                glyph_flag = g.2;
                                save_config(cfg);
                            }
                            KeyCode::Left => game.step_cursor(-1, 0),
                            KeyCode::Right => game.step_cursor(1, 0),
                            KeyCode::Up => game.step_cursor(0, -1),
                            KeyCode::Down => game.step_cursor(0, 1),
                            KeyCode::Char(' ') => {
                                let (cx, cy) = game.cursor;
                                game.reveal(cx, cy);
                            }
                            KeyCode::Char('f') | KeyCode::Char('F') => {
                                let (cx, cy) = game.cursor;
                                game.toggle_flag(cx, cy);
                            }
                            _ => {}
                        }
                    }
                }
                Event::Mouse(me) => {
                    if let Some(brect) = board_rect {
                        let inner = Rect::new(
                            brect.x + 1,
                            brect.y + 1,
                            brect.width.saturating_sub(2),
                            brect.height.saturating_sub(2),
                        );
                        match me.kind {
                            MouseEventKind::Moved => {
                                if let Some((cx, cy)) =
                                    cell_at(inner, me.column, me.row, game.w, game.h)
                                {
                                    game.cursor = (cx, cy);
                                }
                            }
                            MouseEventKind::Down(MouseButton::Left) => {
                                if let Some((cx, cy)) =
                                    cell_at(inner, me.column, me.row, game.w, game.h)
                                {
                                    game.cursor = (cx, cy);
                                    game.reveal(cx, cy);
                                }
                            }
                            MouseEventKind::Down(MouseButton::Right) => {
                                if let Some((cx, cy)) =
                                    cell_at(inner, me.column, me.row, game.w, game.h)
                                {
                                    game.cursor = (cx, cy);
                                    game.toggle_flag(cx, cy);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn draw_banner(
    f: &mut ratatui::Frame<'_, CrosstermBackend<io::Stdout>>,
    size: Rect,
    title: &str,
    message: &str,
    hint: &str,
    color: ratatui::style::Color,
) {
    let bw = (message.width().max(hint.width()).max(title.width()) as u16) + 6;
    let rect = center_rect(bw.min(size.width), 5, size);
    f.render_widget(Clear, rect);
    f.render_widget(Block::default().borders(Borders::ALL).title(title), rect);
    let inner = Rect::new(
        rect.x + 1,
        rect.y + 1,
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    );
    let lines = vec![
        Spans::from(Span::styled(
            message,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw(hint)),
    ];
    let p = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
    f.render_widget(p, inner);
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_maps_columns_by_cell_width() {
        let inner = Rect::new(5, 3, 21, 10);
        // Both columns of a cell resolve to the same coordinate
        assert_eq!(cell_at(inner, 5, 3, 10, 10), Some((0, 0)));
        assert_eq!(cell_at(inner, 6, 3, 10, 10), Some((0, 0)));
        assert_eq!(cell_at(inner, 7, 3, 10, 10), Some((1, 0)));
        assert_eq!(cell_at(inner, 24, 12, 10, 10), Some((9, 9)));
    }

    #[test]
    fn test_cell_at_ignores_positions_outside_grid() {
        let inner = Rect::new(5, 3, 21, 10);
        // Left/above the board
        assert_eq!(cell_at(inner, 4, 3, 10, 10), None);
        assert_eq!(cell_at(inner, 5, 2, 10, 10), None);
        // The right padding column and anything past it
        assert_eq!(cell_at(inner, 25, 3, 10, 10), None);
        // Below the last row
        assert_eq!(cell_at(inner, 5, 13, 10, 10), None);
    }
}
