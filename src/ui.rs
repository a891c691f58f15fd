use crate::app::AppSnapshot;
use crate::controller::Phase;
use crate::entries::PALETTE_LEN;
use color_eyre::eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::*;
use std::io::stdout;
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

/// Hex palette carried over from the web original, one color per
/// `color_index`. Length must stay in sync with `PALETTE_LEN`.
const PALETTE: [Color; PALETTE_LEN] = [
    Color::Rgb(0xef, 0x44, 0x44),
    Color::Rgb(0xf9, 0x73, 0x16),
    Color::Rgb(0xf5, 0x9e, 0x0b),
    Color::Rgb(0x84, 0xcc, 0x16),
    Color::Rgb(0x10, 0xb9, 0x81),
    Color::Rgb(0x06, 0xb6, 0xd4),
    Color::Rgb(0x3b, 0x82, 0xf6),
    Color::Rgb(0x63, 0x66, 0xf1),
    Color::Rgb(0x8b, 0x5c, 0xf6),
    Color::Rgb(0xd9, 0x46, 0xef),
    Color::Rgb(0xf4, 0x3f, 0x5e),
];

const LABEL_MAX_WIDTH: usize = 14;

pub enum UserEvent {
    Quit,
    Fetch,
    DayUp,
    DayDown,
    SelectDay,
    Spin,
    Dismiss,
    Redraw,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Mode {
    #[default]
    Normal,
    WinnerModal,
    QuitModal,
}

#[derive(Debug, Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl UiState {
    /// Called by the app loop when a spin resolves so key handling switches
    /// to the winner modal.
    pub fn show_winner(&mut self) {
        self.mode = Mode::WinnerModal;
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    // One persistent Terminal so buffers survive across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// Waits up to `timeout` for input; `None` means the tick elapsed with no
/// event, which is what drives animation frames while spinning.
pub fn poll_event(state: &mut UiState, timeout: Duration) -> Result<Option<UserEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let key = match event::read()? {
        Event::Key(k) if k.kind == KeyEventKind::Press => k,
        Event::Resize(_, _) => return Ok(Some(UserEvent::Redraw)),
        _ => return Ok(None),
    };
    let user_event = match state.mode {
        Mode::WinnerModal => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                state.mode = Mode::Normal;
                UserEvent::Dismiss
            }
            KeyCode::Char('q') => {
                state.mode = Mode::QuitModal;
                UserEvent::Redraw
            }
            _ => return Ok(None),
        },
        Mode::QuitModal => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => UserEvent::Quit,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                UserEvent::Redraw
            }
            _ => return Ok(None),
        },
        Mode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                state.mode = Mode::QuitModal;
                UserEvent::Redraw
            }
            KeyCode::Char('f') => UserEvent::Fetch,
            KeyCode::Up => UserEvent::DayUp,
            KeyCode::Down => UserEvent::DayDown,
            KeyCode::Enter => UserEvent::SelectDay,
            KeyCode::Char('s') | KeyCode::Char(' ') => UserEvent::Spin,
            _ => return Ok(None),
        },
    };
    Ok(Some(user_event))
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status
            Constraint::Min(12),   // days + wheel
            Constraint::Length(3), // errors + help
        ])
        .split(f.area());

    draw_status(f, chunks[0], snap);
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(30)])
        .split(chunks[1]);
    draw_days(f, main[0], snap);
    draw_wheel(f, main[1], snap);
    draw_help(f, chunks[2], snap);
    draw_modals(f, state, snap);
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Ready => "ready",
        Phase::Spinning => "spinning",
        Phase::Resolved => "resolved",
    }
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let day = snap
        .selected_day
        .map_or_else(|| String::from("-"), |d| format!("Day {d}"));
    let status = Paragraph::new(format!(
        "Source: {} | {} | Entries: {} | State: {} | {}",
        snap.source_label,
        day,
        snap.entry_count,
        phase_label(snap.phase),
        snap.status
    ))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_days(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines = Vec::new();
    if snap.days.is_empty() {
        lines.push(Line::styled(
            "No data loaded",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for (i, day) in snap.days.iter().enumerate() {
            let cursor = if i == snap.day_cursor { ">" } else { " " };
            let text = format!("{cursor} Day {day}");
            if snap.selected_day == Some(*day) {
                lines.push(Line::styled(
                    text,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                lines.push(Line::from(text));
            }
        }
    }
    let days = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Days"));
    f.render_widget(days, area);
}

fn draw_wheel(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let title = match snap.phase {
        Phase::Spinning => "Wheel (spinning...)",
        _ => "Wheel",
    };
    if snap.slices.is_empty() {
        let empty = Paragraph::new("Pick a day with entries to arm the wheel")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.4, 1.4])
        .y_bounds([-1.4, 1.4])
        .paint(|ctx| {
            for slice in &snap.slices {
                let coords = wedge_points(slice.start, slice.end);
                ctx.draw(&Points {
                    coords: &coords,
                    color: palette_color(slice.color_index),
                });
            }
            ctx.layer();
            for slice in &snap.slices {
                let (x, y) = to_screen(slice.label_at.0, slice.label_at.1);
                let label = truncate_label(&slice.label, LABEL_MAX_WIDTH);
                ctx.print(
                    x,
                    y,
                    Line::styled(label, Style::default().fg(palette_color(slice.color_index))),
                );
            }
            // fixed selection pointer at the top of the wheel
            ctx.print(0.0, 1.2, Line::styled("▼", Style::default().fg(Color::Yellow)));
        });
    f.render_widget(canvas, area);
}

/// Wheel angles live in a y-down frame, the ratatui canvas is y-up; flip
/// when painting so the slice at 3π/2 sits under the top pointer.
fn to_screen(x: f64, y: f64) -> (f64, f64) {
    (x, -y)
}

/// Screen coordinates filling the wedge between `start` and `end`:
/// concentric point fans out to the rim, sampled densely enough that the
/// braille grid reads as a solid slice.
fn wedge_points(start: f64, end: f64) -> Vec<(f64, f64)> {
    let arc_len = end - start;
    let rings = 16usize;
    let mut coords = Vec::new();
    for ring in 1..=rings {
        let r = ring as f64 / rings as f64;
        let steps = ((arc_len * r * 48.0).ceil() as usize).max(1);
        for s in 0..=steps {
            let t = start + arc_len * s as f64 / steps as f64;
            coords.push(to_screen(r * t.cos(), r * t.sin()));
        }
    }
    coords
}

fn draw_help(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines = Vec::new();
    if snap.errors.is_empty() {
        lines.push(Line::from(
            "↑/↓ day | Enter load day | s spin | f fetch | q quit",
        ));
    } else {
        for e in &snap.errors {
            lines.push(Line::styled(e.clone(), Style::default().fg(Color::Red)));
        }
    }
    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    match state.mode {
        Mode::WinnerModal => {
            let area = centered_rect(50, 30, f.area());
            let block = Block::default()
                .borders(Borders::ALL)
                .title("Winner")
                .border_style(Style::default().fg(Color::Yellow));
            let name = snap.winner.as_deref().unwrap_or("(unknown)");
            let p = Paragraph::new(format!(
                "🎉 {name} 🎉\n\nEnter/Esc dismiss (same pool, re-spin allowed)"
            ))
            .alignment(Alignment::Center);
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::QuitModal => {
            let area = centered_rect(40, 20, f.area());
            let block = Block::default().borders(Borders::ALL).title("Confirm Quit");
            let p = Paragraph::new("Quit the raffle? (Y/N)");
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal => {}
    }
}

fn palette_color(color_index: usize) -> Color {
    PALETTE[color_index % PALETTE.len()]
}

fn truncate_label(label: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in label.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn truncate_label__short_name__unchanged() {
        assert_eq!(truncate_label("Ada", 14), "Ada");
    }

    #[test]
    fn truncate_label__long_name__cut_at_cell_width() {
        assert_eq!(
            truncate_label("A very long leaderboard name", 14),
            "A very long le"
        );
    }

    #[test]
    fn truncate_label__wide_chars__counts_two_cells_each() {
        assert_eq!(truncate_label("星星星星", 5), "星星");
    }

    #[test]
    fn palette_color__wraps_around() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
    }

    #[test]
    fn wheel_painting__resolved_slice__sits_under_the_top_pointer() {
        use crate::entries::{Entry, EntrySet};
        use crate::{wheel, winner};

        // given
        let entries: EntrySet = (0..4)
            .map(|i| Entry {
                name: format!("m{i}"),
                color_index: i,
            })
            .collect();
        let rotation = 1.3;
        let winner = winner::resolve(&entries, rotation).unwrap().clone();

        // when: map the winning slice's midpoint into the painted frame
        let slices = wheel::slices(&entries, rotation);
        let slice = slices.iter().find(|s| s.label == winner.name).unwrap();
        let mid = (slice.start + slice.end) / 2.0;
        let (_, y) = to_screen(mid.cos(), mid.sin());

        // then: it paints in the upper half, on the ▼ marker's side
        assert!(y > 0.0, "winning slice painted at y = {y}");
    }

    #[test]
    fn wedge_points__quarter_slice__fills_inside_the_unit_wheel() {
        let coords = wedge_points(0.0, std::f64::consts::FRAC_PI_2);

        assert!(coords.iter().all(|(x, y)| x * x + y * y <= 1.0 + 1e-9));
        // interior coverage, not just an outline
        assert!(coords.iter().any(|(x, y)| (x * x + y * y).sqrt() < 0.5));
    }
}
