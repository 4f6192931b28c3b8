//! Rendering: pure functions from engine state to a frame.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Clear, Widget};
use unicode_width::UnicodeWidthStr;
use wordsd_core::Engine;
use wordsd_core::geometry;
use wordsd_core::viewer::{CLOSE_LABEL, TITLE};

use crate::common::Scrollbar;
use crate::common::style::message_style;

/// Cursor shown after the text being revealed.
const REVEAL_CURSOR: &str = "▌";

/// Footer state owned by the runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    /// Modifier release is reported, so fast-forward is held rather than toggled.
    pub hold_to_skip: bool,
    pub script_finished: bool,
}

pub fn render(engine: &Engine, status: Status, frame: &mut Frame<'_>) {
    let area = frame.area();
    let buf = frame.buffer_mut();

    render_board(engine, area, buf);
    if engine.viewer().is_open() {
        render_backlog(engine, area, buf);
    }
    render_footer(engine, status, area, buf);
}

fn render_board(engine: &Engine, area: Rect, buf: &mut Buffer) {
    let board = engine.board();
    let measure = board.measure();
    let width = board.wrap_width();

    for entry in board.entries() {
        let style = message_style(entry.style, entry.dimmed);
        let mut lines = measure.wrap(&entry.visible_text(), width);
        if engine.revealing() == Some(entry.id)
            && let Some(last) = lines.last_mut()
        {
            last.push_str(REVEAL_CURSOR);
        }
        for (i, line) in lines.iter().enumerate() {
            put_line(buf, area, entry.bounds.x, entry.bounds.y + i as f32, line, style);
        }
    }
}

fn render_backlog(engine: &Engine, area: Rect, buf: &mut Buffer) {
    let viewer = engine.viewer();
    let chrome = viewer.chrome();
    Clear.render(area, buf);

    // Entries are clipped to the band between the two masks.
    let visible_top = chrome.top_mask.bottom();
    let visible_bottom = chrome.bottom_mask.y;
    let line_height = engine.board().measure().line_height();
    for (rect, entry) in viewer.entries() {
        if rect.bottom() <= visible_top || rect.y >= visible_bottom {
            continue;
        }
        let style = message_style(entry.style, false);
        for (i, line) in entry.lines.iter().enumerate() {
            let y = rect.y + i as f32 * line_height;
            if y >= visible_top && y < visible_bottom {
                put_line(buf, area, rect.x, y, line, style);
            }
        }
    }

    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let title_y = (chrome.title.y + chrome.title.height / 2.0).floor();
    let title_x = chrome.title.x + ((chrome.title.width - TITLE.width() as f32) / 2.0).max(0.0);
    put_line(buf, area, title_x.floor(), title_y, TITLE, title_style);

    let close_x = (chrome.close.x + chrome.close.width / 2.0).floor();
    let close_y = (chrome.close.y + chrome.close.height / 2.0).floor();
    put_line(
        buf,
        area,
        close_x,
        close_y,
        CLOSE_LABEL,
        Style::default().fg(Color::LightRed),
    );

    if let Some(thumb) = viewer.thumb() {
        let track = to_cells(chrome.track, area);
        Scrollbar::new(thumb, chrome.track.y, viewer.is_dragging()).render(track, buf);
    }
}

fn render_footer(engine: &Engine, status: Status, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let y = area.bottom() - 1;
    let dim = Style::default().fg(Color::DarkGray);

    let text = if engine.viewer().is_open() {
        "wheel/drag: scroll · right click/Esc/×: close".to_string()
    } else {
        let skip = if status.hold_to_skip {
            "hold Ctrl: skip"
        } else {
            "Tab: skip on/off"
        };
        let end = if status.script_finished { "The end. " } else { "" };
        format!("{end}click/Enter: next · {skip} · wheel up/PgUp: backlog · q: quit")
    };
    buf.set_stringn(area.x, y, &text, area.width as usize, dim);

    if engine.playback().is_fast_forward() {
        let badge = " ▶▶ SKIP ";
        let width = badge.width() as u16;
        if area.width > width {
            buf.set_string(
                area.right() - width,
                y,
                badge,
                Style::default().fg(Color::Black).bg(Color::Yellow),
            );
        }
    }
}

/// Writes one line at engine coordinates, clipped to `area`.
fn put_line(buf: &mut Buffer, area: Rect, x: f32, y: f32, line: &str, style: Style) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u16, y as u16);
    if x >= area.width || y >= area.height {
        return;
    }
    let max = (area.width - x) as usize;
    buf.set_stringn(area.x + x, area.y + y, line, max, style);
}

fn to_cells(rect: geometry::Rect, area: Rect) -> Rect {
    let x = rect.x.max(0.0) as u16;
    let y = rect.y.max(0.0) as u16;
    let clip = |v: f32, max: u16| (v.max(0.0) as u16).min(max);
    Rect::new(
        area.x + x.min(area.width),
        area.y + y.min(area.height),
        clip(rect.width, area.width.saturating_sub(x)),
        clip(rect.height, area.height.saturating_sub(y)),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::oneshot;
    use wordsd_core::measure::CellMeasure;
    use wordsd_core::{Config, InputEvent, MessageStyle, ScriptCommand};

    use super::*;

    fn engine(width: u16, height: u16) -> Engine {
        let mut engine = Engine::new(&Config::default(), Arc::new(CellMeasure));
        engine.resize(f32::from(width), f32::from(height));
        engine
    }

    fn show(engine: &mut Engine, text: &str, style: MessageStyle) {
        let (reply, _rx) = oneshot::channel();
        engine.handle_command(
            ScriptCommand::Show {
                text: text.to_string(),
                style,
                reply,
            },
            Instant::now(),
        );
    }

    fn draw(engine: &Engine, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render(engine, Status::default(), frame))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_board_entries_render_at_their_rows() {
        let mut engine = engine(60, 20);
        show(&mut engine, "Hello", MessageStyle::Normal);
        show(&mut engine, "World", MessageStyle::Warning);

        let buf = draw(&engine, 60, 20);
        assert!(row(&buf, 2).starts_with("      Hello"));
        assert!(row(&buf, 4).starts_with("      World"));
        assert!(buf[(6, 2)].modifier.contains(Modifier::DIM));
        assert!(buf[(6, 4)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_backlog_overlay_draws_chrome() {
        let mut engine = engine(60, 20);
        engine.handle_input(InputEvent::Wheel { delta_y: -1.0 }, Instant::now());
        assert!(engine.viewer().is_open());

        let buf = draw(&engine, 60, 20);
        let screen: String = (0..20).map(|y| row(&buf, y)).collect();
        assert!(screen.contains(TITLE));
        assert!(screen.contains(CLOSE_LABEL));
        assert!(screen.contains("█"));
    }

    #[test]
    fn test_press_on_drawn_thumb_cell_starts_drag() {
        let mut engine = engine(100, 30);
        let t0 = Instant::now();
        engine.handle_command(ScriptCommand::SetRecording { armed: true }, t0);
        for i in 0..1000 {
            show(&mut engine, &format!("line {i}"), MessageStyle::Normal);
        }
        let (reply, _rx) = oneshot::channel();
        engine.handle_command(ScriptCommand::Clear { reply }, t0);

        // The first notch opens the backlog, the rest scroll up.
        for _ in 0..8 {
            engine.handle_input(InputEvent::Wheel { delta_y: -1.0 }, t0);
        }

        let buf = draw(&engine, 100, 30);
        let x = engine.viewer().chrome().track.x as u16;
        let row = (0..30)
            .find(|&y| buf[(x, y)].symbol() == "█")
            .expect("thumb drawn");
        engine.handle_input(
            InputEvent::PointerDown {
                x: f32::from(x),
                y: f32::from(row),
            },
            t0,
        );
        assert!(engine.viewer().is_dragging());

        let before = engine.viewer().offset();
        engine.handle_input(
            InputEvent::PointerMove {
                x: f32::from(x),
                y: f32::from(row) - 4.0,
            },
            t0,
        );
        assert!(engine.viewer().offset() < before);
    }
}
