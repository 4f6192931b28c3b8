//! Backlog scrollbar widget.
//!
//! Draws the engine's thumb geometry on a character grid. The thumb's size
//! and position come from the engine; this draws every row the thumb touches,
//! the same rows the engine accepts a press on.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use wordsd_core::viewer::ScrollThumb;

/// Symbol for the thumb.
const THUMB_SYMBOL: &str = "█";
/// Symbol for the track.
const TRACK_SYMBOL: &str = "│";

#[derive(Debug, Clone)]
pub struct Scrollbar {
    /// Thumb offset from the top of the track.
    thumb_start: f32,
    thumb_height: f32,
    grabbed: bool,
}

impl Scrollbar {
    /// `track_top` is the track's y in the same units as `thumb`.
    pub fn new(thumb: ScrollThumb, track_top: f32, grabbed: bool) -> Self {
        Self {
            thumb_start: thumb.y - track_top,
            thumb_height: thumb.height,
            grabbed,
        }
    }

    /// Thumb cell range within a track of `track_len` cells.
    fn thumb_cells(&self, track_len: usize) -> (usize, usize) {
        let first = self.thumb_start.max(0.0).floor();
        let end = (self.thumb_start + self.thumb_height).ceil().max(first + 1.0);
        let len = ((end - first) as usize).min(track_len);
        let start = (first as usize).min(track_len - len);
        (start, len)
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let track_len = area.height as usize;
        if track_len == 0 || area.width == 0 {
            return;
        }

        let (thumb_start, thumb_len) = self.thumb_cells(track_len);
        let thumb_style = if self.grabbed {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let track_style = Style::default().fg(Color::DarkGray);

        let x = area.x + area.width.saturating_sub(1);
        for (idx, y) in (area.y..area.y + area.height).enumerate() {
            if idx >= thumb_start && idx < thumb_start + thumb_len {
                buf.set_string(x, y, THUMB_SYMBOL, thumb_style);
            } else {
                buf.set_string(x, y, TRACK_SYMBOL, track_style);
            }
        }
    }
}
