//! Full-screen backlog overlay with a proportional, draggable scroll thumb.
//!
//! Content is laid out once on open from a transcript snapshot. Scrolling is
//! a single `offset` into that content, always clamped to
//! `0..=max(0, content_height - viewport_height)`; everything else (entry
//! positions, the scroll window, the thumb) is derived from it.
//!
//! The thumb is never shorter than one line. Presses hit the thumb anywhere
//! in the whole rows it touches, which are the rows a grid renderer draws.

use tracing::{debug, info};

use crate::board::SharedMeasure;
use crate::config::{BacklogConfig, LayoutConfig};
use crate::entry::MessageStyle;
use crate::geometry::{Rect, Size};
use crate::recorder::Transcript;

pub const TITLE: &str = "Back Log";
pub const CLOSE_LABEL: &str = "×";

/// One transcript entry as laid out in the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerEntry {
    pub text: String,
    pub style: MessageStyle,
    pub lines: Vec<String>,
    /// Top relative to the start of the content.
    pub content_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Visible slice of the transcript.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWindow {
    /// Screen y of the first entry's top.
    pub content_top: f32,
    pub content_height: f32,
    pub viewport_top: f32,
    pub viewport_height: f32,
}

/// Scroll indicator, derived from the window. At least one line tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThumb {
    pub y: f32,
    pub height: f32,
}

/// What a press inside the open viewer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerHit {
    Close,
    Thumb,
    Nothing,
}

/// Pointer affordance while the viewer is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// Static overlay decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chrome {
    pub title: Rect,
    pub close: Rect,
    pub top_mask: Rect,
    pub bottom_mask: Rect,
    pub track: Rect,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_pointer_y: f32,
    start_offset: f32,
}

#[derive(Debug)]
struct OpenState {
    entries: Vec<ViewerEntry>,
    content_height: f32,
    offset: f32,
    drag: Option<Drag>,
}

#[derive(Debug)]
enum ViewerState {
    Closed,
    Open(OpenState),
}

pub struct BacklogViewer {
    layout: LayoutConfig,
    scroll_step: f32,
    thumb_width: f32,
    viewport: Size,
    measure: SharedMeasure,
    state: ViewerState,
}

impl BacklogViewer {
    pub fn new(config: &BacklogConfig, viewport: Size, measure: SharedMeasure) -> Self {
        Self {
            layout: config.layout(),
            scroll_step: config.scroll_step,
            thumb_width: config.thumb_width,
            viewport,
            measure,
            state: ViewerState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open(_))
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    /// Opens on a snapshot of `transcript`, scrolled to the newest entry.
    /// Returns false if already open.
    pub fn open(&mut self, transcript: &Transcript) -> bool {
        if self.is_open() {
            return false;
        }
        let width = self.layout.wrap_width(self.viewport.width);
        let mut entries = Vec::with_capacity(transcript.len());
        let mut y = 0.0;
        for item in transcript.entries() {
            let lines = self.measure.wrap(&item.text, width);
            let size = self.measure.measure(&item.text, width);
            entries.push(ViewerEntry {
                text: item.text.clone(),
                style: item.style,
                lines,
                content_y: y,
                width: size.width,
                height: size.height,
            });
            y += size.height + self.layout.line_spacing;
        }
        let content_height = content_height(&entries);
        let mut state = OpenState {
            entries,
            content_height,
            offset: 0.0,
            drag: None,
        };
        state.offset = self.max_offset(content_height);
        info!(
            entries = state.entries.len(),
            offset = state.offset,
            "backlog opened"
        );
        self.state = ViewerState::Open(state);
        true
    }

    /// Discards the rendered entries. Returns false if already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ViewerState::Closed;
        info!("backlog closed");
        true
    }

    /// Relays out the open content for a new viewport, keeping the offset
    /// clamped.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        let width = self.layout.wrap_width(viewport.width);
        let view = self.viewport_height();
        let ViewerState::Open(state) = &mut self.state else {
            return;
        };
        let mut y = 0.0;
        for entry in &mut state.entries {
            let size = self.measure.measure(&entry.text, width);
            entry.lines = self.measure.wrap(&entry.text, width);
            entry.content_y = y;
            entry.width = size.width;
            entry.height = size.height;
            y += size.height + self.layout.line_spacing;
        }
        state.content_height = content_height(&state.entries);
        state.offset = state
            .offset
            .clamp(0.0, (state.content_height - view).max(0.0));
        state.drag = None;
    }

    /// Wheel scroll. Negative `delta_y` scrolls toward older entries.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let step = if delta_y < 0.0 {
            -self.scroll_step
        } else {
            self.scroll_step
        };
        self.scroll_to(self.offset() + step);
    }

    /// Handles a primary press. Starts a drag when the thumb is hit.
    pub fn press(&mut self, x: f32, y: f32) -> ViewerHit {
        if !self.is_open() {
            return ViewerHit::Nothing;
        }
        let chrome = self.chrome();
        if chrome.close.contains(x, y) {
            return ViewerHit::Close;
        }
        let Some(thumb) = self.thumb() else {
            return ViewerHit::Nothing;
        };
        let in_track = x >= chrome.track.x && x < chrome.track.right();
        if !in_track || !thumb.covers_row(y) {
            return ViewerHit::Nothing;
        }
        if let ViewerState::Open(state) = &mut self.state {
            state.drag = Some(Drag {
                start_pointer_y: y,
                start_offset: state.offset,
            });
            debug!(offset = state.offset, "thumb grabbed");
        }
        ViewerHit::Thumb
    }

    /// Pointer moved to `y` while pressed. No-op unless dragging.
    pub fn drag_to(&mut self, y: f32) {
        let ViewerState::Open(state) = &self.state else {
            return;
        };
        let Some(drag) = state.drag else {
            return;
        };
        let Some(thumb) = self.thumb() else {
            return;
        };
        let thumb_travel = self.track_height() - thumb.height;
        if thumb_travel <= 0.0 {
            return;
        }
        // Full thumb travel maps to full content travel.
        let ratio = self.max_offset(state.content_height) / thumb_travel;
        self.scroll_to(drag.start_offset + (y - drag.start_pointer_y) * ratio);
    }

    /// Ends a drag.
    pub fn release(&mut self) {
        if let ViewerState::Open(state) = &mut self.state
            && state.drag.take().is_some()
        {
            debug!(offset = state.offset, "thumb released");
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(&self.state, ViewerState::Open(state) if state.drag.is_some())
    }

    pub fn cursor(&self) -> CursorHint {
        match &self.state {
            ViewerState::Closed => CursorHint::Default,
            ViewerState::Open(state) if state.drag.is_some() => CursorHint::Grabbing,
            ViewerState::Open(_) => CursorHint::Grab,
        }
    }

    /// Current scroll offset; zero when closed.
    pub fn offset(&self) -> f32 {
        match &self.state {
            ViewerState::Open(state) => state.offset,
            ViewerState::Closed => 0.0,
        }
    }

    pub fn window(&self) -> Option<ScrollWindow> {
        let ViewerState::Open(state) = &self.state else {
            return None;
        };
        Some(ScrollWindow {
            content_top: self.layout.margin_top - state.offset,
            content_height: state.content_height,
            viewport_top: self.layout.margin_top,
            viewport_height: self.viewport_height(),
        })
    }

    pub fn thumb(&self) -> Option<ScrollThumb> {
        let ViewerState::Open(state) = &self.state else {
            return None;
        };
        let track = self.track_height();
        let view = self.viewport_height();
        if state.entries.is_empty() || state.content_height <= view {
            return Some(ScrollThumb {
                y: self.layout.margin_top,
                height: track,
            });
        }
        let min = self.measure.line_height().min(track);
        let height = (track * view / state.content_height).max(min);
        let max = self.max_offset(state.content_height);
        let progress = if max > 0.0 { state.offset / max } else { 0.0 };
        Some(ScrollThumb {
            y: self.layout.margin_top + progress * (track - height),
            height,
        })
    }

    /// Entries with their on-screen bounds, including those under the masks.
    pub fn entries(&self) -> impl Iterator<Item = (Rect, &ViewerEntry)> {
        let (entries, top): (&[ViewerEntry], f32) = match &self.state {
            ViewerState::Open(state) => (&state.entries, self.layout.margin_top - state.offset),
            ViewerState::Closed => (&[], 0.0),
        };
        let left = self.layout.margin_left;
        entries.iter().map(move |entry| {
            (
                Rect::new(left, top + entry.content_y, entry.width, entry.height),
                entry,
            )
        })
    }

    pub fn chrome(&self) -> Chrome {
        let Size { width, height } = self.viewport;
        let l = self.layout;
        Chrome {
            title: Rect::new(l.margin_left, 0.0, l.wrap_width(width), l.margin_top),
            close: Rect::new(
                width - l.margin_right,
                height - l.margin_bottom,
                l.margin_right,
                l.margin_bottom,
            ),
            top_mask: Rect::new(0.0, 0.0, width, l.margin_top),
            bottom_mask: Rect::new(0.0, height - l.margin_bottom, width, l.margin_bottom),
            track: Rect::new(
                (width - l.margin_right / 2.0).floor(),
                l.margin_top,
                self.thumb_width,
                self.track_height(),
            ),
        }
    }

    fn scroll_to(&mut self, offset: f32) {
        let view = self.viewport_height();
        if let ViewerState::Open(state) = &mut self.state {
            state.offset = offset.clamp(0.0, (state.content_height - view).max(0.0));
        }
    }

    fn viewport_height(&self) -> f32 {
        (self.viewport.height - self.layout.margin_top - self.layout.margin_bottom).max(0.0)
    }

    fn track_height(&self) -> f32 {
        self.viewport_height()
    }

    fn max_offset(&self, content_height: f32) -> f32 {
        (content_height - self.viewport_height()).max(0.0)
    }
}

impl ScrollThumb {
    /// True if `y` falls in a whole row the thumb touches.
    pub fn covers_row(&self, y: f32) -> bool {
        y >= self.y.floor() && y < (self.y + self.height).ceil()
    }
}

fn content_height(entries: &[ViewerEntry]) -> f32 {
    entries
        .last()
        .map_or(0.0, |last| last.content_y + last.height)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entry::{EntryId, MessageEntry};
    use crate::measure::CellMeasure;
    use crate::recorder::BacklogRecorder;

    const EPS: f32 = 1e-3;

    fn transcript(count: usize) -> Transcript {
        let mut recorder = BacklogRecorder::default();
        recorder.set_armed(true);
        recorder.capture((0..count).map(|i| {
            MessageEntry::new(
                EntryId(i as u64),
                &format!("entry {i}"),
                MessageStyle::Normal,
                Rect::default(),
            )
        }));
        recorder.transcript().clone()
    }

    fn viewer() -> BacklogViewer {
        BacklogViewer::new(
            &BacklogConfig::default(),
            Size::new(100.0, 30.0),
            Arc::new(CellMeasure),
        )
    }

    fn first_and_last(viewer: &BacklogViewer) -> (Rect, Rect) {
        let rects: Vec<Rect> = viewer.entries().map(|(rect, _)| rect).collect();
        (rects[0], rects[rects.len() - 1])
    }

    #[test]
    fn test_open_scrolls_to_newest_entry() {
        let mut viewer = viewer();
        assert!(viewer.open(&transcript(50)));

        // 50 one-line entries with one line of spacing: 99 rows of content.
        let (_, last) = first_and_last(&viewer);
        assert_eq!(last.bottom(), 30.0 - 3.0);

        let thumb = viewer.thumb().unwrap();
        assert!(thumb.height < viewer.chrome().track.height);
        assert!((thumb.y + thumb.height - 27.0).abs() < EPS);
    }

    #[test]
    fn test_open_and_close_are_idempotent() {
        let mut viewer = viewer();
        assert!(!viewer.close());
        assert!(viewer.open(&transcript(3)));
        let offset = viewer.offset();
        assert!(!viewer.open(&transcript(80)));
        assert_eq!(viewer.entries().count(), 3);
        assert_eq!(viewer.offset(), offset);
        assert!(viewer.close());
        assert!(!viewer.close());
        assert_eq!(viewer.entries().count(), 0);
    }

    #[test]
    fn test_short_content_starts_at_top_margin() {
        let mut viewer = viewer();
        viewer.open(&transcript(3));
        let (first, _) = first_and_last(&viewer);
        assert_eq!(first.y, 3.0);
        assert_eq!(viewer.offset(), 0.0);
        let thumb = viewer.thumb().unwrap();
        assert_eq!(thumb.height, viewer.chrome().track.height);
    }

    #[test]
    fn test_empty_transcript_full_thumb_and_noop_scroll() {
        let mut viewer = viewer();
        viewer.open(&Transcript::default());
        assert_eq!(viewer.entries().count(), 0);
        let thumb = viewer.thumb().unwrap();
        assert_eq!(thumb.height, 24.0);

        viewer.wheel(-1.0);
        viewer.wheel(1.0);
        assert_eq!(viewer.offset(), 0.0);
        assert_eq!(viewer.thumb(), Some(thumb));
    }

    #[test]
    fn test_wheel_moves_by_step_and_clamps() {
        let mut viewer = viewer();
        viewer.open(&transcript(50));
        let max = viewer.offset();

        viewer.wheel(-1.0);
        assert_eq!(viewer.offset(), max - 3.0);
        viewer.wheel(1.0);
        viewer.wheel(1.0);
        assert_eq!(viewer.offset(), max);

        for _ in 0..100 {
            viewer.wheel(-1.0);
        }
        assert_eq!(viewer.offset(), 0.0);
        let (first, _) = first_and_last(&viewer);
        assert_eq!(first.y, 3.0);
    }

    #[test]
    fn test_drag_thumb_to_top_shows_first_entry_at_margin() {
        let mut viewer = viewer();
        viewer.open(&transcript(50));
        let thumb = viewer.thumb().unwrap();
        let x = viewer.chrome().track.x;

        assert_eq!(viewer.press(x, thumb.y + 0.5), ViewerHit::Thumb);
        assert_eq!(viewer.cursor(), CursorHint::Grabbing);
        viewer.drag_to(-40.0);
        viewer.release();
        assert_eq!(viewer.cursor(), CursorHint::Grab);

        let (first, _) = first_and_last(&viewer);
        assert_eq!(first.y, viewer.layout().margin_top);
        assert_eq!(viewer.thumb().unwrap().y, viewer.layout().margin_top);
    }

    #[test]
    fn test_drag_uses_content_to_track_ratio() {
        let mut viewer = viewer();
        viewer.open(&transcript(50));
        let max = viewer.offset();
        let thumb = viewer.thumb().unwrap();
        let x = viewer.chrome().track.x;

        viewer.press(x, thumb.y);
        viewer.drag_to(thumb.y - 2.0);
        // 75 rows of content travel over the track left beside the thumb.
        let expected = max - 2.0 * 75.0 / (24.0 - thumb.height);
        assert!((viewer.offset() - expected).abs() < EPS);
    }

    #[test]
    fn test_drag_without_grab_is_noop() {
        let mut viewer = viewer();
        viewer.open(&transcript(50));
        let before = viewer.offset();
        assert_eq!(viewer.press(10.0, 10.0), ViewerHit::Nothing);
        viewer.drag_to(0.0);
        assert_eq!(viewer.offset(), before);
    }

    #[test]
    fn test_close_control_hit() {
        let mut viewer = viewer();
        viewer.open(&transcript(2));
        let close = viewer.chrome().close;
        assert_eq!(viewer.press(close.x + 1.0, close.y + 1.0), ViewerHit::Close);
    }

    #[test]
    fn test_random_scrolls_keep_clamp_and_proportion() {
        let mut viewer = viewer();
        viewer.open(&transcript(37));
        let top = viewer.layout().margin_top;
        let bottom = 30.0 - viewer.layout().margin_bottom;
        let track = viewer.chrome().track;

        let mut seed: u32 = 0x2545_f491;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            match seed % 3 {
                0 => viewer.wheel(-1.0),
                1 => viewer.wheel(1.0),
                _ => {
                    let thumb = viewer.thumb().unwrap();
                    viewer.press(track.x, thumb.y);
                    let dy = ((seed >> 8) % 41) as f32 - 20.0;
                    viewer.drag_to(thumb.y + dy);
                    viewer.release();
                }
            }

            let (first, last) = first_and_last(&viewer);
            assert!(first.y <= top + EPS);
            assert!(last.bottom() >= bottom - EPS);

            let window = viewer.window().unwrap();
            let thumb = viewer.thumb().unwrap();
            let expected = window.viewport_height / window.content_height;
            assert!((thumb.height / track.height - expected).abs() < EPS);
            assert!(thumb.y >= track.y - EPS);
            assert!(thumb.y + thumb.height <= track.bottom() + EPS);
        }
    }

    #[test]
    fn test_long_transcript_thumb_is_one_line_and_grabbable() {
        let mut viewer = viewer();
        viewer.open(&transcript(1000));
        for _ in 0..7 {
            viewer.wheel(-1.0);
        }
        let thumb = viewer.thumb().unwrap();
        assert_eq!(thumb.height, 1.0);

        // The row a cell renderer draws: the one containing the thumb's top.
        let row = thumb.y.floor();
        let x = viewer.chrome().track.x;
        assert_eq!(viewer.press(x, row), ViewerHit::Thumb);
        assert!(viewer.is_dragging());

        let before = viewer.offset();
        viewer.drag_to(row - 5.0);
        assert!(viewer.offset() < before);
    }

    #[test]
    fn test_thumb_drag_end_to_end_reaches_both_limits() {
        let mut viewer = viewer();
        viewer.open(&transcript(1000));
        let thumb = viewer.thumb().unwrap();
        let track = viewer.chrome().track;
        let x = track.x;

        viewer.press(x, thumb.y);
        viewer.drag_to(thumb.y - track.height);
        assert_eq!(viewer.offset(), 0.0);
        assert_eq!(viewer.thumb().unwrap().y, track.y);
        viewer.drag_to(thumb.y);
        assert!((viewer.thumb().unwrap().y - thumb.y).abs() < EPS);
    }

    #[test]
    fn test_resize_relayouts_and_clamps() {
        let mut viewer = viewer();
        viewer.open(&transcript(50));
        viewer.resize(Size::new(100.0, 60.0));
        let (_, last) = first_and_last(&viewer);
        assert_eq!(last.bottom(), 57.0);
    }
}
