//! Dialog board: layout and retirement of on-screen entries.

use std::sync::Arc;

use tracing::debug;

use crate::config::LayoutConfig;
use crate::entry::{ActivateFn, EntryId, EntrySeq, MessageEntry, MessageStyle};
use crate::geometry::{Rect, Size};
use crate::measure::TextMeasure;

/// Shared text metric.
pub type SharedMeasure = Arc<dyn TextMeasure + Send + Sync>;

/// Result of placing a new entry.
#[derive(Debug)]
pub struct Placement {
    pub id: EntryId,
    /// Entries removed by an overflow clear, in display order.
    pub removed: Vec<MessageEntry>,
}

/// Entries currently on screen, stacked top to bottom.
pub struct DialogBoard {
    layout: LayoutConfig,
    viewport: Size,
    measure: SharedMeasure,
    entries: Vec<MessageEntry>,
    seq: EntrySeq,
}

impl DialogBoard {
    pub fn new(layout: LayoutConfig, viewport: Size, measure: SharedMeasure) -> Self {
        Self {
            layout,
            viewport,
            measure,
            entries: Vec::new(),
            seq: EntrySeq::default(),
        }
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    pub fn get(&self, id: EntryId) -> Option<&MessageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut MessageEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    pub fn measure(&self) -> &SharedMeasure {
        &self.measure
    }

    /// Width text is wrapped to.
    pub fn wrap_width(&self) -> f32 {
        self.layout.wrap_width(self.viewport.width)
    }

    /// Shows a finished entry.
    pub fn show(&mut self, text: &str, style: MessageStyle) -> Placement {
        self.place(text, text, style)
    }

    /// Shows a clickable entry bound to `on_activate`.
    pub fn show_clickable(&mut self, text: &str, on_activate: ActivateFn) -> Placement {
        let placement = self.place(text, text, MessageStyle::Clickable);
        if let Some(entry) = self.get_mut(placement.id) {
            entry.on_activate = Some(on_activate);
        }
        placement
    }

    /// Shows an empty entry sized for `full_text`, to be filled by a reveal.
    pub fn show_for_reveal(&mut self, full_text: &str, style: MessageStyle) -> Placement {
        let placement = self.place(full_text, "", style);
        if let Some(entry) = self.get_mut(placement.id) {
            entry.revealing = true;
        }
        placement
    }

    fn place(&mut self, layout_text: &str, initial_text: &str, style: MessageStyle) -> Placement {
        let size = self.measure.measure(layout_text, self.wrap_width());

        if let Some(prev) = self.entries.last_mut()
            && !prev.is_interactive()
        {
            prev.dimmed = true;
        }

        let mut removed = Vec::new();
        let y = match self.entries.last() {
            Some(prev) => {
                let candidate = prev.bounds.bottom() + self.layout.line_spacing;
                if candidate + size.height > self.viewport.height - self.layout.margin_bottom {
                    debug!(count = self.entries.len(), "board overflow, clearing");
                    removed = std::mem::take(&mut self.entries);
                    self.layout.margin_top
                } else {
                    candidate
                }
            }
            None => self.layout.margin_top,
        };

        let id = self.seq.next_id();
        let bounds = Rect::new(self.layout.margin_left, y, size.width, size.height);
        self.entries
            .push(MessageEntry::new(id, initial_text, style, bounds));
        Placement { id, removed }
    }

    /// Removes every entry, in display order.
    pub fn clear(&mut self) -> Vec<MessageEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Changes the viewport and restacks current entries from the top margin.
    ///
    /// If the stack no longer fits, every entry but the newest is removed and
    /// returned in display order, as on an overflowing `show`.
    pub fn resize(&mut self, viewport: Size) -> Vec<MessageEntry> {
        self.viewport = viewport;
        self.restack();

        let limit = self.viewport.height - self.layout.margin_bottom;
        let overflows = self.entries.len() > 1
            && self
                .entries
                .last()
                .is_some_and(|last| last.bounds.bottom() > limit);
        if !overflows {
            return Vec::new();
        }

        let newest = self.entries.split_off(self.entries.len() - 1);
        let removed = std::mem::replace(&mut self.entries, newest);
        debug!(count = removed.len(), "board overflow after resize, clearing");
        self.restack();
        removed
    }

    fn restack(&mut self) {
        let width = self.wrap_width();
        let mut y = self.layout.margin_top;
        for entry in &mut self.entries {
            let size = self.measure.measure(entry.text(), width);
            // A revealing entry keeps its reserved height.
            let height = if entry.revealing {
                entry.bounds.height
            } else {
                size.height
            };
            entry.bounds = Rect::new(self.layout.margin_left, y, size.width, height);
            y = entry.bounds.bottom() + self.layout.line_spacing;
        }
    }

    /// Topmost clickable entry containing the point.
    pub fn hit_clickable(&self, x: f32, y: f32) -> Option<EntryId> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.is_interactive() && e.on_activate.is_some() && e.bounds.contains(x, y))
            .map(|e| e.id)
    }

    /// Runs the entry's activation callback. Returns false if it has none.
    pub fn activate(&mut self, id: EntryId) -> bool {
        match self.get_mut(id).and_then(|e| e.on_activate.as_mut()) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::DialogConfig;
    use crate::measure::CellMeasure;

    fn board(height: f32) -> DialogBoard {
        DialogBoard::new(
            DialogConfig::default().layout(),
            Size::new(100.0, height),
            Arc::new(CellMeasure),
        )
    }

    #[test]
    fn test_entries_stack_with_spacing_and_previous_dims() {
        let mut board = board(30.0);
        let first = board.show("Hello", MessageStyle::Normal);
        let second = board.show("World", MessageStyle::Normal);

        assert!(first.removed.is_empty() && second.removed.is_empty());
        let entries = board.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].bounds.y, 2.0);
        assert_eq!(entries[1].bounds.y, entries[0].bounds.bottom() + 1.0);
        assert_eq!(entries[0].bounds.x, 6.0);
        assert!(entries[0].dimmed);
        assert!(!entries[1].dimmed);
    }

    #[test]
    fn test_overflow_returns_removed_entries_in_order() {
        // margin_top 2, margin_bottom 3: the third line would end past row 6.
        let mut board = board(9.0);
        board.show("one", MessageStyle::Normal);
        board.show("two", MessageStyle::Normal);
        let placement = board.show("three", MessageStyle::Normal);

        let removed: Vec<&str> = placement.removed.iter().map(MessageEntry::text).collect();
        assert_eq!(removed, vec!["one", "two"]);
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0].bounds.y, 2.0);
        assert_eq!(board.entries()[0].text(), "three");
    }

    #[test]
    fn test_clickable_previous_entry_is_not_dimmed() {
        let mut board = board(30.0);
        board.show_clickable("Choose me", Box::new(|| {}));
        board.show("next", MessageStyle::Normal);
        assert!(!board.entries()[0].dimmed);
    }

    #[test]
    fn test_empty_text_still_takes_a_line() {
        let mut board = board(30.0);
        board.show("", MessageStyle::Normal);
        board.show("after", MessageStyle::Normal);
        let entries = board.entries();
        assert_eq!(entries[0].bounds.height, 1.0);
        assert_eq!(entries[0].bounds.width, 0.0);
        assert_eq!(entries[1].bounds.y, 4.0);
    }

    #[test]
    fn test_reveal_entry_reserves_full_height() {
        let mut board = board(30.0);
        let long = "word ".repeat(40);
        let placement = board.show_for_reveal(&long, MessageStyle::Normal);
        let entry = board.get(placement.id).unwrap();
        assert_eq!(entry.text(), "");
        assert!(!entry.is_finalized());
        assert!(entry.bounds.height > 1.0);
    }

    #[test]
    fn test_wrap_width_uses_symmetric_margins() {
        let board = board(30.0);
        assert_eq!(board.wrap_width(), 88.0);
    }

    #[test]
    fn test_hit_and_activate_clickable() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let mut board = board(30.0);
        board.show("plain", MessageStyle::Normal);
        let placement = board.show_clickable(
            "pick",
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let bounds = board.get(placement.id).unwrap().bounds;
        assert_eq!(board.hit_clickable(bounds.x, bounds.y), Some(placement.id));
        assert_eq!(board.hit_clickable(6.0, 2.0), None);

        assert!(board.activate(placement.id));
        assert!(board.activate(placement.id));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resize_restacks_entries() {
        let mut board = board(30.0);
        board.show("alpha beta gamma", MessageStyle::Normal);
        board.show("delta", MessageStyle::Normal);

        let removed = board.resize(Size::new(24.0, 30.0));
        assert!(removed.is_empty());
        let entries = board.entries();
        assert_eq!(entries[0].bounds.height, 2.0);
        assert_eq!(entries[1].bounds.y, 5.0);
    }

    #[test]
    fn test_clear_returns_entries_in_display_order() {
        let mut board = board(30.0);
        board.show("a", MessageStyle::Normal);
        board.show("b", MessageStyle::Warning);
        let removed = board.clear();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[1].style, MessageStyle::Warning);
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_shrinking_past_the_stack_keeps_only_newest() {
        let mut board = board(30.0);
        board.show("one", MessageStyle::Normal);
        board.show("two", MessageStyle::Normal);
        board.show("three", MessageStyle::Warning);

        // Rows 2, 4, 6 no longer fit above the bottom margin at height 8.
        let removed = board.resize(Size::new(100.0, 8.0));
        let removed: Vec<&str> = removed.iter().map(MessageEntry::text).collect();
        assert_eq!(removed, vec!["one", "two"]);

        let entries = board.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text(), "three");
        assert_eq!(entries[0].bounds.y, 2.0);
    }

    #[test]
    fn test_single_entry_survives_any_resize() {
        let mut board = board(30.0);
        board.show("alone", MessageStyle::Normal);
        assert!(board.resize(Size::new(100.0, 3.0)).is_empty());
        assert_eq!(board.entries().len(), 1);
    }
}
