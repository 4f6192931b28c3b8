//! Text measurement for layout.
//!
//! The board and the backlog only need to know how tall a block of text is
//! once it is wrapped to a width. Renderers plug in their own metric through
//! [`TextMeasure`]; [`CellMeasure`] is the terminal one, where one unit is one
//! character cell and every wrapped line is one unit tall.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::geometry::Size;

/// Text metric used for layout.
pub trait TextMeasure {
    /// Wraps `text` into lines no wider than `width`.
    fn wrap(&self, text: &str, width: f32) -> Vec<String>;

    /// Display width of a single line.
    fn text_width(&self, line: &str) -> f32;

    /// Height of one wrapped line.
    fn line_height(&self) -> f32;

    /// Size of `text` wrapped to `width`. Empty text still occupies one line.
    fn measure(&self, text: &str, width: f32) -> Size {
        let lines = self.wrap(text, width);
        let widest = lines
            .iter()
            .map(|line| self.text_width(line))
            .fold(0.0_f32, f32::max);
        let count = lines.len().max(1);
        Size::new(widest, count as f32 * self.line_height())
    }
}

/// Character-cell metric backed by unicode display widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMeasure;

impl TextMeasure for CellMeasure {
    fn wrap(&self, text: &str, width: f32) -> Vec<String> {
        let width = width.max(0.0).floor() as usize;
        // Explicit newlines always break; blank paragraphs keep their line.
        text.split('\n')
            .flat_map(|paragraph| {
                if paragraph.trim().is_empty() {
                    vec![String::new()]
                } else {
                    wrap_text(paragraph, width)
                }
            })
            .collect()
    }

    fn text_width(&self, line: &str) -> f32 {
        line.width() as f32
    }

    fn line_height(&self) -> f32 {
        1.0
    }
}

/// Wraps text to fit within the given display width.
///
/// Breaks on whitespace and falls back to character breaks for words wider
/// than a line. Does not handle hyphenation.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width: usize = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if !current_line.is_empty() && current_width + 1 + word_width <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }

        if word_width > width {
            let mut broken = wrap_chars(word, width);
            if let Some(last) = broken.pop() {
                lines.extend(broken);
                current_width = last.width();
                current_line = last;
            }
        } else {
            current_line = word.to_string();
            current_width = word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Breaks a string at character boundaries so each part fits `width`.
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_width: usize = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);

        if ch_width == 0 {
            current.push(ch);
            continue;
        }

        if current_width + ch_width > width && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            current_width = 0;
        }

        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() {
        parts.push(current);
    }

    if parts.is_empty() {
        parts.push(String::new());
    }

    parts
}
