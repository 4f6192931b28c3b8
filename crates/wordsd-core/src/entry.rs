//! Message entries shown on the dialog board.

use std::fmt;

use crate::geometry::Rect;

/// Stable identifier for a shown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry-{}", self.0)
    }
}

/// Monotonic source of entry ids.
#[derive(Debug, Default)]
pub struct EntrySeq {
    next: u64,
}

impl EntrySeq {
    pub fn next_id(&mut self) -> EntryId {
        self.next += 1;
        EntryId(self.next)
    }
}

/// Visual style of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageStyle {
    #[default]
    Normal,
    Clickable,
    Warning,
    Hint,
}

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Renderer-neutral description of how a style looks and behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub color: Rgb,
    pub bold: bool,
    /// Whether entries of this style respond to pointer presses.
    pub interactive: bool,
}

const STYLE_TABLE: [(MessageStyle, StyleDescriptor); 4] = [
    (
        MessageStyle::Normal,
        StyleDescriptor {
            color: Rgb(0xff, 0xff, 0xff),
            bold: false,
            interactive: false,
        },
    ),
    (
        MessageStyle::Clickable,
        StyleDescriptor {
            color: Rgb(0xa0, 0xa0, 0xff),
            bold: true,
            interactive: true,
        },
    ),
    (
        MessageStyle::Warning,
        StyleDescriptor {
            color: Rgb(0xff, 0x9e, 0x9e),
            bold: true,
            interactive: false,
        },
    ),
    (
        MessageStyle::Hint,
        StyleDescriptor {
            color: Rgb(0x9e, 0xff, 0xa0),
            bold: true,
            interactive: false,
        },
    ),
];

impl MessageStyle {
    pub fn descriptor(self) -> StyleDescriptor {
        STYLE_TABLE
            .iter()
            .find(|(style, _)| *style == self)
            .map_or(STYLE_TABLE[0].1, |(_, descriptor)| *descriptor)
    }

    pub fn is_interactive(self) -> bool {
        self.descriptor().interactive
    }
}

/// Append-only text buffer a reveal writes into.
///
/// Renderers with their own text objects can implement this to receive the
/// growing text directly.
pub trait RevealBuffer {
    fn append(&mut self, ch: char);
    fn set_all(&mut self, text: &str);
    fn current_text(&self) -> &str;
}

/// Plain string implementation of [`RevealBuffer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryText(String);

impl EntryText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl RevealBuffer for EntryText {
    fn append(&mut self, ch: char) {
        self.0.push(ch);
    }

    fn set_all(&mut self, text: &str) {
        self.0.clear();
        self.0.push_str(text);
    }

    fn current_text(&self) -> &str {
        &self.0
    }
}

/// Callback run when a clickable entry is pressed.
pub type ActivateFn = Box<dyn FnMut() + Send>;

/// Opacity of an entry that has receded behind newer messages.
pub const DIMMED_OPACITY: f32 = 0.5;

/// One message on the board.
pub struct MessageEntry {
    pub id: EntryId,
    pub text: EntryText,
    pub style: MessageStyle,
    pub bounds: Rect,
    pub dimmed: bool,
    pub(crate) revealing: bool,
    pub(crate) cue: Option<&'static str>,
    pub(crate) on_activate: Option<ActivateFn>,
}

impl MessageEntry {
    pub(crate) fn new(id: EntryId, text: &str, style: MessageStyle, bounds: Rect) -> Self {
        Self {
            id,
            text: EntryText::new(text),
            style,
            bounds,
            dimmed: false,
            revealing: false,
            cue: None,
            on_activate: None,
        }
    }

    /// Text as currently displayed, including any idle cue suffix.
    pub fn visible_text(&self) -> String {
        match self.cue {
            Some(cue) => format!("{}{cue}", self.text.current_text()),
            None => self.text.current_text().to_string(),
        }
    }

    /// Text without presentation-only decorations.
    pub fn text(&self) -> &str {
        self.text.current_text()
    }

    pub fn cue(&self) -> Option<&'static str> {
        self.cue
    }

    /// True once the entry's text is complete.
    pub fn is_finalized(&self) -> bool {
        !self.revealing
    }

    pub fn opacity(&self) -> f32 {
        if self.dimmed { DIMMED_OPACITY } else { 1.0 }
    }

    pub fn is_interactive(&self) -> bool {
        self.style.is_interactive()
    }
}

impl fmt::Debug for MessageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEntry")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("style", &self.style)
            .field("bounds", &self.bounds)
            .field("dimmed", &self.dimmed)
            .field("revealing", &self.revealing)
            .field("cue", &self.cue)
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}
