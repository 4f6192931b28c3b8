//! Messages crossing the engine boundary.
//!
//! - [`InputEvent`]: environment input from a renderer.
//! - [`ScriptCommand`]: calls from a narrative script, with reply channels.
//! - [`EngineNotice`]: outbound notifications for observers.

use std::fmt;

use tokio::sync::oneshot;

use crate::entry::{ActivateFn, EntryId, MessageStyle};
use crate::geometry::Rect;
use crate::wait_gate::AckResolution;

/// Input from the player, in renderer units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown { x: f32, y: f32 },
    /// Pointer moved, with or without a button held.
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Vertical wheel. Negative is up (toward older content).
    Wheel { delta_y: f32 },
    /// Secondary (context) click. The renderer suppresses any native menu.
    ContextClick { x: f32, y: f32 },
    /// Fast-forward modifier pressed.
    ModifierDown,
    /// Fast-forward modifier released.
    ModifierUp,
    /// Fast-forward flipped, for input devices without release events.
    ModifierToggle,
}

/// A call from the narrative script.
pub enum ScriptCommand {
    Show {
        text: String,
        style: MessageStyle,
        reply: oneshot::Sender<EntryId>,
    },
    ShowClickable {
        text: String,
        on_activate: ActivateFn,
        reply: oneshot::Sender<EntryId>,
    },
    /// Typewriter reveal; replies once the text is complete.
    Reveal {
        text: String,
        style: MessageStyle,
        reply: oneshot::Sender<EntryId>,
    },
    Clear {
        reply: oneshot::Sender<usize>,
    },
    WaitForAck {
        reply: oneshot::Sender<AckResolution>,
    },
    SetRecording {
        armed: bool,
    },
    ResetTranscript,
    /// The script began polling a predicate. Informational only.
    PredicateWaitStarted,
}

impl fmt::Debug for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show { text, style, .. } => f
                .debug_struct("Show")
                .field("text", text)
                .field("style", style)
                .finish_non_exhaustive(),
            Self::ShowClickable { text, .. } => f
                .debug_struct("ShowClickable")
                .field("text", text)
                .finish_non_exhaustive(),
            Self::Reveal { text, style, .. } => f
                .debug_struct("Reveal")
                .field("text", text)
                .field("style", style)
                .finish_non_exhaustive(),
            Self::Clear { .. } => f.write_str("Clear"),
            Self::WaitForAck { .. } => f.write_str("WaitForAck"),
            Self::SetRecording { armed } => f
                .debug_struct("SetRecording")
                .field("armed", armed)
                .finish(),
            Self::ResetTranscript => f.write_str("ResetTranscript"),
            Self::PredicateWaitStarted => f.write_str("PredicateWaitStarted"),
        }
    }
}

/// Outbound notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotice {
    EntryShown {
        id: EntryId,
        style: MessageStyle,
        bounds: Rect,
    },
    TextRevealed {
        id: EntryId,
        text: String,
    },
    AckRequested,
    AckResolved {
        via: AckResolution,
    },
    UserClicked {
        x: f32,
        y: f32,
    },
    EntryActivated {
        id: EntryId,
    },
    BoardCleared {
        removed: usize,
    },
    Captured {
        count: usize,
    },
    PredicateWaitStarted,
    BacklogOpened,
    BacklogClosed,
}
