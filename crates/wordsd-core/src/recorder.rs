//! Transcript recording of entries leaving the dialog board.

use tracing::{debug, info};

use crate::entry::{MessageEntry, MessageStyle};

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub text: String,
    pub style: MessageStyle,
}

/// Append-only history of retired messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }
}

/// Captures retired entries into the transcript while armed.
///
/// Capture takes entries by value, so an entry that has been captured no
/// longer exists anywhere else and cannot be captured again.
#[derive(Debug, Default)]
pub struct BacklogRecorder {
    armed: bool,
    transcript: Transcript,
}

impl BacklogRecorder {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_armed(&mut self, armed: bool) {
        if self.armed != armed {
            debug!(armed, "backlog recorder");
        }
        self.armed = armed;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Records `entries` in order if armed. Returns how many were recorded.
    ///
    /// Entries must already be finalized; the caller completes any reveal and
    /// strips the idle cue first.
    pub fn capture(&mut self, entries: impl IntoIterator<Item = MessageEntry>) -> usize {
        if !self.armed {
            return 0;
        }
        let mut count = 0;
        for entry in entries {
            debug_assert!(entry.is_finalized(), "captured {} mid-reveal", entry.id);
            self.transcript.push(TranscriptEntry {
                text: entry.text.into_string(),
                style: entry.style,
            });
            count += 1;
        }
        count
    }

    /// Drops the whole transcript, for a new narrative session.
    pub fn reset(&mut self) {
        info!(dropped = self.transcript.len(), "transcript reset");
        self.transcript = Transcript::default();
    }
}
