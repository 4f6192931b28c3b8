//! Character-by-character text reveal.

use std::time::{Duration, Instant};

use crate::entry::{EntryId, RevealBuffer};

/// Reveals one string into a target entry's buffer on a schedule.
///
/// The first character is due immediately; each following character is due
/// one delay after the previous one. The delay is read at every step, so a
/// mode change mid-reveal takes effect on the next character.
#[derive(Debug)]
pub struct Typewriter {
    target: EntryId,
    chars: Vec<char>,
    full: String,
    revealed: usize,
    next_due: Instant,
}

impl Typewriter {
    pub fn start(target: EntryId, text: &str, now: Instant) -> Self {
        Self {
            target,
            chars: text.chars().collect(),
            full: text.to_string(),
            revealed: 0,
            next_due: now,
        }
    }

    pub fn target(&self) -> EntryId {
        self.target
    }

    pub fn full_text(&self) -> &str {
        &self.full
    }

    pub fn is_done(&self) -> bool {
        self.revealed >= self.chars.len()
    }

    /// Instant the next character becomes due, if any remain.
    pub fn next_due(&self) -> Option<Instant> {
        (!self.is_done()).then_some(self.next_due)
    }

    /// Appends every character due at `now`. Returns true when finished.
    pub fn advance(&mut self, now: Instant, delay: Duration, buf: &mut impl RevealBuffer) -> bool {
        while !self.is_done() && self.next_due <= now {
            buf.append(self.chars[self.revealed]);
            self.revealed += 1;
            self.next_due += delay;
        }
        self.is_done()
    }

    /// Writes the whole text at once.
    pub fn complete(&mut self, buf: &mut impl RevealBuffer) {
        buf.set_all(&self.full);
        self.revealed = self.chars.len();
    }
}
