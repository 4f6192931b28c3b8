//! Blocking primitives: wait-for-acknowledgement and wait-for-predicate.

use std::time::{Duration, Instant};

use crate::entry::EntryId;

/// Frames of the idle cue appended to the waiting entry, in cycle order.
pub const IDLE_CUE_FRAMES: [&str; 4] = [" ", " .", " ..", " ..."];

/// How an acknowledgement gate was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResolution {
    Click,
    FastForward,
}

/// Idle cue cycling on one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleCue {
    pub entry: EntryId,
    frame: usize,
    next_frame: Instant,
}

impl IdleCue {
    pub fn frame(&self) -> &'static str {
        IDLE_CUE_FRAMES[self.frame]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPhase {
    /// Waiting for a click with nothing on screen to decorate.
    Idle,
    CueActive(IdleCue),
    Resolved(AckResolution),
}

/// One `wait_for_ack` call.
///
/// `Idle -> CueActive -> Resolved`, or straight to `Resolved` when
/// fast-forward is held at the start. Resolution happens once; later
/// triggers are ignored.
#[derive(Debug)]
pub struct AckGate {
    phase: AckPhase,
    interval: Duration,
}

impl AckGate {
    /// Starts a gate. `target` is the newest on-screen entry, if any.
    pub fn begin(
        target: Option<EntryId>,
        fast_forward: bool,
        now: Instant,
        interval: Duration,
    ) -> Self {
        let phase = if fast_forward {
            AckPhase::Resolved(AckResolution::FastForward)
        } else {
            match target {
                Some(entry) => AckPhase::CueActive(IdleCue {
                    entry,
                    frame: 0,
                    next_frame: now + interval,
                }),
                None => AckPhase::Idle,
            }
        };
        Self { phase, interval }
    }

    pub fn phase(&self) -> AckPhase {
        self.phase
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, AckPhase::Resolved(_))
    }

    pub fn resolution(&self) -> Option<AckResolution> {
        match self.phase {
            AckPhase::Resolved(via) => Some(via),
            _ => None,
        }
    }

    pub fn cue(&self) -> Option<IdleCue> {
        match self.phase {
            AckPhase::CueActive(cue) => Some(cue),
            _ => None,
        }
    }

    /// Advances the cue animation. Returns true if the frame changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let AckPhase::CueActive(cue) = &mut self.phase else {
            return false;
        };
        let mut changed = false;
        while cue.next_frame <= now {
            cue.frame = (cue.frame + 1) % IDLE_CUE_FRAMES.len();
            cue.next_frame += self.interval;
            changed = true;
        }
        changed
    }

    /// Resolves the gate.
    ///
    /// Returns `None` if it was already resolved. Otherwise returns the entry
    /// whose cue must be removed, if one was active.
    pub fn resolve(&mut self, via: AckResolution) -> Option<Option<EntryId>> {
        match self.phase {
            AckPhase::Resolved(_) => None,
            AckPhase::Idle => {
                self.phase = AckPhase::Resolved(via);
                Some(None)
            }
            AckPhase::CueActive(cue) => {
                self.phase = AckPhase::Resolved(via);
                Some(Some(cue.entry))
            }
        }
    }

    /// Drops the cue when its entry leaves the board. The gate keeps waiting.
    pub fn detach_cue(&mut self, entry: EntryId) {
        if matches!(self.phase, AckPhase::CueActive(cue) if cue.entry == entry) {
            self.phase = AckPhase::Idle;
        }
    }
}

/// Polls `predicate` every `interval` until it returns true.
///
/// Never short-circuited by fast-forward.
pub async fn wait_for_predicate<F>(mut predicate: F, interval: Duration)
where
    F: FnMut() -> bool,
{
    while !predicate() {
        tokio::time::sleep(interval).await;
    }
}
