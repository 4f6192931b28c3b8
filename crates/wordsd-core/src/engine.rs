//! The dialog engine.
//!
//! Owns every piece of mutable state and is driven from one place: script
//! commands, input events, and clock ticks all arrive through `&mut self`, so
//! there is no locking and event order is exactly arrival order.
//!
//! Only one blocking script operation (a reveal or an acknowledgement wait)
//! is active at a time. Commands that arrive meanwhile are queued and applied
//! in order once it resolves.

use std::collections::VecDeque;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::board::{DialogBoard, SharedMeasure};
use crate::config::Config;
use crate::entry::{EntryId, MessageEntry};
use crate::events::{EngineNotice, InputEvent, ScriptCommand};
use crate::geometry::Size;
use crate::playback::PlaybackContext;
use crate::recorder::BacklogRecorder;
use crate::typewriter::Typewriter;
use crate::viewer::{BacklogViewer, ViewerHit};
use crate::wait_gate::{AckGate, AckResolution};

struct ActiveReveal {
    typewriter: Typewriter,
    reply: oneshot::Sender<EntryId>,
}

struct PendingAck {
    gate: AckGate,
    reply: oneshot::Sender<AckResolution>,
}

pub struct Engine {
    config: Config,
    playback: PlaybackContext,
    board: DialogBoard,
    recorder: BacklogRecorder,
    viewer: BacklogViewer,
    reveal: Option<ActiveReveal>,
    ack: Option<PendingAck>,
    queued: VecDeque<ScriptCommand>,
    armed_before_open: bool,
    /// Entries retired while the viewer is open, captured when it closes.
    held_back: Vec<MessageEntry>,
    notices: Option<mpsc::UnboundedSender<EngineNotice>>,
}

impl Engine {
    pub fn new(config: &Config, measure: SharedMeasure) -> Self {
        let viewport = Size::new(config.viewport.width, config.viewport.height);
        Self {
            config: config.clone(),
            playback: PlaybackContext::new(&config.playback),
            board: DialogBoard::new(
                config.dialog.layout(),
                viewport,
                SharedMeasure::clone(&measure),
            ),
            recorder: BacklogRecorder::default(),
            viewer: BacklogViewer::new(&config.backlog, viewport, measure),
            reveal: None,
            ack: None,
            queued: VecDeque::new(),
            armed_before_open: false,
            held_back: Vec::new(),
            notices: None,
        }
    }

    /// Sends outbound notices to `tx`.
    #[must_use]
    pub fn with_notices(mut self, tx: mpsc::UnboundedSender<EngineNotice>) -> Self {
        self.notices = Some(tx);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn board(&self) -> &DialogBoard {
        &self.board
    }

    pub fn viewer(&self) -> &BacklogViewer {
        &self.viewer
    }

    pub fn recorder(&self) -> &BacklogRecorder {
        &self.recorder
    }

    pub fn playback(&self) -> &PlaybackContext {
        &self.playback
    }

    /// Entry currently being revealed.
    pub fn revealing(&self) -> Option<EntryId> {
        self.reveal.as_ref().map(|r| r.typewriter.target())
    }

    pub fn ack_gate(&self) -> Option<&AckGate> {
        self.ack.as_ref().map(|a| &a.gate)
    }

    pub fn is_waiting_for_ack(&self) -> bool {
        self.ack.is_some()
    }

    /// True while something on screen changes without input.
    pub fn is_animating(&self) -> bool {
        self.reveal.is_some() || self.ack_gate().and_then(AckGate::cue).is_some()
    }

    fn is_blocked(&self) -> bool {
        self.reveal.is_some() || self.ack.is_some()
    }

    fn notify(&self, notice: EngineNotice) {
        if let Some(tx) = &self.notices {
            let _ = tx.send(notice);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Size::new(width, height);
        debug!(width, height, "resize");
        let removed = self.board.resize(viewport);
        self.retire(removed);
        self.viewer.resize(viewport);
    }

    // ========================================================================
    // Script commands
    // ========================================================================

    pub fn handle_command(&mut self, cmd: ScriptCommand, now: Instant) {
        if self.is_blocked() {
            self.queued.push_back(cmd);
            return;
        }
        self.apply(cmd, now);
    }

    fn apply(&mut self, cmd: ScriptCommand, now: Instant) {
        match cmd {
            ScriptCommand::Show { text, style, reply } => {
                let placement = self.board.show(&text, style);
                self.retire(placement.removed);
                self.announce(placement.id);
                let _ = reply.send(placement.id);
            }
            ScriptCommand::ShowClickable {
                text,
                on_activate,
                reply,
            } => {
                let placement = self.board.show_clickable(&text, on_activate);
                self.retire(placement.removed);
                self.announce(placement.id);
                let _ = reply.send(placement.id);
            }
            ScriptCommand::Reveal { text, style, reply } => {
                let placement = self.board.show_for_reveal(&text, style);
                self.retire(placement.removed);
                self.announce(placement.id);
                self.reveal = Some(ActiveReveal {
                    typewriter: Typewriter::start(placement.id, &text, now),
                    reply,
                });
                self.advance_reveal(now);
            }
            ScriptCommand::Clear { reply } => {
                let removed = self.board.clear();
                let count = removed.len();
                self.retire(removed);
                debug!(count, "board cleared");
                self.notify(EngineNotice::BoardCleared { removed: count });
                let _ = reply.send(count);
            }
            ScriptCommand::WaitForAck { reply } => {
                let target = self.board.last().map(|e| e.id);
                let gate = AckGate::begin(
                    target,
                    self.playback.is_fast_forward(),
                    now,
                    self.config.playback.idle_cue_interval(),
                );
                self.notify(EngineNotice::AckRequested);
                if let Some(via) = gate.resolution() {
                    self.notify(EngineNotice::AckResolved { via });
                    let _ = reply.send(via);
                } else {
                    self.ack = Some(PendingAck { gate, reply });
                    self.sync_cue();
                }
            }
            ScriptCommand::SetRecording { armed } => {
                if self.viewer.is_open() {
                    // Applied when the viewer closes.
                    self.armed_before_open = armed;
                } else {
                    self.recorder.set_armed(armed);
                }
            }
            ScriptCommand::ResetTranscript => {
                self.held_back.clear();
                self.recorder.reset();
            }
            ScriptCommand::PredicateWaitStarted => {
                self.notify(EngineNotice::PredicateWaitStarted);
            }
        }
    }

    fn announce(&self, id: EntryId) {
        if let Some(entry) = self.board.get(id) {
            self.notify(EngineNotice::EntryShown {
                id,
                style: entry.style,
                bounds: entry.bounds,
            });
        }
    }

    /// Finalizes entries leaving the board and hands them to the recorder.
    fn retire(&mut self, mut removed: Vec<MessageEntry>) {
        if removed.is_empty() {
            return;
        }
        for entry in &mut removed {
            if let Some(reveal) = &mut self.reveal
                && reveal.typewriter.target() == entry.id
            {
                reveal.typewriter.complete(&mut entry.text);
            }
            entry.revealing = false;
            entry.cue = None;
            if let Some(ack) = &mut self.ack {
                ack.gate.detach_cue(entry.id);
            }
        }
        if self.viewer.is_open() {
            self.held_back.extend(removed);
            return;
        }
        self.capture(removed);
    }

    fn capture(&mut self, entries: Vec<MessageEntry>) {
        let count = self.recorder.capture(entries);
        if count > 0 {
            debug!(count, "captured into transcript");
            self.notify(EngineNotice::Captured { count });
        }
    }

    fn drain_queued(&mut self, now: Instant) {
        while !self.is_blocked() {
            let Some(cmd) = self.queued.pop_front() else {
                break;
            };
            self.apply(cmd, now);
        }
    }

    // ========================================================================
    // Reveal and acknowledgement
    // ========================================================================

    fn advance_reveal(&mut self, now: Instant) {
        let delay = self.playback.reveal_delay();
        let Some(reveal) = &mut self.reveal else {
            return;
        };
        let done = match self.board.get_mut(reveal.typewriter.target()) {
            Some(entry) => reveal.typewriter.advance(now, delay, &mut entry.text),
            None => true,
        };
        if done {
            self.finish_reveal(now);
        }
    }

    fn complete_reveal(&mut self, now: Instant) {
        let Some(reveal) = &mut self.reveal else {
            return;
        };
        if let Some(entry) = self.board.get_mut(reveal.typewriter.target()) {
            reveal.typewriter.complete(&mut entry.text);
        }
        self.finish_reveal(now);
    }

    fn finish_reveal(&mut self, now: Instant) {
        let Some(reveal) = self.reveal.take() else {
            return;
        };
        let id = reveal.typewriter.target();
        if let Some(entry) = self.board.get_mut(id) {
            entry.revealing = false;
            let text = entry.text().to_string();
            self.notify(EngineNotice::TextRevealed { id, text });
        }
        let _ = reveal.reply.send(id);
        self.drain_queued(now);
    }

    fn resolve_ack(&mut self, via: AckResolution, now: Instant) {
        let Some(mut pending) = self.ack.take() else {
            return;
        };
        let Some(cue_entry) = pending.gate.resolve(via) else {
            return;
        };
        if let Some(entry) = cue_entry.and_then(|id| self.board.get_mut(id)) {
            entry.cue = None;
        }
        debug!(?via, "ack resolved");
        self.notify(EngineNotice::AckResolved { via });
        let _ = pending.reply.send(via);
        self.drain_queued(now);
    }

    /// Mirrors the gate's current cue frame onto its entry.
    fn sync_cue(&mut self) {
        let Some(cue) = self.ack.as_ref().and_then(|a| a.gate.cue()) else {
            return;
        };
        if let Some(entry) = self.board.get_mut(cue.entry) {
            entry.cue = Some(cue.frame());
        }
    }

    /// Advances timers: reveal characters and idle cue frames.
    pub fn tick(&mut self, now: Instant) {
        self.advance_reveal(now);
        if let Some(ack) = &mut self.ack
            && ack.gate.tick(now)
        {
            self.sync_cue();
        }
        self.drain_queued(now);
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        if self.viewer.is_open() {
            self.handle_backlog_input(event);
        } else {
            self.handle_dialog_input(event, now);
        }
    }

    fn handle_backlog_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                if self.viewer.press(x, y) == ViewerHit::Close {
                    self.close_backlog();
                }
            }
            InputEvent::PointerMove { y, .. } => self.viewer.drag_to(y),
            InputEvent::PointerUp { .. } => self.viewer.release(),
            InputEvent::Wheel { delta_y } => self.viewer.wheel(delta_y),
            InputEvent::ContextClick { .. } => self.close_backlog(),
            // Dialog input is disabled; the context ignores presses.
            InputEvent::ModifierDown => {
                self.playback.modifier_down();
            }
            InputEvent::ModifierToggle => {
                self.playback.toggle();
            }
            InputEvent::ModifierUp => {
                self.playback.modifier_up();
            }
        }
    }

    fn handle_dialog_input(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.notify(EngineNotice::UserClicked { x, y });
                // One click satisfies at most one consumer.
                if let Some(id) = self.board.hit_clickable(x, y) {
                    if self.board.activate(id) {
                        debug!(%id, "entry activated");
                        self.notify(EngineNotice::EntryActivated { id });
                    }
                } else if self.reveal.is_some() {
                    self.complete_reveal(now);
                } else if self.ack.is_some() {
                    self.resolve_ack(AckResolution::Click, now);
                }
            }
            InputEvent::Wheel { delta_y } if delta_y < 0.0 => self.open_backlog(),
            InputEvent::ModifierDown => {
                if self.playback.modifier_down() {
                    self.on_fast_forward(now);
                }
            }
            InputEvent::ModifierToggle => {
                if self.playback.toggle() && self.playback.is_fast_forward() {
                    self.on_fast_forward(now);
                }
            }
            InputEvent::ModifierUp => {
                self.playback.modifier_up();
            }
            InputEvent::Wheel { .. }
            | InputEvent::PointerMove { .. }
            | InputEvent::PointerUp { .. }
            | InputEvent::ContextClick { .. } => {}
        }
    }

    fn on_fast_forward(&mut self, now: Instant) {
        if self.ack.is_some() {
            self.resolve_ack(AckResolution::FastForward, now);
        }
    }

    // ========================================================================
    // Backlog
    // ========================================================================

    pub fn open_backlog(&mut self) {
        if !self.viewer.open(self.recorder.transcript()) {
            return;
        }
        self.armed_before_open = self.recorder.is_armed();
        self.recorder.set_armed(false);
        self.playback.disable_dialog_input();
        info!(entries = self.recorder.transcript().len(), "backlog shown");
        self.notify(EngineNotice::BacklogOpened);
    }

    pub fn close_backlog(&mut self) {
        if !self.viewer.close() {
            return;
        }
        self.recorder.set_armed(self.armed_before_open);
        let held_back = std::mem::take(&mut self.held_back);
        self.capture(held_back);
        self.playback.enable_dialog_input();
        self.notify(EngineNotice::BacklogClosed);
    }
}
