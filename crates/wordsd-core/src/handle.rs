//! Narrative-facing API.
//!
//! A script holds a [`DialogHandle`] and awaits its calls in sequence; each
//! call is a command to the engine plus a reply it suspends on. This is what
//! turns `show -> wait -> show` into plain sequential async code.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::config::PlaybackConfig;
use crate::entry::{EntryId, MessageStyle};
use crate::events::ScriptCommand;
use crate::wait_gate::{AckResolution, wait_for_predicate};

/// The engine stopped while a script call was outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineClosed;

impl std::fmt::Display for EngineClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dialog engine closed")
    }
}

impl std::error::Error for EngineClosed {}

/// Creates a script handle and the command stream the engine consumes.
pub fn channel(playback: &PlaybackConfig) -> (DialogHandle, mpsc::UnboundedReceiver<ScriptCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        DialogHandle {
            tx,
            poll_interval: playback.predicate_poll_interval(),
        },
        rx,
    )
}

#[derive(Debug, Clone)]
pub struct DialogHandle {
    tx: mpsc::UnboundedSender<ScriptCommand>,
    poll_interval: Duration,
}

impl DialogHandle {
    fn send(&self, cmd: ScriptCommand) -> Result<(), EngineClosed> {
        self.tx.send(cmd).map_err(|_closed| EngineClosed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ScriptCommand,
    ) -> Result<T, EngineClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(build(reply))?;
        rx.await.map_err(|_dropped| EngineClosed)
    }

    /// Shows `text` in the normal style.
    pub async fn show(&self, text: impl Into<String>) -> Result<EntryId, EngineClosed> {
        self.show_with(text, MessageStyle::Normal).await
    }

    pub async fn show_with(
        &self,
        text: impl Into<String>,
        style: MessageStyle,
    ) -> Result<EntryId, EngineClosed> {
        let text = text.into();
        self.request(|reply| ScriptCommand::Show { text, style, reply })
            .await
    }

    /// Shows a clickable entry; `on_activate` runs on every press.
    pub async fn show_clickable(
        &self,
        text: impl Into<String>,
        on_activate: impl FnMut() + Send + 'static,
    ) -> Result<EntryId, EngineClosed> {
        let text = text.into();
        let on_activate = Box::new(on_activate);
        self.request(|reply| ScriptCommand::ShowClickable {
            text,
            on_activate,
            reply,
        })
        .await
    }

    /// Types `text` out character by character. Resolves once it is complete,
    /// either by running out or by a click.
    pub async fn reveal(
        &self,
        text: impl Into<String>,
        style: MessageStyle,
    ) -> Result<EntryId, EngineClosed> {
        let text = text.into();
        self.request(|reply| ScriptCommand::Reveal { text, style, reply })
            .await
    }

    /// Clears the board. Returns how many entries were removed.
    pub async fn clear(&self) -> Result<usize, EngineClosed> {
        self.request(|reply| ScriptCommand::Clear { reply }).await
    }

    /// Waits for a click, or returns at once while fast-forward is held.
    pub async fn wait_for_ack(&self) -> Result<AckResolution, EngineClosed> {
        self.request(|reply| ScriptCommand::WaitForAck { reply })
            .await
    }

    /// Reveals `text`, then waits for acknowledgement.
    pub async fn say(
        &self,
        text: impl Into<String>,
        style: MessageStyle,
    ) -> Result<AckResolution, EngineClosed> {
        self.reveal(text, style).await?;
        self.wait_for_ack().await
    }

    /// Polls `predicate` until it holds. Fast-forward does not skip this.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut() -> bool,
    ) -> Result<(), EngineClosed> {
        self.send(ScriptCommand::PredicateWaitStarted)?;
        let mut met = false;
        wait_for_predicate(
            || {
                met = predicate();
                met || self.tx.is_closed()
            },
            self.poll_interval,
        )
        .await;
        if met { Ok(()) } else { Err(EngineClosed) }
    }

    pub fn set_recording(&self, armed: bool) -> Result<(), EngineClosed> {
        self.send(ScriptCommand::SetRecording { armed })
    }

    pub fn reset_transcript(&self) -> Result<(), EngineClosed> {
        self.send(ScriptCommand::ResetTranscript)
    }
}
