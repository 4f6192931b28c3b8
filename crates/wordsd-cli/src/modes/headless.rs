//! Headless mode: the story runs against an engine with no screen while an
//! autoplayer stands in for the player. Revealed text streams to stdout.

use std::future::Future;
use std::io::{Write, stderr, stdout};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tokio::sync::mpsc;
use tracing::{debug, info};
use wordsd_core::driver::HeadlessDriver;
use wordsd_core::geometry::Rect;
use wordsd_core::measure::CellMeasure;
use wordsd_core::recorder::Transcript;
use wordsd_core::{Config, DialogHandle, Engine, EngineNotice, InputEvent, MessageStyle};

/// Options for `wordsd run`.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// 1-based option to press whenever the story offers a choice.
    pub choice: usize,
    /// Click every acknowledgement instead of holding fast-forward.
    pub normal_speed: bool,
    /// Print the recorded back log at the end.
    pub transcript: bool,
}

/// Plays `story` to the end without a terminal UI.
///
/// # Errors
/// Returns an error if the story fails, offers fewer options than
/// `options.choice`, or stdout cannot be written.
pub async fn run<F, Fut>(config: &Config, options: RunOptions, story: F) -> Result<()>
where
    F: FnOnce(DialogHandle) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let (handle, commands) = wordsd_core::handle::channel(&config.playback);
    let (notice_tx, mut notices) = mpsc::unbounded_channel();
    let engine = Engine::new(config, Arc::new(CellMeasure)).with_notices(notice_tx);
    let (driver, input) = HeadlessDriver::new(engine, commands);

    let mut driver = tokio::spawn(driver.run());
    let script = tokio::spawn(story(handle));

    let mut player = Autoplayer::new(options, input);
    let played = async {
        player.start()?;
        let engine = loop {
            tokio::select! {
                biased;

                Some(notice) = notices.recv() => player.observe(notice)?,
                joined = &mut driver => break joined.context("headless driver failed")?,
            }
        };
        // Notices sent just before the driver stopped.
        while let Ok(notice) = notices.try_recv() {
            player.observe(notice)?;
        }
        Ok::<_, anyhow::Error>(engine)
    }
    .await;

    let engine = match played {
        Ok(engine) => engine,
        Err(e) => {
            script.abort();
            return Err(e);
        }
    };
    script.await.context("story task failed")??;

    let transcript = engine.recorder().transcript();
    info!(entries = transcript.len(), "headless run finished");
    if options.transcript {
        print_transcript(transcript)?;
    }
    writeln!(stderr(), "Back log: {} entries", transcript.len())?;
    Ok(())
}

fn print_transcript(transcript: &Transcript) -> Result<()> {
    let mut out = stdout().lock();
    writeln!(out)?;
    writeln!(out, "--- {} ---", wordsd_core::viewer::TITLE)?;
    for entry in transcript.entries() {
        writeln!(out, "{}", entry.text)?;
    }
    out.flush()?;
    Ok(())
}

/// Plays by policy: holds fast-forward (or clicks each acknowledgement) and
/// presses the configured option at every choice.
struct Autoplayer {
    options: RunOptions,
    input: mpsc::UnboundedSender<InputEvent>,
    /// Clickable entries shown since the last choice or clear.
    offered: Vec<Rect>,
}

/// Off-board point: advances reveals and acks without hitting an entry.
const ADVANCE_CLICK: InputEvent = InputEvent::PointerDown { x: -1.0, y: -1.0 };

impl Autoplayer {
    fn new(options: RunOptions, input: mpsc::UnboundedSender<InputEvent>) -> Self {
        Self {
            options,
            input,
            offered: Vec::new(),
        }
    }

    fn start(&self) -> Result<()> {
        if !self.options.normal_speed {
            self.send(InputEvent::ModifierDown)?;
        }
        Ok(())
    }

    fn send(&self, event: InputEvent) -> Result<()> {
        self.input
            .send(event)
            .map_err(|_closed| anyhow!("headless driver stopped"))
    }

    fn observe(&mut self, notice: EngineNotice) -> Result<()> {
        match notice {
            EngineNotice::TextRevealed { text, .. } => {
                let mut out = stdout().lock();
                writeln!(out, "{text}")?;
                out.flush()?;
            }
            EngineNotice::EntryShown {
                style: MessageStyle::Clickable,
                bounds,
                ..
            } => self.offered.push(bounds),
            EngineNotice::BoardCleared { .. } => self.offered.clear(),
            EngineNotice::AckRequested if self.options.normal_speed => {
                self.send(ADVANCE_CLICK)?;
            }
            EngineNotice::PredicateWaitStarted => self.choose()?,
            EngineNotice::EntryActivated { id } => debug!(%id, "option pressed"),
            _ => {}
        }
        Ok(())
    }

    fn choose(&mut self) -> Result<()> {
        let n = self.options.choice;
        let Some(bounds) = self.offered.get(n - 1).copied() else {
            anyhow::bail!(
                "--choice {n} is out of range: the story offered {} option(s)",
                self.offered.len()
            );
        };
        writeln!(stdout(), "> [{n}]")?;
        self.offered.clear();
        self.send(InputEvent::PointerDown {
            x: bounds.x + bounds.width / 2.0,
            y: bounds.y + bounds.height / 2.0,
        })
    }
}
