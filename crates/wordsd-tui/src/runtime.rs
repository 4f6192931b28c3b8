//! TUI runtime: owns the terminal and the engine, runs the event loop.
//!
//! The narrative script runs on its own task and reaches the engine through
//! the command inbox, which is drained every frame. Terminal input is
//! translated and fed to the engine in arrival order, then the engine is
//! ticked and the frame is drawn.

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};
use wordsd_core::{Engine, ScriptCommand};

use crate::input::{self, Action};
use crate::render::{self, Status};
use crate::terminal;

/// Frame cadence while text is revealing or the idle cue animates.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when nothing animates. Bounds the latency of script
/// commands, which arrive outside terminal input.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(50);

pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    engine: Engine,
    /// Inbox of script commands.
    commands: mpsc::UnboundedReceiver<ScriptCommand>,
    status: Status,
    should_quit: bool,
}

impl TuiRuntime {
    /// Takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(engine: Engine, commands: mpsc::UnboundedReceiver<ScriptCommand>) -> Result<Self> {
        // Panic hook BEFORE entering the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        Ok(Self {
            terminal,
            engine,
            commands,
            status: Status::default(),
            should_quit: false,
        })
    }

    /// Runs until the player quits, then restores the terminal.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<()> {
        let enhanced = terminal::enable_input_features()?;
        self.status.hold_to_skip = enhanced;

        let result = self.event_loop();

        let _ = terminal::disable_input_features(enhanced);
        terminal::restore_terminal()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        self.engine
            .resize(f32::from(size.width), f32::from(size.height));

        while !self.should_quit {
            self.drain_commands();

            let poll = if self.engine.is_animating() {
                FRAME_DURATION
            } else {
                IDLE_POLL_DURATION
            };
            if event::poll(poll)? {
                self.handle_terminal_event(&event::read()?);
                // Drain any remaining buffered events (non-blocking)
                while !self.should_quit && event::poll(Duration::ZERO)? {
                    self.handle_terminal_event(&event::read()?);
                }
            }

            self.engine.tick(Instant::now());

            let engine = &self.engine;
            let status = self.status;
            self.terminal.draw(|frame| {
                render::render(engine, status, frame);
            })?;
        }

        info!("player quit");
        Ok(())
    }

    fn drain_commands(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(cmd) => self.engine.handle_command(cmd, Instant::now()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.status.script_finished {
                        debug!("script finished");
                        self.status.script_finished = true;
                    }
                    break;
                }
            }
        }
    }

    fn handle_terminal_event(&mut self, event: &event::Event) {
        match input::translate(event, self.engine.viewer().is_open()) {
            Action::Engine(input) => self.engine.handle_input(input, Instant::now()),
            Action::Resize { width, height } => {
                self.engine.resize(f32::from(width), f32::from(height));
            }
            Action::Quit => self.should_quit = true,
            Action::Ignore => {}
        }
    }
}
