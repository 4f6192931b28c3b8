//! Headless event loop.
//!
//! Runs an [`Engine`] without a screen: script commands, injected input, and
//! a fixed tick are multiplexed on one task. Used by tests and by the
//! non-interactive CLI mode.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::engine::Engine;
use crate::events::{InputEvent, ScriptCommand};

/// Default tick, one frame at ~60fps.
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);

pub struct HeadlessDriver {
    engine: Engine,
    commands: mpsc::UnboundedReceiver<ScriptCommand>,
    inputs: mpsc::UnboundedReceiver<InputEvent>,
    tick: Duration,
}

impl HeadlessDriver {
    /// Returns the driver and the sender for injecting input.
    pub fn new(
        engine: Engine,
        commands: mpsc::UnboundedReceiver<ScriptCommand>,
    ) -> (Self, mpsc::UnboundedSender<InputEvent>) {
        let (input_tx, inputs) = mpsc::unbounded_channel();
        (
            Self {
                engine,
                commands,
                inputs,
                tick: DEFAULT_TICK,
            },
            input_tx,
        )
    }

    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Runs until every script handle is dropped, then returns the engine.
    pub async fn run(mut self) -> Engine {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                Some(event) = self.inputs.recv() => {
                    self.engine.handle_input(event, now());
                }
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("script finished");
                        break;
                    };
                    self.engine.handle_command(cmd, now());
                }
                _ = ticker.tick() => {
                    self.engine.tick(now());
                }
            }
        }

        self.engine
    }
}

/// Engine clock. Follows tokio's clock so paused-time tests stay exact.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
