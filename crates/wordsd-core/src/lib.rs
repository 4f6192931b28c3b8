//! Core WordSD library: dialog playback, wait gates, dialog board, backlog
//! recorder and viewer, plus the script handle that drives them.
//!
//! The engine is a single-owner state machine. Narrative scripts talk to it
//! through [`DialogHandle`], renderers feed it [`InputEvent`]s and ticks.

pub mod board;
pub mod config;
pub mod driver;
pub mod engine;
pub mod entry;
pub mod events;
pub mod geometry;
pub mod handle;
pub mod measure;
pub mod playback;
pub mod recorder;
pub mod typewriter;
pub mod viewer;
pub mod wait_gate;

pub use config::Config;
pub use engine::Engine;
pub use entry::{EntryId, MessageStyle};
pub use events::{EngineNotice, InputEvent, ScriptCommand};
pub use handle::{DialogHandle, EngineClosed};
pub use wait_gate::AckResolution;
