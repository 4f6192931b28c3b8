//! Runtime execution modes.
//!
//! - `headless`: non-interactive playback with an autoplayer (stdout/stderr)
//! - `tui`: full-screen interactive terminal UI

pub mod headless;

pub use wordsd_tui::run_interactive;
