//! CLI command handlers.

pub mod config;
pub mod play;
pub mod run;
