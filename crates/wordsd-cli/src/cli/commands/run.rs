//! Non-interactive run command.

use anyhow::{Result, ensure};
use wordsd_core::Config;

pub use crate::modes::headless::RunOptions;
use crate::{modes, story};

pub async fn run(config: &Config, options: RunOptions) -> Result<()> {
    ensure!(options.choice >= 1, "--choice is 1-based, got {}", options.choice);
    modes::headless::run(config, options, story::move_in_night).await
}
