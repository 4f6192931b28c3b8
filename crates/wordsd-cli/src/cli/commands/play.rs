//! Interactive play command.

use anyhow::Result;
use wordsd_core::Config;

use crate::{modes, story};

pub async fn run(config: &Config) -> Result<()> {
    modes::run_interactive(config, story::move_in_night).await
}
