//! Full-screen terminal front end for the WordSD dialog engine.

pub mod common;
pub mod input;
pub mod render;
pub mod runtime;
pub mod terminal;

use std::future::Future;
use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
pub use runtime::TuiRuntime;
use tracing::warn;
use wordsd_core::measure::CellMeasure;
use wordsd_core::{Config, DialogHandle, Engine};

/// Runs `story` against a terminal UI until the player quits.
///
/// The story runs on its own task; when it ends the screen stays up until
/// the player quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal or the terminal fails.
pub async fn run_interactive<F, Fut>(config: &Config, story: F) -> Result<()>
where
    F: FnOnce(DialogHandle) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    if !std::io::stdout().is_terminal() {
        anyhow::bail!(
            "Play mode requires a terminal.\n\
             Use `wordsd run` for non-interactive playback."
        );
    }

    let (handle, commands) = wordsd_core::handle::channel(&config.playback);
    let engine = Engine::new(config, Arc::new(CellMeasure));
    let script = tokio::spawn(story(handle));

    let mut runtime = TuiRuntime::new(engine, commands)?;
    // The event loop blocks on terminal input; keep the script's workers free.
    tokio::task::block_in_place(|| runtime.run())?;
    drop(runtime);

    if script.is_finished() {
        match script.await {
            Ok(Err(e)) => warn!("story ended with error: {e:#}"),
            Ok(Ok(())) => {}
            Err(e) => warn!("story task failed: {e}"),
        }
    } else {
        script.abort();
    }

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
