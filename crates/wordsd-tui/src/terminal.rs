//! Terminal lifecycle management.
//!
//! Terminal state is restored on:
//! - Normal exit
//! - Panic (via the panic hook)

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

/// Sets up the terminal: raw mode, alternate screen, terminal instance.
///
/// Call `install_panic_hook()` before this to ensure terminal restore on panic.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Enables mouse capture and, where supported, key release reporting.
///
/// Returns whether bare modifier press/release events will be delivered.
/// Without them the player toggles fast-forward instead of holding it.
///
/// # Errors
/// Returns an error if mouse capture cannot be enabled.
pub fn enable_input_features() -> Result<bool> {
    execute!(io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;

    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )
        .context("Failed to enable keyboard enhancement")?;
    }
    debug!(enhanced, "input features enabled");
    Ok(enhanced)
}

/// Disables the features enabled by `enable_input_features()`.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn disable_input_features(enhanced: bool) -> Result<()> {
    if enhanced {
        execute!(io::stdout(), PopKeyboardEnhancementFlags)
            .context("Failed to disable keyboard enhancement")?;
    }
    execute!(io::stdout(), DisableMouseCapture).context("Failed to disable mouse capture")?;
    Ok(())
}

/// Restores terminal state. Idempotent.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn restore_terminal() -> Result<()> {
    // Safe even if never enabled; must happen before leaving raw mode.
    let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags, DisableMouseCapture);

    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
///
/// Call this BEFORE `setup_terminal()`.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
