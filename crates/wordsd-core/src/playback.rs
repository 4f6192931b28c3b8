//! Fast-forward state and the input gate shared by the dialog and backlog.
//!
//! One [`PlaybackContext`] is owned by the engine. The dialog's modifier
//! handling checks `dialog_input_enabled` before acting, and the backlog
//! viewer turns it off while open, so the two never fight over the same key.

use std::time::Duration;

use tracing::debug;

use crate::config::PlaybackConfig;

/// Playback speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    #[default]
    Normal,
    FastForward,
}

#[derive(Debug, Clone)]
pub struct PlaybackContext {
    mode: PlaybackMode,
    dialog_input_enabled: bool,
    normal_delay: Duration,
    fast_delay: Duration,
}

impl PlaybackContext {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            mode: PlaybackMode::Normal,
            dialog_input_enabled: true,
            normal_delay: config.normal_reveal_delay(),
            fast_delay: config.fast_forward_reveal_delay(),
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn is_fast_forward(&self) -> bool {
        self.mode == PlaybackMode::FastForward
    }

    pub fn dialog_input_enabled(&self) -> bool {
        self.dialog_input_enabled
    }

    /// Modifier pressed. Ignored while dialog input is disabled.
    /// Returns true if the mode changed.
    pub fn modifier_down(&mut self) -> bool {
        if !self.dialog_input_enabled {
            return false;
        }
        self.set_mode(PlaybackMode::FastForward)
    }

    /// Modifier released. Always honored so a release during an open backlog
    /// cannot leave fast-forward stuck on.
    pub fn modifier_up(&mut self) -> bool {
        self.set_mode(PlaybackMode::Normal)
    }

    /// Flips the mode, for terminals that cannot report modifier releases.
    pub fn toggle(&mut self) -> bool {
        if !self.dialog_input_enabled {
            return false;
        }
        let next = match self.mode {
            PlaybackMode::Normal => PlaybackMode::FastForward,
            PlaybackMode::FastForward => PlaybackMode::Normal,
        };
        self.set_mode(next)
    }

    /// Hands the input surface to another component. Forces normal mode.
    pub fn disable_dialog_input(&mut self) {
        self.dialog_input_enabled = false;
        self.set_mode(PlaybackMode::Normal);
    }

    pub fn enable_dialog_input(&mut self) {
        self.dialog_input_enabled = true;
    }

    /// Inter-character delay for the current mode.
    pub fn reveal_delay(&self) -> Duration {
        match self.mode {
            PlaybackMode::Normal => self.normal_delay,
            PlaybackMode::FastForward => self.fast_delay,
        }
    }

    fn set_mode(&mut self, mode: PlaybackMode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!(?mode, "playback mode changed");
        self.mode = mode;
        true
    }
}
