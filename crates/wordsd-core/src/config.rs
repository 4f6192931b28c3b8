//! Configuration management for WordSD.
//!
//! Loads configuration from ${WORDSD_HOME}/config.toml with sensible defaults.
//! Layout values are in renderer units; the defaults are tuned for a terminal
//! where one unit is one character cell.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for WordSD configuration and data directories.
    //!
    //! WORDSD_HOME resolution order:
    //! 1. WORDSD_HOME environment variable (if set)
    //! 2. ~/.config/wordsd (default)

    use std::path::PathBuf;

    /// Returns the WordSD home directory.
    pub fn wordsd_home() -> PathBuf {
        if let Ok(home) = std::env::var("WORDSD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".wordsd"),
            |h| h.join(".config").join("wordsd"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        wordsd_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        wordsd_home().join("logs")
    }
}

/// Reveal and wait timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between revealed characters in normal mode.
    pub normal_reveal_delay_ms: u64,
    /// Delay between revealed characters while fast-forward is held.
    pub fast_forward_reveal_delay_ms: u64,
    /// Interval between idle-cue animation frames.
    pub idle_cue_interval_ms: u64,
    /// Interval between predicate polls in `wait_for`.
    pub predicate_poll_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            normal_reveal_delay_ms: 30,
            fast_forward_reveal_delay_ms: 3,
            idle_cue_interval_ms: 500,
            predicate_poll_interval_ms: 100,
        }
    }
}

impl PlaybackConfig {
    pub fn normal_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.normal_reveal_delay_ms)
    }

    pub fn fast_forward_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.fast_forward_reveal_delay_ms)
    }

    pub fn idle_cue_interval(&self) -> Duration {
        Duration::from_millis(self.idle_cue_interval_ms)
    }

    pub fn predicate_poll_interval(&self) -> Duration {
        Duration::from_millis(self.predicate_poll_interval_ms)
    }
}

/// Margins and spacing shared by the dialog board and the backlog viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub line_spacing: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl LayoutConfig {
    /// Width available for word wrapping inside a viewport of `width`.
    pub fn wrap_width(&self, width: f32) -> f32 {
        (width - self.margin_left - self.margin_right).max(0.0)
    }
}

/// Dialog board layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    pub line_spacing: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            line_spacing: 1.0,
            margin_top: 2.0,
            margin_bottom: 3.0,
            margin_left: 6.0,
            margin_right: 6.0,
        }
    }
}

impl DialogConfig {
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            line_spacing: self.line_spacing,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            margin_right: self.margin_right,
        }
    }
}

/// Backlog viewer layout and scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklogConfig {
    pub line_spacing: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Content shift per wheel notch.
    pub scroll_step: f32,
    /// Width of the scroll track and thumb.
    pub thumb_width: f32,
}

impl Default for BacklogConfig {
    fn default() -> Self {
        Self {
            line_spacing: 1.0,
            margin_top: 3.0,
            margin_bottom: 3.0,
            margin_left: 6.0,
            margin_right: 6.0,
            scroll_step: 3.0,
            thumb_width: 1.0,
        }
    }
}

impl BacklogConfig {
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            line_spacing: self.line_spacing,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            margin_right: self.margin_right,
        }
    }
}

/// Initial viewport size, replaced by `resize` once the renderer knows better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 30.0,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub dialog: DialogConfig,
    pub backlog: BacklogConfig,
    pub viewport: ViewportConfig,
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
