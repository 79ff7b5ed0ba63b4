use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tracklist::RepeatMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/kawaii-player/config.toml` or
/// `~/.config/kawaii-player/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `KAWAII__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub session: SessionSettings,
    pub library: LibrarySettings,
    pub schedule: ScheduleSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume in `[0, 1]` when no session is stored.
    pub volume: f32,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Default repeat mode.
    pub repeat_mode: RepeatModeSetting,
    /// Start playing shortly after launch when there is nothing to resume.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            shuffle: false,
            repeat_mode: RepeatModeSetting::None,
            autoplay: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "no-loop", alias = "no_loop", alias = "off")]
    None,
    #[serde(alias = "loop-all", alias = "loop_all", alias = "loop-around")]
    All,
    #[serde(alias = "loop-one", alias = "loop_one", alias = "repeat-one")]
    One,
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(s: RepeatModeSetting) -> Self {
        match s {
            RepeatModeSetting::None => RepeatMode::None,
            RepeatModeSetting::All => RepeatMode::All,
            RepeatModeSetting::One => RepeatMode::One,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// JSON file backing the key-value store. Defaults to the XDG data dir.
    pub storage_path: Option<PathBuf>,
    /// Storage key of the persisted session record.
    pub key: String,
    /// Minimum interval between two throttled session writes.
    pub persist_interval_ms: u64,
    /// Minimum interval between two progress events.
    pub progress_interval_ms: u64,
    /// Sessions older than this are never auto-resumed.
    pub stale_hours: f64,
    /// Saved positions beyond this restart the track instead.
    pub max_resume_secs: f64,
    /// Settle delay between the resume trigger and the actual play call.
    pub resume_delay_ms: u64,
    /// Resume even without any interaction after this long.
    pub resume_fallback_ms: u64,
    /// `previous` restarts the current track when past this position.
    pub previous_restart_secs: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            storage_path: None,
            key: "musicPlayerState".to_string(),
            persist_interval_ms: 2_000,
            progress_interval_ms: 250,
            stale_hours: 8.0,
            max_resume_secs: 30.0,
            resume_delay_ms: 300,
            resume_fallback_ms: 10_000,
            previous_restart_secs: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

/// Time-of-day and holiday playlists. Any directory left unset falls back to
/// the library directory given on the command line.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub enabled: bool,
    pub morning_dir: Option<PathBuf>,
    pub sunset_dir: Option<PathBuf>,
    pub night_dir: Option<PathBuf>,
    pub holiday_dir: Option<PathBuf>,
    /// Calendar month of the holiday season (1-12).
    pub holiday_month: u32,
    /// Holiday playlist is active from this local hour (inclusive)...
    pub holiday_start_hour: u32,
    /// ...to this local hour (exclusive).
    pub holiday_end_hour: u32,
    pub check_interval_secs: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            morning_dir: None,
            sunset_dir: None,
            night_dir: None,
            holiday_dir: None,
            holiday_month: 12,
            holiday_start_hour: 0,
            holiday_end_hour: 10,
            check_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Play short cues on transport and mode changes.
    pub sound_effects: bool,
    /// How long a toast stays on screen.
    pub toast_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ nyaa~ music time ~ ".to_string(),
            sound_effects: true,
            toast_ms: 4_000,
        }
    }
}
