use std::{env, path::PathBuf};

use super::schema::Settings;

const APP_DIR: &str = "kawaii-player";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `KAWAII__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("KAWAII")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be within [0, 1]".to_string());
        }
        if self.session.persist_interval_ms == 0 {
            return Err("session.persist_interval_ms must be >= 1".to_string());
        }
        if self.session.progress_interval_ms == 0 {
            return Err("session.progress_interval_ms must be >= 1".to_string());
        }
        if self.session.key.trim().is_empty() {
            return Err("session.key must not be empty".to_string());
        }
        if !(1..=12).contains(&self.schedule.holiday_month) {
            return Err("schedule.holiday_month must be within 1..=12".to_string());
        }
        if self.schedule.holiday_start_hour >= self.schedule.holiday_end_hour
            || self.schedule.holiday_end_hour > 24
        {
            return Err(
                "schedule.holiday_start_hour must be before holiday_end_hour (<= 24)".to_string(),
            );
        }
        Ok(())
    }

    /// Where the session store lives: the configured path, or the XDG data dir.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.session
            .storage_path
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("state.json")))
    }
}

/// Resolve the config path from `KAWAII_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("KAWAII_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/kawaii-player/config.toml`
/// or `~/.config/kawaii-player/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join(APP_DIR).join("config.toml"))
}

/// `$XDG_DATA_HOME/kawaii-player` or `~/.local/share/kawaii-player`.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join(APP_DIR))
}
