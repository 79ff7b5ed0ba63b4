use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tracklist::RepeatMode;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// The stored snapshot. Field names are part of the storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSession {
    pub current_index: usize,
    /// Seconds into the current track.
    pub current_time: f64,
    pub volume: f32,
    pub is_shuffle: bool,
    pub repeat_mode: RepeatMode,
    pub was_playing: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            current_index: 0,
            current_time: 0.0,
            volume: 0.7,
            is_shuffle: false,
            repeat_mode: RepeatMode::None,
            was_playing: false,
            timestamp: 0,
        }
    }
}

impl PersistedSession {
    /// Parse a stored value and pull out-of-range numbers back into range.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut s: Self = serde_json::from_value(value)?;
        if !s.current_time.is_finite() || s.current_time < 0.0 {
            s.current_time = 0.0;
        }
        s.volume = if s.volume.is_nan() {
            0.7
        } else {
            s.volume.clamp(0.0, 1.0)
        };
        Ok(s)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Age at `now`. A timestamp from the future counts as brand new.
    pub fn hours_since_save(&self, now: u64) -> f64 {
        now.saturating_sub(self.timestamp) as f64 / MILLIS_PER_HOUR
    }

    pub fn is_stale(&self, now: u64, stale_hours: f64) -> bool {
        self.hours_since_save(now) > stale_hours
    }
}
