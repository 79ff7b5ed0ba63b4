use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, Timelike};

use crate::config::ScheduleSettings;

/// Which playlist should be active.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    Morning,
    Sunset,
    Night,
    Holiday,
}

impl Slot {
    /// Morning 06-12, sunset 12-19, night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Slot::Morning,
            12..=18 => Slot::Sunset,
            _ => Slot::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Morning => "morning",
            Slot::Sunset => "sunset",
            Slot::Night => "night",
            Slot::Holiday => "holiday",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistSchedule {
    settings: ScheduleSettings,
}

impl PlaylistSchedule {
    pub fn new(settings: ScheduleSettings) -> Self {
        Self { settings }
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn check_interval_secs(&self) -> u64 {
        self.settings.check_interval_secs
    }

    fn is_holiday(&self, month: u32, hour: u32) -> bool {
        self.settings.holiday_dir.is_some()
            && month == self.settings.holiday_month
            && hour >= self.settings.holiday_start_hour
            && hour < self.settings.holiday_end_hour
    }

    /// Slot for a given local month (1-12) and hour (0-23). The holiday
    /// window overrides the time of day while it is open.
    pub fn slot_at(&self, month: u32, hour: u32) -> Slot {
        if self.is_holiday(month, hour) {
            Slot::Holiday
        } else {
            Slot::from_hour(hour)
        }
    }

    pub fn slot_now(&self) -> Slot {
        let now = Local::now();
        self.slot_at(now.month(), now.hour())
    }

    /// Directory feeding `slot`. Unset directories fall back to `library_dir`.
    pub fn dir_for(&self, slot: Slot, library_dir: &Path) -> PathBuf {
        let configured = match slot {
            Slot::Morning => self.settings.morning_dir.as_ref(),
            Slot::Sunset => self.settings.sunset_dir.as_ref(),
            Slot::Night => self.settings.night_dir.as_ref(),
            Slot::Holiday => self.settings.holiday_dir.as_ref(),
        };
        configured
            .cloned()
            .unwrap_or_else(|| library_dir.to_path_buf())
    }
}
