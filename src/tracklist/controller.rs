use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::audio::{EngineEvent, PlaybackEngine};
use crate::error::PlayerError;
use crate::library::{Playlist, Track};

/// What happens when a track ends.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Advance until the last track, then stop.
    #[default]
    None,
    /// Wrap around to the first track.
    All,
    /// Replay the current track.
    One,
}

impl RepeatMode {
    /// None -> All -> One -> None
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::None => "none",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackCursor {
    pub current_index: usize,
    pub current_time: f64,
    pub volume: f32,
    pub is_shuffle: bool,
    pub repeat_mode: RepeatMode,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self {
            current_index: 0,
            current_time: 0.0,
            volume: 0.7,
            is_shuffle: false,
            repeat_mode: RepeatMode::None,
        }
    }
}

/// Cursor fields restored from a saved session. Audio is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredCursor {
    pub index: usize,
    pub volume: f32,
    pub is_shuffle: bool,
    pub repeat_mode: RepeatMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackListEvent {
    Engine(EngineEvent),
    TrackChanged { index: usize },
    PlaylistReplaced { len: usize },
    /// Shuffle or repeat changed.
    ModeChanged,
    VolumeChanged(f32),
    /// The last track ended with repeat off; nothing advances further.
    Stopped,
}

pub struct TrackListController {
    engine: PlaybackEngine,
    playlist: Playlist,
    cursor: PlaybackCursor,
    rng: StdRng,
    last_audible: f32,
    previous_restart_secs: f64,
    events: Vec<TrackListEvent>,
}

impl TrackListController {
    pub fn new(engine: PlaybackEngine, rng: StdRng, previous_restart_secs: f64) -> Self {
        let mut controller = Self {
            engine,
            playlist: Vec::new(),
            cursor: PlaybackCursor::default(),
            rng,
            last_audible: 0.7,
            previous_restart_secs,
            events: Vec::new(),
        };
        let v = controller.cursor.volume;
        controller.engine.set_volume(v);
        controller
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.cursor.current_index)
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    /// Snapshot with the live position filled in.
    pub fn cursor(&self) -> PlaybackCursor {
        let mut c = self.cursor.clone();
        if self.engine.current().is_some() {
            c.current_time = self.engine.position();
        }
        c
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Playing, or waiting for the output to confirm a start.
    pub fn is_active(&self) -> bool {
        self.engine.is_playing() || self.engine.is_starting()
    }

    /// Replace the playlist wholesale and rewind to the first track.
    ///
    /// Tracks need a non-empty, unique id; otherwise nothing changes.
    pub fn set_playlist(&mut self, tracks: Playlist, autoplay: bool) -> Result<(), PlayerError> {
        let mut seen = HashSet::new();
        for t in &tracks {
            if t.id.trim().is_empty() {
                return Err(PlayerError::InvalidPlaylist(format!(
                    "track \"{}\" has no id",
                    t.title
                )));
            }
            if !seen.insert(t.id.as_str()) {
                return Err(PlayerError::InvalidPlaylist(format!(
                    "duplicate track id {}",
                    t.id
                )));
            }
        }

        let was_active = self.is_active();
        if was_active {
            self.engine.pause();
        }

        self.playlist = tracks;
        self.cursor.current_index = 0;
        self.cursor.current_time = 0.0;
        self.events.push(TrackListEvent::PlaylistReplaced {
            len: self.playlist.len(),
        });
        tracing::info!(len = self.playlist.len(), autoplay, was_active, "playlist replaced");

        if self.playlist.is_empty() {
            return Ok(());
        }
        if was_active || autoplay {
            self.play_track_at(0, 0.0)
        } else {
            self.load_current();
            Ok(())
        }
    }

    fn load_current(&mut self) {
        if let Some(track) = self.playlist.get(self.cursor.current_index).cloned() {
            self.engine.load(track);
            self.events.push(TrackListEvent::TrackChanged {
                index: self.cursor.current_index,
            });
        }
    }

    /// Load and play `index`, starting at `resume_at` seconds once the
    /// track's duration is known. A no-op on an empty playlist.
    pub fn play_track_at(&mut self, index: usize, resume_at: f64) -> Result<(), PlayerError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        if index >= self.playlist.len() {
            return Err(PlayerError::IndexOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }

        let resume_at = if resume_at.is_finite() {
            resume_at.max(0.0)
        } else {
            0.0
        };
        self.cursor.current_index = index;
        self.cursor.current_time = resume_at;
        self.load_current();
        if resume_at > 0.0 {
            self.engine.seek(resume_at);
        }
        if let Err(e) = self.engine.play() {
            tracing::warn!(error = %e, index, "play failed");
        }
        Ok(())
    }

    pub fn play(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        let loaded = self
            .engine
            .current()
            .zip(self.current_track())
            .is_some_and(|(a, b)| a.id == b.id);
        if !loaded {
            let at = self.cursor.current_time;
            self.load_current();
            if at > 0.0 {
                self.engine.seek(at);
            }
        }
        if let Err(e) = self.engine.play() {
            tracing::warn!(error = %e, "play failed");
        }
    }

    pub fn pause(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.cursor.current_time = self.engine.position();
        self.engine.pause();
    }

    pub fn toggle_play(&mut self) {
        if self.is_active() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// A uniformly random index other than the current one, when there is one.
    fn random_other(&mut self) -> usize {
        let len = self.playlist.len();
        if len <= 1 {
            return 0;
        }
        let pick = self.rng.random_range(0..len - 1);
        if pick >= self.cursor.current_index {
            pick + 1
        } else {
            pick
        }
    }

    pub fn next(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let index = if self.cursor.is_shuffle {
            self.random_other()
        } else {
            (self.cursor.current_index + 1) % len
        };
        if let Err(e) = self.play_track_at(index, 0.0) {
            tracing::warn!(error = %e, index, "next failed");
        }
    }

    /// Restart the current track when past the restart threshold, otherwise
    /// step back one (or to a random track under shuffle).
    pub fn previous(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        if self.engine.position() > self.previous_restart_secs {
            self.engine.seek(0.0);
            self.cursor.current_time = 0.0;
            return;
        }
        let index = if self.cursor.is_shuffle {
            self.random_other()
        } else {
            (self.cursor.current_index + len - 1) % len
        };
        if let Err(e) = self.play_track_at(index, 0.0) {
            tracing::warn!(error = %e, index, "previous failed");
        }
    }

    pub fn on_track_ended(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        match self.cursor.repeat_mode {
            RepeatMode::One => {
                let index = self.cursor.current_index;
                if let Err(e) = self.play_track_at(index, 0.0) {
                    tracing::warn!(error = %e, index, "repeat failed");
                }
            }
            RepeatMode::All => self.next(),
            RepeatMode::None if self.cursor.current_index + 1 < len => self.next(),
            RepeatMode::None => {
                tracing::debug!("end of playlist");
                self.engine.pause();
                self.engine.seek(0.0);
                self.cursor.current_time = 0.0;
                self.events.push(TrackListEvent::Stopped);
            }
        }
    }

    pub fn seek(&mut self, secs: f64) {
        if self.playlist.is_empty() {
            return;
        }
        self.engine.seek(secs);
        self.cursor.current_time = self.engine.position();
    }

    pub fn toggle_shuffle(&mut self) {
        self.cursor.is_shuffle = !self.cursor.is_shuffle;
        self.events.push(TrackListEvent::ModeChanged);
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.cursor.repeat_mode = self.cursor.repeat_mode.cycle();
        self.events.push(TrackListEvent::ModeChanged);
    }

    /// Returns the effective (clamped) volume.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let v = self.engine.set_volume(volume);
        self.cursor.volume = v;
        if v > 0.0 {
            self.last_audible = v;
        }
        self.events.push(TrackListEvent::VolumeChanged(v));
        v
    }

    pub fn toggle_mute(&mut self) -> f32 {
        if self.cursor.volume > 0.0 {
            self.set_volume(0.0)
        } else {
            let v = self.last_audible;
            self.set_volume(v)
        }
    }

    /// Apply saved non-audio state and show the saved track without playing.
    pub fn restore(&mut self, saved: RestoredCursor) {
        self.cursor.is_shuffle = saved.is_shuffle;
        self.cursor.repeat_mode = saved.repeat_mode;
        self.set_volume(saved.volume);
        if !self.playlist.is_empty() {
            self.cursor.current_index = saved.index.min(self.playlist.len() - 1);
            self.cursor.current_time = 0.0;
            self.load_current();
        }
        self.events.push(TrackListEvent::ModeChanged);
    }

    /// Drain engine output, react to track ends, and return everything that
    /// happened since the last call in order.
    pub fn poll(&mut self, now: u64) -> Vec<TrackListEvent> {
        let mut out = std::mem::take(&mut self.events);
        for event in self.engine.poll(now) {
            if let EngineEvent::TimeAdvanced(t) = event {
                self.cursor.current_time = t;
            }
            let ended = event == EngineEvent::Ended;
            out.push(TrackListEvent::Engine(event));
            if ended {
                self.on_track_ended();
                out.extend(self.engine.take_events().into_iter().map(TrackListEvent::Engine));
                out.append(&mut self.events);
            }
        }
        out
    }
}
