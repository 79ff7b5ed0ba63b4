//! Composition root: wires the track list, the persistence coordinator and
//! the UI-facing collaborators together behind one `tick`.

use crate::audio::RequestId;
use crate::clock::Clock;
use crate::error::PlayerError;
use crate::library::Playlist;
use crate::notify::{SoundCue, SoundEffects};
use crate::session::{Interaction, PersistenceCoordinator, ResumeTicket, SessionDiagnostics};
use crate::tracklist::{PlaybackCursor, RestoredCursor, TrackListController, TrackListEvent};

/// Everything the diagnostics overlay shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub session: SessionDiagnostics,
    pub cursor: PlaybackCursor,
    pub playlist_len: usize,
    pub in_flight_play: Option<RequestId>,
    pub autoplay_at: Option<u64>,
}

pub struct Player {
    controller: TrackListController,
    coordinator: PersistenceCoordinator,
    effects: Box<dyn SoundEffects>,
    clock: Box<dyn Clock>,
    autoplay_delay_ms: u64,
    autoplay_at: Option<u64>,
}

impl Player {
    pub fn new(
        controller: TrackListController,
        coordinator: PersistenceCoordinator,
        effects: Box<dyn SoundEffects>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            controller,
            coordinator,
            effects,
            clock,
            autoplay_delay_ms: 1_000,
            autoplay_at: None,
        }
    }

    pub fn controller(&self) -> &TrackListController {
        &self.controller
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator {
        &self.coordinator
    }

    pub fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Restore the saved session. Call after the first playlist is in place.
    /// With `autoplay` and nothing to resume, playback starts shortly after.
    pub fn init(&mut self, autoplay: bool) -> Option<ResumeTicket> {
        let now = self.now();
        let ticket = self.coordinator.init(&mut self.controller, now);
        if ticket.is_none() && autoplay {
            self.autoplay_at = Some(now.saturating_add(self.autoplay_delay_ms));
        }
        ticket
    }

    /// Seed volume and modes before any session is read.
    pub fn apply_defaults(&mut self, defaults: RestoredCursor) {
        self.controller.restore(defaults);
    }

    pub fn set_playlist(&mut self, tracks: Playlist, autoplay: bool) -> Result<(), PlayerError> {
        self.controller.set_playlist(tracks, autoplay)
    }

    pub fn play_track_at(&mut self, index: usize, resume_at: f64) -> Result<(), PlayerError> {
        self.controller.play_track_at(index, resume_at)
    }

    pub fn toggle_play(&mut self) {
        self.controller.toggle_play();
    }

    pub fn next(&mut self) {
        self.effects.play(SoundCue::Click);
        self.controller.next();
    }

    pub fn previous(&mut self) {
        self.effects.play(SoundCue::Click);
        self.controller.previous();
    }

    pub fn seek_by(&mut self, delta: f64) {
        let at = self.controller.cursor().current_time + delta;
        self.controller.seek(at);
    }

    pub fn toggle_shuffle(&mut self) {
        self.effects.play(SoundCue::Toggle);
        self.controller.toggle_shuffle();
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.effects.play(SoundCue::Toggle);
        self.controller.cycle_repeat_mode();
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.controller.set_volume(volume)
    }

    pub fn toggle_mute(&mut self) -> f32 {
        self.controller.toggle_mute()
    }

    pub fn interaction(&mut self, kind: Interaction) {
        let now = self.now();
        self.coordinator.interaction(kind, now);
    }

    /// Route everything the track list produced into the coordinator and
    /// run its timers. Returns the events for the view layer.
    pub fn tick(&mut self) -> Vec<TrackListEvent> {
        let now = self.now();

        if self.autoplay_at.is_some_and(|at| now >= at) {
            self.autoplay_at = None;
            if !self.controller.is_active() {
                tracing::info!("autoplay");
                self.controller.play();
            }
        }

        let events = self.controller.poll(now);
        for event in &events {
            self.coordinator.observe(event, &self.controller, now);
        }
        self.coordinator.tick(&mut self.controller, now);
        events
    }

    /// Flush the session right away (focus lost, about to exit).
    pub fn force_persist(&mut self) {
        let now = self.now();
        self.coordinator.force_persist(&self.controller, now);
    }

    pub fn reset(&mut self) {
        self.autoplay_at = None;
        self.coordinator.reset();
    }

    pub fn shutdown(&mut self) {
        self.tick();
        let now = self.now();
        self.coordinator.shutdown(&self.controller, now);
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            session: self.coordinator.diagnostics(),
            cursor: self.controller.cursor(),
            playlist_len: self.controller.playlist().len(),
            in_flight_play: self.controller.engine().in_flight_play(),
            autoplay_at: self.autoplay_at,
        }
    }
}
