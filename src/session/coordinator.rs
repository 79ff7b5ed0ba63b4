use std::fmt;

use crate::audio::EngineEvent;
use crate::config::SessionSettings;
use crate::error::{PlayerError, StorageError};
use crate::notify::{Advisory, Notifier};
use crate::storage::Storage;
use crate::throttle::Throttle;
use crate::tracklist::{RestoredCursor, TrackListController, TrackListEvent};

use super::record::PersistedSession;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loading,
    Playing,
    Paused,
    Buffering,
    Error,
    /// Startup resume in progress; ends in `Playing` or `Idle`.
    AutoResuming,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayerState::Idle => "idle",
            PlayerState::Loading => "loading",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Buffering => "buffering",
            PlayerState::Error => "error",
            PlayerState::AutoResuming => "auto-resuming",
        };
        f.write_str(s)
    }
}

/// Deferred intent to resume playback. Lives in memory only.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeTicket {
    pub index: usize,
    pub time: f64,
}

/// User gestures that may unlock the resume ticket.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interaction {
    PointerDown,
    KeyDown,
    TouchStart,
}

/// What triggered the ticket.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResumeTrigger {
    Interaction(Interaction),
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionDiagnostics {
    pub state: PlayerState,
    pub armed_ticket: Option<ResumeTicket>,
    pub fallback_at: Option<u64>,
    pub resume_at: Option<u64>,
    pub last_persisted: Option<u64>,
    pub pending_write: bool,
    pub storage_faults: u32,
    /// Most recent storage or load failure.
    pub last_error: Option<PlayerError>,
}

pub struct PersistenceCoordinator {
    storage: Box<dyn Storage>,
    notifier: Box<dyn Notifier>,
    settings: SessionSettings,
    state: PlayerState,
    throttle: Throttle,
    dirty: bool,
    last_timestamp: Option<u64>,
    ticket: Option<ResumeTicket>,
    fallback_at: Option<u64>,
    scheduled: Option<(u64, ResumeTicket)>,
    advisory_armed: bool,
    storage_faults: u32,
    last_error: Option<PlayerError>,
}

impl PersistenceCoordinator {
    pub fn new(
        storage: Box<dyn Storage>,
        notifier: Box<dyn Notifier>,
        settings: SessionSettings,
    ) -> Self {
        let throttle = Throttle::new(settings.persist_interval_ms);
        Self {
            storage,
            notifier,
            settings,
            state: PlayerState::Idle,
            throttle,
            dirty: false,
            last_timestamp: None,
            ticket: None,
            fallback_at: None,
            scheduled: None,
            advisory_armed: true,
            storage_faults: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn ticket(&self) -> Option<&ResumeTicket> {
        self.ticket.as_ref()
    }

    fn transition(&mut self, next: PlayerState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "state change");
            self.state = next;
        }
    }

    fn read_session(&mut self) -> Option<PersistedSession> {
        let value = match self.storage.get(&self.settings.key) {
            Ok(Some(v)) => v,
            Ok(None) => return None,
            Err(e) => {
                self.storage_fault("session read failed", e);
                return None;
            }
        };
        match PersistedSession::from_value(value) {
            Ok(s) => Some(s),
            Err(e) => {
                self.storage_fault("ignoring corrupt session", StorageError::from(e));
                None
            }
        }
    }

    fn storage_fault(&mut self, what: &str, e: StorageError) {
        tracing::warn!(error = %e, "{what}");
        self.storage_faults += 1;
        self.last_error = Some(PlayerError::from(e));
    }

    /// Restore the saved session into `controller` and arm the resume
    /// ticket when the session says music was playing.
    ///
    /// The playlist must already be in place: with an empty playlist only
    /// volume and modes come back and nothing is armed.
    pub fn init(&mut self, controller: &mut TrackListController, now: u64) -> Option<ResumeTicket> {
        let mut session = self.read_session()?;

        let age = session.hours_since_save(now);
        if session.is_stale(now, self.settings.stale_hours) {
            tracing::info!(hours = age, "session is stale, not resuming");
            session.was_playing = false;
            session.current_time = 0.0;
        }

        controller.restore(RestoredCursor {
            index: session.current_index,
            volume: session.volume,
            is_shuffle: session.is_shuffle,
            repeat_mode: session.repeat_mode,
        });

        let len = controller.playlist().len();
        if !session.was_playing || len == 0 {
            return None;
        }

        let time = if session.current_time > self.settings.max_resume_secs {
            0.0
        } else {
            session.current_time
        };
        let ticket = ResumeTicket {
            index: session.current_index.min(len - 1),
            time,
        };
        tracing::info!(index = ticket.index, time = ticket.time, "resume armed");
        self.ticket = Some(ticket.clone());
        self.fallback_at = Some(now.saturating_add(self.settings.resume_fallback_ms));
        Some(ticket)
    }

    /// Feed a user gesture. Only the first one after startup does anything.
    pub fn interaction(&mut self, kind: Interaction, now: u64) {
        self.consume_ticket(ResumeTrigger::Interaction(kind), now);
    }

    fn consume_ticket(&mut self, trigger: ResumeTrigger, now: u64) {
        // Taken before anything else so no second trigger can see it.
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        self.fallback_at = None;
        let at = now.saturating_add(self.settings.resume_delay_ms);
        tracing::info!(?trigger, at, "resume scheduled");
        self.scheduled = Some((at, ticket));
    }

    fn run_resume(&mut self, controller: &mut TrackListController, ticket: ResumeTicket) {
        let len = controller.playlist().len();
        if len == 0 {
            tracing::info!("playlist gone, dropping resume");
            return;
        }
        if controller.is_active() {
            tracing::info!("already playing, skipping resume");
            return;
        }
        let index = ticket.index.min(len - 1);
        self.transition(PlayerState::AutoResuming);
        tracing::info!(index, time = ticket.time, "resuming");
        if let Err(e) = controller.play_track_at(index, ticket.time) {
            tracing::warn!(error = %e, "resume failed");
            self.transition(PlayerState::Idle);
        }
    }

    /// React to one event from the track list.
    pub fn observe(&mut self, event: &TrackListEvent, controller: &TrackListController, now: u64) {
        let mut force = false;
        match event {
            TrackListEvent::Engine(e) => match e {
                EngineEvent::PlayRequested => {
                    if self.state != PlayerState::AutoResuming {
                        self.transition(PlayerState::Loading);
                    }
                }
                EngineEvent::PlayStateChanged(true) => {
                    self.transition(PlayerState::Playing);
                    self.advisory_armed = true;
                    self.dirty = true;
                }
                EngineEvent::PlayStateChanged(false) => {
                    if self.state != PlayerState::Error {
                        self.transition(PlayerState::Paused);
                    }
                    force = true;
                }
                EngineEvent::PlayRejected(reason) => {
                    tracing::info!(%reason, state = %self.state, "playback rejected");
                    if self.state == PlayerState::AutoResuming {
                        self.transition(PlayerState::Idle);
                    } else {
                        self.transition(PlayerState::Paused);
                    }
                    if self.advisory_armed {
                        self.advisory_armed = false;
                        self.notifier.advise(Advisory::PlaybackRejected);
                    }
                    force = true;
                }
                EngineEvent::LoadError(reason) => {
                    tracing::warn!(%reason, "load error, giving up on resume");
                    self.transition(PlayerState::Error);
                    self.ticket = None;
                    self.fallback_at = None;
                    self.scheduled = None;
                    self.last_error = Some(PlayerError::LoadFailed(reason.clone()));
                    let title = controller
                        .current_track()
                        .map(|t| t.title.clone())
                        .unwrap_or_default();
                    self.notifier.advise(Advisory::LoadFailed { title });
                    force = true;
                }
                EngineEvent::Stalled => {
                    if self.state == PlayerState::Playing {
                        self.transition(PlayerState::Buffering);
                    }
                }
                EngineEvent::Recovered => {
                    if self.state == PlayerState::Buffering {
                        self.transition(PlayerState::Playing);
                    }
                }
                EngineEvent::TimeAdvanced(_) => self.dirty = true,
                EngineEvent::MetadataLoaded(_) | EngineEvent::Ended => {}
            },
            TrackListEvent::Stopped => {
                self.transition(PlayerState::Idle);
                force = true;
            }
            TrackListEvent::TrackChanged { .. }
            | TrackListEvent::PlaylistReplaced { .. }
            | TrackListEvent::ModeChanged
            | TrackListEvent::VolumeChanged(_) => self.dirty = true,
        }

        if force {
            self.force_persist(controller, now);
        } else if self.dirty && self.throttle.is_open(now) {
            self.write(controller, now);
        }
    }

    /// Timers: fallback trigger, delayed resume, trailing throttled write.
    pub fn tick(&mut self, controller: &mut TrackListController, now: u64) {
        if self.fallback_at.is_some_and(|at| now >= at) {
            self.consume_ticket(ResumeTrigger::Fallback, now);
        }
        if self.scheduled.as_ref().is_some_and(|(at, _)| now >= *at) {
            if let Some((_, ticket)) = self.scheduled.take() {
                self.run_resume(controller, ticket);
            }
        }
        if self.dirty && self.throttle.is_open(now) {
            self.write(controller, now);
        }
    }

    fn snapshot(&self, controller: &TrackListController, timestamp: u64) -> PersistedSession {
        let cursor = controller.cursor();
        // An unconsumed resume is saved as-is, so a restart before the first
        // gesture comes back to the same place.
        let pending = self
            .ticket
            .as_ref()
            .or(self.scheduled.as_ref().map(|(_, t)| t));
        let was_playing = controller.is_active() || pending.is_some();
        let (current_index, current_time) = match pending {
            Some(t) if !controller.is_active() => (t.index, t.time),
            _ => (cursor.current_index, cursor.current_time),
        };
        PersistedSession {
            current_index,
            current_time,
            volume: cursor.volume,
            is_shuffle: cursor.is_shuffle,
            repeat_mode: cursor.repeat_mode,
            was_playing,
            timestamp,
        }
    }

    fn write(&mut self, controller: &TrackListController, now: u64) {
        self.throttle.force(now);
        self.dirty = false;

        let timestamp = self.last_timestamp.map_or(now, |last| last.max(now));
        let session = self.snapshot(controller, timestamp);
        let result = session
            .to_value()
            .map_err(StorageError::from)
            .and_then(|v| self.storage.set(&self.settings.key, v));
        match result {
            Ok(()) => {
                self.last_timestamp = Some(timestamp);
                tracing::trace!(timestamp, "session saved");
            }
            Err(e) => self.storage_fault("session write failed", e),
        }
    }

    /// Write now regardless of the throttle and restart its window.
    pub fn force_persist(&mut self, controller: &TrackListController, now: u64) {
        self.write(controller, now);
    }

    /// Forget the stored session and any pending resume.
    pub fn reset(&mut self) {
        self.ticket = None;
        self.fallback_at = None;
        self.scheduled = None;
        self.dirty = false;
        self.throttle.reset();
        if let Err(e) = self.storage.remove(&self.settings.key) {
            self.storage_fault("session reset failed", e);
        } else {
            tracing::info!("session reset");
        }
    }

    /// Final flush; clears every pending timer.
    pub fn shutdown(&mut self, controller: &TrackListController, now: u64) {
        self.force_persist(controller, now);
        self.ticket = None;
        self.fallback_at = None;
        self.scheduled = None;
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        SessionDiagnostics {
            state: self.state,
            armed_ticket: self.ticket.clone(),
            fallback_at: self.fallback_at,
            resume_at: self.scheduled.as_ref().map(|(at, _)| *at),
            last_persisted: self.last_timestamp,
            pending_write: self.dirty,
            storage_faults: self.storage_faults,
            last_error: self.last_error.clone(),
        }
    }
}
