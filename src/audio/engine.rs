use super::output::AudioOutput;
use super::types::{EngineEvent, OutputSignal, RequestId};
use crate::error::PlayerError;
use crate::library::Track;
use crate::throttle::Throttle;

pub struct PlaybackEngine {
    output: Box<dyn AudioOutput>,
    current: Option<Track>,
    next_id: u64,
    load_id: Option<RequestId>,
    pending_play: Option<RequestId>,
    metadata_ready: bool,
    duration: Option<f64>,
    pending_seek: Option<f64>,
    playing: bool,
    volume: f32,
    progress: Throttle,
    events: Vec<EngineEvent>,
}

impl PlaybackEngine {
    pub fn new(output: Box<dyn AudioOutput>, progress_interval_ms: u64) -> Self {
        Self {
            output,
            current: None,
            next_id: 0,
            load_id: None,
            pending_play: None,
            metadata_ready: false,
            duration: None,
            pending_seek: None,
            playing: false,
            volume: 1.0,
            progress: Throttle::new(progress_interval_ms),
            events: Vec::new(),
        }
    }

    fn issue(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True while a play request is waiting for the output to answer.
    pub fn is_starting(&self) -> bool {
        self.pending_play.is_some()
    }

    pub fn in_flight_play(&self) -> Option<RequestId> {
        self.pending_play
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Position in seconds. A seek still waiting for metadata counts as the
    /// position, so callers see where playback is about to start.
    pub fn position(&self) -> f64 {
        match (&self.current, self.pending_seek) {
            (None, _) => 0.0,
            (Some(_), Some(at)) => at,
            (Some(t), None) if t.is_demo() => 0.0,
            (Some(_), None) => self.output.position(),
        }
    }

    /// Make `track` the active source. Supersedes any in-flight load or play.
    /// Demo tracks never reach the output.
    pub fn load(&mut self, track: Track) {
        if self.playing || self.pending_play.is_some() {
            self.output.pause();
        }
        self.playing = false;
        self.pending_play = None;
        self.pending_seek = None;
        self.duration = None;
        self.metadata_ready = false;
        self.progress.reset();

        let id = self.issue();
        self.load_id = Some(id);

        if track.is_demo() {
            self.output.clear();
            tracing::debug!(id = %track.id, "loaded demo track");
        } else if let Err(e) = self.output.set_source(&track.source_uri, id) {
            tracing::warn!(id = %track.id, error = %e, "load failed");
            self.events.push(EngineEvent::LoadError(e.to_string()));
        } else {
            self.output.set_volume(self.volume);
        }
        self.current = Some(track);
    }

    /// Ask the output to start. The answer arrives through `poll`.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        let demo = match &self.current {
            None => {
                let reason = "nothing is loaded".to_string();
                self.events.push(EngineEvent::PlayRejected(reason.clone()));
                return Err(PlayerError::PlaybackRejected(reason));
            }
            Some(t) => t.is_demo(),
        };

        if demo {
            if !self.playing {
                self.playing = true;
                self.events.push(EngineEvent::PlayStateChanged(true));
            }
            return Ok(());
        }
        if self.playing {
            return Ok(());
        }

        let id = self.issue();
        self.pending_play = Some(id);
        self.events.push(EngineEvent::PlayRequested);
        self.output.start(id);
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.current.is_none() {
            return;
        }
        let demo = self.current.as_ref().is_some_and(Track::is_demo);
        if !demo {
            self.output.pause();
        }
        self.pending_play = None;
        self.playing = false;
        self.events.push(EngineEvent::PlayStateChanged(false));
    }

    /// Clamped to `[0, duration]` when the duration is known. Before the
    /// metadata arrives the seek is queued and applied then.
    pub fn seek(&mut self, secs: f64) {
        let Some(track) = &self.current else {
            return;
        };
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        if track.is_demo() {
            return;
        }
        if !self.metadata_ready {
            self.pending_seek = Some(secs);
            return;
        }
        let target = match self.duration {
            Some(d) => secs.min(d),
            None => secs,
        };
        if let Err(e) = self.output.seek(target) {
            tracing::warn!(error = %e, "seek failed");
        }
        self.progress.reset();
    }

    /// Returns the effective volume.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let v = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume = v;
        self.output.set_volume(v);
        v
    }

    fn is_current_load(&self, load: RequestId) -> bool {
        self.load_id == Some(load)
    }

    fn apply(&mut self, signal: OutputSignal) {
        match signal {
            OutputSignal::MetadataLoaded { load, duration } if self.is_current_load(load) => {
                self.metadata_ready = true;
                self.duration = duration;
                self.events.push(EngineEvent::MetadataLoaded(duration));
                if let Some(at) = self.pending_seek.take() {
                    self.seek(at);
                }
            }
            OutputSignal::LoadFailed { load, reason } if self.is_current_load(load) => {
                tracing::warn!(%reason, "source failed");
                self.pending_play = None;
                self.pending_seek = None;
                self.playing = false;
                self.events.push(EngineEvent::LoadError(reason));
            }
            OutputSignal::Started { play } if self.pending_play == Some(play) => {
                self.pending_play = None;
                self.playing = true;
                self.progress.reset();
                self.events.push(EngineEvent::PlayStateChanged(true));
            }
            OutputSignal::Rejected { play, reason } if self.pending_play == Some(play) => {
                tracing::warn!(%reason, "play rejected");
                self.pending_play = None;
                self.playing = false;
                self.events.push(EngineEvent::PlayRejected(reason));
            }
            OutputSignal::Ended { load } if self.is_current_load(load) => {
                self.playing = false;
                self.events.push(EngineEvent::Ended);
            }
            OutputSignal::Stalled { load } if self.is_current_load(load) => {
                self.events.push(EngineEvent::Stalled);
            }
            OutputSignal::Recovered { load } if self.is_current_load(load) => {
                self.events.push(EngineEvent::Recovered);
            }
            stale => tracing::debug!(?stale, "dropping stale output signal"),
        }
    }

    /// Events raised by commands since the last drain, without polling the output.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain output signals and emit at most one progress event per interval.
    pub fn poll(&mut self, now: u64) -> Vec<EngineEvent> {
        for signal in self.output.poll() {
            self.apply(signal);
        }

        let real = self.current.as_ref().is_some_and(|t| !t.is_demo());
        if self.playing && real && self.progress.try_acquire(now) {
            let pos = self.output.position();
            self.events.push(EngineEvent::TimeAdvanced(pos));
        }
        std::mem::take(&mut self.events)
    }
}
