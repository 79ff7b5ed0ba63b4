//! Scripted `AudioOutput` for tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::output::AudioOutput;
use super::types::{OutputSignal, RequestId};
use crate::error::OutputError;

#[derive(Debug, Default)]
pub struct FakeState {
    pub calls: Vec<String>,
    pub position: f64,
    pub duration: Option<f64>,
    /// Answer `set_source` with `MetadataLoaded` on the next poll.
    pub auto_metadata: bool,
    /// Answer `start` with `Started` on the next poll.
    pub auto_start: bool,
    pub reject_starts: bool,
    pub fail_open: bool,
    pub queued: Vec<OutputSignal>,
    pub last_load: Option<RequestId>,
    pub last_play: Option<RequestId>,
}

#[derive(Debug, Clone)]
pub struct FakeOutput {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeOutput {
    /// Answers every request on the next poll; tracks are three minutes long.
    pub fn responsive() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                duration: Some(180.0),
                auto_metadata: true,
                auto_start: true,
                ..FakeState::default()
            })),
        }
    }

    /// Never answers on its own; tests push signals by hand.
    pub fn manual() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState::default())),
        }
    }

    pub fn push(&self, signal: OutputSignal) {
        self.state.borrow_mut().queued.push(signal);
    }

    pub fn set_position(&self, secs: f64) {
        self.state.borrow_mut().position = secs;
    }

    pub fn last_load(&self) -> Option<RequestId> {
        self.state.borrow().last_load
    }

    pub fn last_play(&self) -> Option<RequestId> {
        self.state.borrow().last_play
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix("seek:"))
            .filter_map(|s| s.parse().ok())
            .collect()
    }
}

impl AudioOutput for FakeOutput {
    fn set_source(&mut self, uri: &str, load: RequestId) -> Result<(), OutputError> {
        let mut s = self.state.borrow_mut();
        s.calls.push(format!("set_source:{uri}"));
        if s.fail_open {
            return Err(OutputError::Decode(uri.to_string()));
        }
        s.last_load = Some(load);
        s.position = 0.0;
        if s.auto_metadata {
            let duration = s.duration;
            s.queued.push(OutputSignal::MetadataLoaded { load, duration });
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.state.borrow_mut().calls.push("clear".into());
    }

    fn start(&mut self, play: RequestId) {
        let mut s = self.state.borrow_mut();
        s.calls.push("start".into());
        s.last_play = Some(play);
        if s.reject_starts {
            s.queued.push(OutputSignal::Rejected {
                play,
                reason: "autoplay blocked".into(),
            });
        } else if s.auto_start {
            s.queued.push(OutputSignal::Started { play });
        }
    }

    fn pause(&mut self) {
        self.state.borrow_mut().calls.push("pause".into());
    }

    fn seek(&mut self, secs: f64) -> Result<(), OutputError> {
        let mut s = self.state.borrow_mut();
        s.calls.push(format!("seek:{secs}"));
        s.position = secs;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().calls.push(format!("volume:{volume}"));
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn poll(&mut self) -> Vec<OutputSignal> {
        std::mem::take(&mut self.state.borrow_mut().queued)
    }
}
