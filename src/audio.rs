//! Audio output and the playback engine.
//!
//! `PlaybackEngine` is the only owner of the `AudioOutput`. It turns
//! transport commands into output calls and normalizes whatever the output
//! reports into `EngineEvent`s, dropping results that belong to a request
//! that has since been superseded.

mod cues;
mod engine;
mod output;
mod sink;
mod types;

pub use cues::RodioCues;
pub use engine::PlaybackEngine;
pub use output::AudioOutput;
pub use sink::{RodioOutput, open_default_stream};
pub use types::{EngineEvent, OutputSignal, RequestId};

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
