//! rodio-backed `AudioOutput`.
//!
//! One `Sink` per loaded source. Seeking prefers `Sink::try_seek`; formats
//! that cannot seek in place are reopened and fast-forwarded with
//! `Source::skip_duration` instead.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::output::AudioOutput;
use super::types::{OutputSignal, RequestId};
use crate::error::OutputError;

/// Open the default device. Shared by the player output and the sound cues.
pub fn open_default_stream() -> Result<Rc<OutputStream>, OutputError> {
    let mut stream =
        OutputStreamBuilder::open_default_stream().map_err(|e| OutputError::Device(e.to_string()))?;
    // rodio logs to stderr when OutputStream is dropped, which tears the TUI.
    stream.log_on_drop(false);
    Ok(Rc::new(stream))
}

fn decode(uri: &str) -> Result<Decoder<BufReader<File>>, OutputError> {
    let file = File::open(uri).map_err(|source| OutputError::Open {
        path: uri.to_string(),
        source,
    })?;
    let len = file.metadata().map(|m| m.len()).ok();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_seekable(true);
    if let Some(len) = len {
        builder = builder.with_byte_len(len);
    }
    builder
        .build()
        .map_err(|e| OutputError::Decode(format!("{uri}: {e}")))
}

/// Some decoders (VBR mp3 without a header) do not know their length.
fn probe_duration(uri: &str) -> Option<f64> {
    lofty::read_from_path(Path::new(uri))
        .ok()
        .map(|f| f.properties().duration().as_secs_f64())
        .filter(|d| *d > 0.0)
}

/// A drained sink accepts `try_seek` without moving, so a finished source
/// has to be rebuilt instead.
fn can_seek_in_place(sink: &Sink) -> bool {
    !sink.empty()
}

pub struct RodioOutput {
    stream: Rc<OutputStream>,
    sink: Option<Sink>,
    uri: Option<String>,
    load: Option<RequestId>,
    volume: f32,
    started: bool,
    ended_sent: bool,
    signals: Vec<OutputSignal>,
}

impl RodioOutput {
    pub fn new(stream: Rc<OutputStream>) -> Self {
        Self {
            stream,
            sink: None,
            uri: None,
            load: None,
            volume: 1.0,
            started: false,
            ended_sent: false,
            signals: Vec::new(),
        }
    }

    fn new_sink(&self, source: Decoder<BufReader<File>>, start_at: Duration) -> Sink {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        // `skip_duration` is the fallback seek; Duration::ZERO is fine.
        sink.append(source.skip_duration(start_at));
        sink.pause();
        sink
    }

    fn reopen_at(&mut self, at: Duration) -> Result<(), OutputError> {
        let uri = self.uri.clone().ok_or(OutputError::NoSource)?;
        let source = decode(&uri)?;
        let sink = self.new_sink(source, at);
        if self.started {
            sink.play();
        }
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        Ok(())
    }
}

impl AudioOutput for RodioOutput {
    fn set_source(&mut self, uri: &str, load: RequestId) -> Result<(), OutputError> {
        self.clear();

        let source = decode(uri)?;
        let duration = source
            .total_duration()
            .map(|d| d.as_secs_f64())
            .or_else(|| probe_duration(uri));

        self.sink = Some(self.new_sink(source, Duration::ZERO));
        self.uri = Some(uri.to_string());
        self.load = Some(load);
        self.signals
            .push(OutputSignal::MetadataLoaded { load, duration });
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.uri = None;
        self.load = None;
        self.started = false;
        self.ended_sent = false;
    }

    fn start(&mut self, play: RequestId) {
        match &self.sink {
            Some(sink) => {
                sink.play();
                self.started = true;
                self.signals.push(OutputSignal::Started { play });
            }
            None => self.signals.push(OutputSignal::Rejected {
                play,
                reason: OutputError::NoSource.to_string(),
            }),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.started = false;
    }

    fn seek(&mut self, secs: f64) -> Result<(), OutputError> {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        let at = Duration::from_secs_f64(secs);
        let sink = self.sink.as_ref().ok_or(OutputError::NoSource)?;

        let in_place = if can_seek_in_place(sink) {
            match sink.try_seek(at) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "in-place seek failed, reopening source");
                    false
                }
            }
        } else {
            tracing::debug!("source finished, reopening to seek");
            false
        };
        if !in_place {
            self.reopen_at(at)
                .map_err(|e| OutputError::Seek(e.to_string()))?;
        }
        self.ended_sent = false;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn position(&self) -> f64 {
        self.sink
            .as_ref()
            .map(|s| s.get_pos().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn poll(&mut self) -> Vec<OutputSignal> {
        if let (Some(sink), Some(load)) = (&self.sink, self.load) {
            if self.started && !self.ended_sent && sink.empty() {
                self.ended_sent = true;
                self.started = false;
                self.signals.push(OutputSignal::Ended { load });
            }
        }
        std::mem::take(&mut self.signals)
    }
}

#[cfg(test)]
mod tests {
    use rodio::Sink;
    use rodio::source::SineWave;

    use super::can_seek_in_place;

    #[test]
    fn drained_sink_is_reopened_for_seeks() {
        let (sink, _queue) = Sink::new();
        assert!(!can_seek_in_place(&sink));

        sink.append(SineWave::new(440.0));
        assert!(can_seek_in_place(&sink));
    }
}
