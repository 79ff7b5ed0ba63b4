//! Identifiers, output signals and engine events.

/// Identifies one `load` or `play` request. Ids only ever grow, so a
/// signal carrying an older id than the engine's current one is stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// What an `AudioOutput` reports back, tagged with the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSignal {
    /// The source is ready; `duration` is `None` when the format cannot tell.
    MetadataLoaded {
        load: RequestId,
        duration: Option<f64>,
    },
    LoadFailed {
        load: RequestId,
        reason: String,
    },
    /// A `start` request actually began producing sound.
    Started { play: RequestId },
    /// A `start` request was refused.
    Rejected { play: RequestId, reason: String },
    Ended { load: RequestId },
    /// The source ran dry without ending (slow disk, network mount).
    Stalled { load: RequestId },
    Recovered { load: RequestId },
}

/// Normalized events raised by `PlaybackEngine::poll` and its commands.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A play request is in flight.
    PlayRequested,
    PlayStateChanged(bool),
    /// Current position in seconds; rate limited.
    TimeAdvanced(f64),
    MetadataLoaded(Option<f64>),
    Ended,
    LoadError(String),
    PlayRejected(String),
    Stalled,
    Recovered,
}
