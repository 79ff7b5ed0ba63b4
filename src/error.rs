//! Error types shared by the playback core and its collaborators.

use thiserror::Error;

/// Errors surfaced by the playback core.
///
/// Only `IndexOutOfRange` and `InvalidPlaylist` are returned synchronously to
/// callers; the remaining kinds describe failures that the core reports through
/// events and advisories instead of propagating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("track index {index} is out of range for a playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid playlist: {0}")]
    InvalidPlaylist(String),

    /// The output refused to start, usually because nothing is loaded.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    #[error("could not load track: {0}")]
    LoadFailed(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Errors raised by a `Storage` backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt storage payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by an `AudioOutput`.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {0}")]
    Decode(String),

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("no source loaded")]
    NoSource,

    #[error("no audio device: {0}")]
    Device(String),
}

impl From<StorageError> for PlayerError {
    fn from(e: StorageError) -> Self {
        PlayerError::StorageUnavailable(e.to_string())
    }
}
