//! A terminal music player that remembers where you left off.
//!
//! The playback core is `audio::PlaybackEngine` (one audio output),
//! `tracklist::TrackListController` (playlist and selection policy) and
//! `session::PersistenceCoordinator` (throttled persistence and the
//! startup resume protocol), composed by `player::Player`.

pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod library;
pub mod notify;
pub mod player;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod throttle;
pub mod tracklist;
pub mod ui;
