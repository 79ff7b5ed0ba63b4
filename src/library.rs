//! Track model, library scanning and the time-of-day playlist schedule.
//!
//! `scan` walks a directory into a `Playlist`; `PlaylistSchedule` decides
//! which directory should be feeding the player at a given local time.

mod display;
mod model;
mod scan;
mod schedule;

pub use display::{format_mmss, now_playing_text};
pub use model::{Playlist, Track, duration_label};
pub use scan::scan;
pub use schedule::{PlaylistSchedule, Slot};
