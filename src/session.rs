//! Durable playback sessions and the startup resume protocol.
//!
//! `PersistenceCoordinator` watches what the track list reports, keeps the
//! stored `PersistedSession` current without writing on every progress
//! tick, and on startup arms a one-shot `ResumeTicket` that the first user
//! interaction (or a fallback timer) turns into actual playback.

mod coordinator;
mod record;

pub use coordinator::*;
pub use record::PersistedSession;
