use std::time::Duration;

/// A single playable item. A track with an empty `source_uri` is a demo
/// placeholder: it can be selected and "played" but produces no audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration_label: String,
    pub source_uri: String,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_label: impl Into<String>,
        source_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration_label: duration_label.into(),
            source_uri: source_uri.into(),
        }
    }

    /// A placeholder track with no playable audio.
    pub fn demo(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, "", "", "")
    }

    pub fn is_demo(&self) -> bool {
        self.source_uri.trim().is_empty()
    }
}

/// Ordered tracks; insertion order drives next/previous traversal.
pub type Playlist = Vec<Track>;

/// Format a duration as `m:ss`, rounding partial seconds down.
pub fn duration_label(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
