use super::model::Track;

/// "Artist - Title", or just the title when the artist is blank.
pub fn now_playing_text(track: &Track) -> String {
    let title = if track.title.trim().is_empty() {
        "Unknown"
    } else {
        track.title.trim()
    };
    match track.artist.trim() {
        "" => title.to_string(),
        artist => format!("{artist} - {title}"),
    }
}

/// Format seconds as `mm:ss`. Negative and non-finite values render as `00:00`.
pub fn format_mmss(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
