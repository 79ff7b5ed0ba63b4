//! UI rendering helpers for the terminal user interface.
//!
//! Pure view layer: reads the player and a small `View` of cursor/overlay
//! state, never mutates playback.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::config::UiSettings;
use crate::library::{format_mmss, now_playing_text};
use crate::player::{Diagnostics, Player};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", "seek -/+10s"),
    ("+/-", "volume"),
    ("m", "mute"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("d", "diagnostics"),
    ("q", "quit"),
];

/// Selection and overlay state owned by the event loop.
#[derive(Debug, Default, Clone)]
pub struct View {
    pub selected: usize,
    pub show_diagnostics: bool,
    pub toast: Option<String>,
    /// Active schedule slot, when the schedule is enabled.
    pub slot: Option<&'static str>,
    pub dir: String,
}

impl View {
    pub fn down(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn top(&mut self) {
        self.selected = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn status_text(player: &Player, view: &View) -> String {
    let controller = player.controller();
    let cursor = controller.cursor();
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("STATE: {}", player.coordinator().state()));
    match controller.current_track() {
        Some(track) => {
            let time = match controller.engine().duration() {
                Some(total) => format!(
                    "{}/{}",
                    format_mmss(cursor.current_time),
                    format_mmss(total)
                ),
                None => format_mmss(cursor.current_time),
            };
            parts.push(format!("Song: {} [{}]", now_playing_text(track), time));
        }
        None => parts.push("No tracks".to_string()),
    }
    parts.push(format!("Repeat: {}", cursor.repeat_mode.label()));
    parts.push(format!(
        "Shuffle: {}",
        if cursor.is_shuffle { "ON" } else { "OFF" }
    ));
    if cursor.volume <= 0.0 {
        parts.push("Vol: muted".to_string());
    } else {
        parts.push(format!("Vol: {:.0}%", cursor.volume * 100.0));
    }
    if let Some(slot) = view.slot {
        parts.push(format!("Mood: {slot}"));
    }
    if !view.dir.is_empty() {
        parts.push(format!("Dir: {}", view.dir));
    }
    parts.join(" • ")
}

fn diagnostics_text(d: &Diagnostics) -> String {
    let s = &d.session;
    let opt = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "state: {}\nticket: {}\nfallback at: {}\nresume at: {}\nlast saved: {}\npending write: {}\nstorage faults: {}\nlast error: {}\nin-flight play: {}\nautoplay at: {}\ncursor: #{} @ {:.1}s of {}",
        s.state,
        s.armed_ticket
            .as_ref()
            .map_or_else(|| "-".to_string(), |t| format!("#{} @ {:.1}s", t.index, t.time)),
        opt(s.fallback_at),
        opt(s.resume_at),
        opt(s.last_persisted),
        s.pending_write,
        s.storage_faults,
        s.last_error
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string),
        d.in_flight_play
            .map_or_else(|| "-".to_string(), |id| id.0.to_string()),
        opt(d.autoplay_at),
        d.cursor.current_index,
        d.cursor.current_time,
        d.playlist_len,
    )
}

/// Window of `height` rows around `selected`, as `(start, end, selected_in_window)`.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, player: &Player, view: &View, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" kawaii-player ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(player, view))
        .slow_blink()
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Track list
    {
        let controller = player.controller();
        let tracks = controller.playlist();
        let playing_index = controller.cursor().current_index;
        let (start, end, selected_in_window) =
            visible_window(tracks.len(), view.selected, chunks[2].height as usize);

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let marker = if start + offset == playing_index {
                    "♪ "
                } else {
                    "  "
                };
                let label = if track.duration_label.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", track.duration_label)
                };
                ListItem::new(format!("{marker}{}{label}", now_playing_text(track)))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !tracks.is_empty() {
            state.select(Some(selected_in_window));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    if view.show_diagnostics {
        let area = centered_rect_sized(60, 13, chunks[2]);
        frame.render_widget(Clear, area);
        let text = diagnostics_text(&player.diagnostics());
        let popup = Paragraph::new(text)
            .block(padded(" diagnostics (d closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, area);
    }

    if let Some(toast) = &view.toast {
        let area = centered_rect_sized(toast.chars().count() as u16 + 4, 3, chunks[2]);
        let area = Rect {
            y: chunks[2].y + chunks[2].height.saturating_sub(area.height + 1),
            ..area
        };
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(toast.as_str())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(popup, area);
    }

    let footer = Paragraph::new(controls_text())
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
