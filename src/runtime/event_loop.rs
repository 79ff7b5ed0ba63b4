use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config;
use crate::library::{PlaylistSchedule, Slot};
use crate::notify::ToastQueue;
use crate::player::Player;
use crate::runtime::startup;
use crate::session::Interaction;
use crate::tracklist::TrackListEvent;
use crate::ui::{self, View};

const SEEK_STEP_SECS: f64 = 10.0;
const VOLUME_STEP: f32 = 0.05;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pub schedule: PlaylistSchedule,
    pub slot: Option<Slot>,
    pub library_dir: PathBuf,
    last_schedule_check: u64,
}

impl EventLoopState {
    pub fn new(schedule: PlaylistSchedule, slot: Option<Slot>, library_dir: PathBuf, now: u64) -> Self {
        Self {
            pending_gg: false,
            schedule,
            slot,
            library_dir,
            last_schedule_check: now,
        }
    }
}

/// Main terminal event loop: input, ticking the player, schedule checks and
/// drawing. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut Player,
    toasts: &ToastQueue,
    view: &mut View,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for e in player.tick() {
            // Keep the selection on the playing track.
            if let TrackListEvent::TrackChanged { index } = e {
                view.selected = index;
            }
        }

        let now = player.now();
        check_schedule(settings, player, view, state, now);
        view.toast = toasts.current(now);

        terminal.draw(|f| ui::draw(f, player, view, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    player.interaction(Interaction::KeyDown);
                    if handle_key_event(key, player, view, state) {
                        player.force_persist();
                        break;
                    }
                }
                Event::Mouse(m) if matches!(m.kind, MouseEventKind::Down(_)) => {
                    player.interaction(Interaction::PointerDown);
                }
                // The terminal going to the background is our page-hide.
                Event::FocusLost => player.force_persist(),
                _ => {}
            }
        }
    }

    Ok(())
}

fn check_schedule(
    settings: &config::Settings,
    player: &mut Player,
    view: &mut View,
    state: &mut EventLoopState,
    now: u64,
) {
    if !state.schedule.enabled() {
        return;
    }
    let interval = state.schedule.check_interval_secs().saturating_mul(1_000);
    if now.saturating_sub(state.last_schedule_check) < interval {
        return;
    }
    state.last_schedule_check = now;

    let slot = state.schedule.slot_now();
    if Some(slot) == state.slot {
        return;
    }
    tracing::info!(from = ?state.slot, to = ?slot, "schedule slot changed");
    let dir = state.schedule.dir_for(slot, &state.library_dir);
    startup::load_playlist(player, &dir, settings);
    state.slot = Some(slot);
    view.slot = Some(slot.label());
    view.dir = dir.display().to_string();
    view.selected = 0;
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    player: &mut Player,
    view: &mut View,
    state: &mut EventLoopState,
) -> bool {
    let len = player.controller().playlist().len();
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => view.down(len),
        KeyCode::Char('k') | KeyCode::Up => view.up(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                view.top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => view.bottom(len),
        KeyCode::Enter => {
            if let Err(e) = player.play_track_at(view.selected, 0.0) {
                tracing::warn!(error = %e, "cannot play selection");
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => player.toggle_play(),
        KeyCode::Char('l') => player.next(),
        KeyCode::Char('h') => player.previous(),
        KeyCode::Char('L') => player.seek_by(SEEK_STEP_SECS),
        KeyCode::Char('H') => player.seek_by(-SEEK_STEP_SECS),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = player.controller().cursor().volume;
            player.set_volume(v + VOLUME_STEP);
        }
        KeyCode::Char('-') => {
            let v = player.controller().cursor().volume;
            player.set_volume(v - VOLUME_STEP);
        }
        KeyCode::Char('m') => {
            player.toggle_mute();
        }
        KeyCode::Char('s') => player.toggle_shuffle(),
        KeyCode::Char('r') => player.cycle_repeat_mode(),
        KeyCode::Char('d') => view.show_diagnostics = !view.show_diagnostics,
        _ => {}
    }
    false
}
