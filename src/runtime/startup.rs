use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use crate::audio::{PlaybackEngine, RodioCues, RodioOutput, open_default_stream};
use crate::clock::SystemClock;
use crate::config::{self, Settings};
use crate::library::{PlaylistSchedule, Slot, scan};
use crate::notify::{Silent, SoundEffects, ToastQueue};
use crate::player::Player;
use crate::session::PersistenceCoordinator;
use crate::storage::{JsonFileStorage, MemoryStorage, Storage};
use crate::tracklist::{RestoredCursor, TrackListController};

/// Command line: `kawaii-player [DIR] [--reset] [--dump-config]`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Args {
    pub dir: Option<PathBuf>,
    pub reset: bool,
    pub dump_config: bool,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut out = Args::default();
        for arg in args {
            match arg.as_str() {
                "--reset" => out.reset = true,
                "--dump-config" => out.dump_config = true,
                _ if out.dir.is_none() => out.dir = Some(PathBuf::from(arg)),
                _ => {}
            }
        }
        out
    }

    pub fn library_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
        })
    }
}

/// Log to `<data_dir>/kawaii-player.log`; the terminal belongs to the UI.
pub fn init_tracing() {
    let Some(dir) = config::default_data_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("kawaii-player.log"))
    else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn open_storage(settings: &Settings) -> Box<dyn Storage> {
    match settings.storage_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "session store");
            Box::new(JsonFileStorage::new(path))
        }
        None => {
            tracing::warn!("no data directory, session will not survive a restart");
            Box::new(MemoryStorage::new())
        }
    }
}

pub fn build_player(settings: &Settings) -> Result<(Player, ToastQueue), Box<dyn std::error::Error>> {
    let stream = open_default_stream()?;

    let output = RodioOutput::new(stream.clone());
    let engine = PlaybackEngine::new(Box::new(output), settings.session.progress_interval_ms);
    let controller = TrackListController::new(
        engine,
        StdRng::from_os_rng(),
        settings.session.previous_restart_secs,
    );

    let toasts = ToastQueue::new(settings.ui.toast_ms);
    let coordinator = PersistenceCoordinator::new(
        open_storage(settings),
        Box::new(toasts.clone()),
        settings.session.clone(),
    );

    let effects: Box<dyn SoundEffects> = if settings.ui.sound_effects {
        Box::new(RodioCues::new(stream))
    } else {
        Box::new(Silent)
    };

    let player = Player::new(controller, coordinator, effects, Box::new(SystemClock));
    Ok((player, toasts))
}

/// Config defaults for a first launch; a stored session overrides them.
pub fn apply_playback_defaults(player: &mut Player, settings: &Settings) {
    player.apply_defaults(RestoredCursor {
        index: 0,
        volume: settings.playback.volume,
        is_shuffle: settings.playback.shuffle,
        repeat_mode: settings.playback.repeat_mode.into(),
    });
}

/// Directory to scan: the scheduled one when the schedule is on.
pub fn playlist_dir(schedule: &PlaylistSchedule, library_dir: &Path) -> (PathBuf, Option<Slot>) {
    if !schedule.enabled() {
        return (library_dir.to_path_buf(), None);
    }
    let slot = schedule.slot_now();
    (schedule.dir_for(slot, library_dir), Some(slot))
}

pub fn load_playlist(player: &mut Player, dir: &Path, settings: &Settings) {
    let tracks = scan(dir, &settings.library);
    if let Err(e) = player.set_playlist(tracks, false) {
        tracing::warn!(error = %e, dir = %dir.display(), "playlist rejected");
    }
}
