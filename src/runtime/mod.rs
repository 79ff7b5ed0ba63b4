use std::env;

use crossterm::event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::library::PlaylistSchedule;
use crate::ui::View;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = startup::Args::parse(env::args().skip(1));
    startup::init_tracing();
    let settings = settings::load_settings();

    if args.dump_config {
        println!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    let library_dir = args.library_dir();
    let schedule = PlaylistSchedule::new(settings.schedule.clone());
    let (dir, slot) = startup::playlist_dir(&schedule, &library_dir);

    let (mut player, toasts) = startup::build_player(&settings)?;
    startup::apply_playback_defaults(&mut player, &settings);
    startup::load_playlist(&mut player, &dir, &settings);

    if args.reset {
        player.reset();
    }
    player.init(settings.playback.autoplay);

    let mut view = View {
        selected: player.controller().cursor().current_index,
        slot: slot.map(|s| s.label()),
        dir: dir.display().to_string(),
        ..View::default()
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state =
            event_loop::EventLoopState::new(schedule, slot, library_dir, player.now());
        event_loop::run(&mut terminal, &settings, &mut player, &toasts, &mut view, &mut state)
    })();

    player.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    run_result
}
