use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::audio::fake::FakeOutput;
use crate::audio::{EngineEvent, OutputSignal, PlaybackEngine};
use crate::error::PlayerError;
use crate::library::{Playlist, Track};

fn controller(out: &FakeOutput) -> TrackListController {
    let engine = PlaybackEngine::new(Box::new(out.clone()), 250);
    TrackListController::new(engine, StdRng::seed_from_u64(7), 3.0)
}

fn tracks(ids: &[&str]) -> Playlist {
    ids.iter()
        .map(|id| Track::new(*id, *id, "", "3:00", format!("/music/{id}.mp3")))
        .collect()
}

#[test]
fn play_track_at_moves_the_cursor() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    let ids = ["a", "b", "c", "d"];
    c.set_playlist(tracks(&ids), false).unwrap();
    for (i, id) in ids.iter().enumerate() {
        c.play_track_at(i, 0.0).unwrap();
        assert_eq!(c.cursor().current_index, i);
        assert_eq!(c.current_track().map(|t| t.id.as_str()), Some(*id));
    }
}

#[test]
fn play_track_at_rejects_out_of_range_and_keeps_state() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b"]), false).unwrap();
    c.play_track_at(1, 0.0).unwrap();

    assert_eq!(
        c.play_track_at(2, 0.0),
        Err(PlayerError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(c.cursor().current_index, 1);
}

#[test]
fn next_with_repeat_all_cycles_back_to_start() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b", "c", "d", "e"]), false).unwrap();
    c.cycle_repeat_mode();
    assert_eq!(c.cursor().repeat_mode, RepeatMode::All);
    c.play_track_at(2, 0.0).unwrap();

    for _ in 0..5 {
        c.next();
    }
    assert_eq!(c.cursor().current_index, 2);
}

#[test]
fn previous_steps_back_near_the_start_of_a_track() {
    let out = FakeOutput::manual();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b", "c"]), false).unwrap();

    c.play_track_at(1, 2.0).unwrap();
    c.previous();
    assert_eq!(c.cursor().current_index, 0);

    c.play_track_at(0, 3.0).unwrap();
    c.previous();
    assert_eq!(c.cursor().current_index, 2);
}

#[test]
fn previous_restarts_the_track_past_three_seconds() {
    let out = FakeOutput::manual();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b", "c"]), false).unwrap();

    c.play_track_at(1, 10.0).unwrap();
    c.previous();
    let cursor = c.cursor();
    assert_eq!(cursor.current_index, 1);
    assert_eq!(cursor.current_time, 0.0);
}

#[test]
fn volume_is_clamped_and_mute_restores_the_last_audible_level() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    assert_eq!(c.set_volume(-1.0), 0.0);
    assert_eq!(c.set_volume(2.0), 1.0);

    c.set_volume(0.5);
    c.set_volume(0.0);
    assert_eq!(c.toggle_mute(), 0.5);
    assert_eq!(c.cursor().volume, 0.5);

    assert_eq!(c.toggle_mute(), 0.0);
    assert_eq!(c.toggle_mute(), 0.5);
}

#[test]
fn repeat_none_stops_after_the_last_track() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b", "c"]), false).unwrap();
    c.play_track_at(0, 0.0).unwrap();
    c.poll(0);

    c.on_track_ended();
    c.on_track_ended();
    assert_eq!(c.cursor().current_index, 2);

    c.on_track_ended();
    let events = c.poll(10);
    assert!(events.contains(&TrackListEvent::Stopped));
    assert_eq!(c.cursor().current_index, 2);
    assert!(!c.is_active());

    c.on_track_ended();
    assert_eq!(c.cursor().current_index, 2);
    assert!(!c.is_active());
}

#[test]
fn repeat_one_replays_the_same_track_from_zero() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b"]), false).unwrap();
    c.cycle_repeat_mode();
    c.cycle_repeat_mode();
    assert_eq!(c.cursor().repeat_mode, RepeatMode::One);

    c.play_track_at(0, 0.0).unwrap();
    c.poll(0);
    out.set_position(120.0);
    assert_eq!(out.count("start"), 1);

    c.on_track_ended();
    let cursor = c.cursor();
    assert_eq!(cursor.current_index, 0);
    assert_eq!(cursor.current_time, 0.0);
    assert_eq!(out.count("start"), 2);
}

#[test]
fn ended_signal_from_the_output_advances_the_playlist() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b"]), false).unwrap();
    c.play_track_at(0, 0.0).unwrap();
    c.poll(0);

    out.push(OutputSignal::Ended {
        load: out.last_load().unwrap(),
    });
    let events = c.poll(100);
    assert!(events.contains(&TrackListEvent::Engine(EngineEvent::Ended)));
    assert!(events.contains(&TrackListEvent::TrackChanged { index: 1 }));
    assert_eq!(c.cursor().current_index, 1);
}

#[test]
fn set_playlist_only_plays_when_asked_or_already_playing() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);

    c.set_playlist(tracks(&["p", "q"]), false).unwrap();
    assert_eq!(c.cursor().current_index, 0);
    assert_eq!(out.count("start"), 0);
    assert!(!c.is_active());

    c.set_playlist(tracks(&["p", "q"]), true).unwrap();
    assert_eq!(out.count("start"), 1);
    assert!(c.is_active());
    c.poll(0);
    assert!(c.is_playing());

    // already playing: the replacement keeps the music going
    c.play_track_at(1, 0.0).unwrap();
    c.poll(10);
    c.set_playlist(tracks(&["x", "y", "z"]), false).unwrap();
    assert_eq!(c.cursor().current_index, 0);
    assert_eq!(c.current_track().map(|t| t.id.as_str()), Some("x"));
    assert!(c.is_active());
}

#[test]
fn invalid_playlists_are_rejected_without_side_effects() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b"]), false).unwrap();
    c.play_track_at(1, 0.0).unwrap();

    let dup = tracks(&["x", "x"]);
    assert!(matches!(
        c.set_playlist(dup, true),
        Err(PlayerError::InvalidPlaylist(_))
    ));
    let mut blank = tracks(&["x"]);
    blank[0].id = " ".into();
    assert!(c.set_playlist(blank, true).is_err());

    assert_eq!(c.playlist().len(), 2);
    assert_eq!(c.cursor().current_index, 1);
}

#[test]
fn empty_playlist_makes_transport_a_no_op() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(Vec::new(), true).unwrap();
    let before = c.cursor();

    c.play();
    c.pause();
    c.next();
    c.previous();
    c.on_track_ended();
    assert_eq!(c.play_track_at(5, 0.0), Ok(()));

    assert_eq!(c.cursor(), before);
    assert_eq!(out.count("set_source"), 0);
    assert_eq!(out.count("start"), 0);
}

#[test]
fn shuffle_never_repeats_the_current_track() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b", "c", "d"]), false).unwrap();
    c.toggle_shuffle();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..50 {
        let before = c.cursor().current_index;
        c.next();
        let after = c.cursor().current_index;
        assert_ne!(before, after);
        seen.insert(after);
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn shuffle_with_one_track_stays_put() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["solo"]), false).unwrap();
    c.toggle_shuffle();
    c.next();
    c.previous();
    assert_eq!(c.cursor().current_index, 0);
}

#[test]
fn repeat_mode_cycles_through_all_three() {
    assert_eq!(RepeatMode::None.cycle(), RepeatMode::All);
    assert_eq!(RepeatMode::All.cycle(), RepeatMode::One);
    assert_eq!(RepeatMode::One.cycle(), RepeatMode::None);
}

#[test]
fn restore_clamps_index_and_does_not_play() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["a", "b", "c"]), false).unwrap();
    c.restore(RestoredCursor {
        index: 9,
        volume: 0.3,
        is_shuffle: true,
        repeat_mode: RepeatMode::All,
    });

    let cursor = c.cursor();
    assert_eq!(cursor.current_index, 2);
    assert_eq!(cursor.volume, 0.3);
    assert!(cursor.is_shuffle);
    assert_eq!(cursor.repeat_mode, RepeatMode::All);
    assert_eq!(out.count("start"), 0);
}

#[test]
fn single_track_transport_keeps_replaying_it() {
    let out = FakeOutput::responsive();
    let mut c = controller(&out);
    c.set_playlist(tracks(&["solo"]), false).unwrap();
    c.cycle_repeat_mode();
    assert_eq!(c.cursor().repeat_mode, RepeatMode::All);

    c.next();
    c.poll(0);
    c.previous();
    c.poll(100);
    c.on_track_ended();
    c.poll(200);

    assert_eq!(c.cursor().current_index, 0);
    assert_eq!(out.count("start"), 3);
    assert!(c.is_playing());
}
