use super::fake::FakeOutput;
use super::*;
use crate::error::PlayerError;
use crate::library::Track;

fn engine(output: &FakeOutput) -> PlaybackEngine {
    PlaybackEngine::new(Box::new(output.clone()), 250)
}

fn song(id: &str) -> Track {
    Track::new(id, id, "", "3:00", format!("/music/{id}.mp3"))
}

#[test]
fn set_volume_clamps_into_unit_range() {
    let out = FakeOutput::responsive();
    let mut e = engine(&out);
    assert_eq!(e.set_volume(-1.0), 0.0);
    assert_eq!(e.set_volume(2.0), 1.0);
    assert_eq!(e.set_volume(f32::NAN), 0.0);
    assert_eq!(e.set_volume(0.5), 0.5);
    assert_eq!(e.volume(), 0.5);
    assert_eq!(out.calls().last().map(String::as_str), Some("volume:0.5"));
}

#[test]
fn play_without_a_track_is_rejected() {
    let out = FakeOutput::responsive();
    let mut e = engine(&out);
    assert!(matches!(e.play(), Err(PlayerError::PlaybackRejected(_))));
    assert_eq!(out.count("start"), 0);
}

#[test]
fn demo_tracks_play_virtually() {
    let out = FakeOutput::responsive();
    let mut e = engine(&out);
    e.load(Track::demo("d", "Demo"));
    e.play().unwrap();

    assert!(e.is_playing());
    assert_eq!(out.count("set_source"), 0);
    assert_eq!(out.count("start"), 0);

    let events = e.poll(0);
    assert_eq!(events, vec![EngineEvent::PlayStateChanged(true)]);
    assert!(e.poll(1_000).is_empty());
}

#[test]
fn started_signal_for_a_superseded_play_is_ignored() {
    let out = FakeOutput::manual();
    let mut e = engine(&out);

    e.load(song("a"));
    e.play().unwrap();
    let stale = out.last_play().unwrap();

    e.load(song("b"));
    out.push(OutputSignal::Started { play: stale });
    let events = e.poll(0);

    assert!(!events.contains(&EngineEvent::PlayStateChanged(true)));
    assert!(!e.is_playing());
    assert_eq!(e.current().map(|t| t.id.as_str()), Some("b"));
}

#[test]
fn ended_from_an_older_load_is_ignored() {
    let out = FakeOutput::manual();
    let mut e = engine(&out);
    e.load(song("a"));
    let old = out.last_load().unwrap();
    e.load(song("b"));

    out.push(OutputSignal::Ended { load: old });
    assert!(!e.poll(0).contains(&EngineEvent::Ended));

    out.push(OutputSignal::Ended {
        load: out.last_load().unwrap(),
    });
    assert!(e.poll(0).contains(&EngineEvent::Ended));
}

#[test]
fn seek_waits_for_metadata_and_is_clamped() {
    let out = FakeOutput::manual();
    let mut e = engine(&out);
    e.load(song("a"));
    e.seek(42.0);

    assert!(out.seeks().is_empty());
    assert_eq!(e.position(), 42.0);

    out.push(OutputSignal::MetadataLoaded {
        load: out.last_load().unwrap(),
        duration: Some(30.0),
    });
    let events = e.poll(0);
    assert!(events.contains(&EngineEvent::MetadataLoaded(Some(30.0))));
    assert_eq!(out.seeks(), vec![30.0]);

    e.seek(-5.0);
    assert_eq!(out.seeks(), vec![30.0, 0.0]);
}

#[test]
fn seek_passes_through_when_duration_is_unknown() {
    let out = FakeOutput::manual();
    let mut e = engine(&out);
    e.load(song("a"));
    out.push(OutputSignal::MetadataLoaded {
        load: out.last_load().unwrap(),
        duration: None,
    });
    e.poll(0);
    e.seek(500.0);
    assert_eq!(out.seeks(), vec![500.0]);
}

#[test]
fn progress_events_are_limited_to_four_per_second() {
    let out = FakeOutput::responsive();
    let mut e = engine(&out);
    e.load(song("a"));
    e.play().unwrap();

    let mut progress = 0;
    for now in (0..1_000).step_by(10) {
        progress += e
            .poll(now)
            .iter()
            .filter(|ev| matches!(ev, EngineEvent::TimeAdvanced(_)))
            .count();
    }
    assert_eq!(progress, 4);
}

#[test]
fn open_failure_becomes_a_load_error() {
    let out = FakeOutput::responsive();
    out.state.borrow_mut().fail_open = true;
    let mut e = engine(&out);
    e.load(song("broken"));

    let events = e.poll(0);
    assert!(matches!(events.as_slice(), [EngineEvent::LoadError(_)]));
    assert!(!e.is_playing());
}

#[test]
fn rejected_start_is_reported_once() {
    let out = FakeOutput::responsive();
    out.state.borrow_mut().reject_starts = true;
    let mut e = engine(&out);
    e.load(song("a"));
    e.play().unwrap();

    let events = e.poll(0);
    assert!(events.contains(&EngineEvent::PlayRequested));
    assert!(
        events
            .iter()
            .any(|ev| matches!(ev, EngineEvent::PlayRejected(_)))
    );
    assert!(!e.is_playing());
    assert!(!e.is_starting());
}
