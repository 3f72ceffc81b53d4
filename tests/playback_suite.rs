use lounge_viz::media::{MediaKind, PlaylistItem};
use lounge_viz::platform::{MediaBackend, SimulatedBackend, SimulatedOptions};
use lounge_viz::playback::{PlaybackState, Player, DEFAULT_VOLUME};
use lounge_viz::spectrum::SpectrumInput;

fn audio(name: &str) -> PlaylistItem {
    PlaylistItem::new(name, format!("{name}.mp3"), MediaKind::Audio)
}

fn player() -> Player<SimulatedBackend> {
    Player::new(SimulatedBackend::new(SimulatedOptions::default()))
}

fn player_with(opts: SimulatedOptions) -> Player<SimulatedBackend> {
    Player::new(SimulatedBackend::new(opts))
}

fn active_name<B: MediaBackend>(p: &Player<B>) -> Option<&str> {
    p.active_item().map(|i| i.name.as_str())
}

// ── State machine ───────────────────────────────────────────────────────────

#[test]
fn first_item_loads_and_plays() {
    let mut p = player();
    assert_eq!(p.state(), PlaybackState::Empty);

    p.add_item(audio("a"));
    assert_eq!(p.state(), PlaybackState::Loaded { index: 0 });
    assert_eq!(active_name(&p), Some("a"));
    assert!(p.is_playing());
    assert!(p.backend().is_playing());
}

#[test]
fn adding_more_items_keeps_the_active_one() {
    let mut p = player();
    p.add_item(audio("a"));
    p.add_item(audio("b"));
    assert_eq!(p.state(), PlaybackState::Loaded { index: 0 });
    assert_eq!(p.len(), 2);
}

#[test]
fn next_advances_and_wraps() {
    let mut p = player();
    p.add_item(audio("a"));
    p.add_item(audio("b"));

    p.next();
    assert_eq!(active_name(&p), Some("b"));
    p.next();
    assert_eq!(active_name(&p), Some("a"));
}

#[test]
fn prev_wraps_to_the_last_item() {
    let mut p = player();
    for n in ["a", "b", "c"] {
        p.add_item(audio(n));
    }
    p.prev();
    assert_eq!(p.state(), PlaybackState::Loaded { index: 2 });
    p.prev();
    assert_eq!(active_name(&p), Some("b"));
}

#[test]
fn removing_active_item_stops_and_shifts() {
    let mut p = player();
    p.add_item(audio("a"));
    p.add_item(audio("b"));
    assert!(p.is_playing());

    p.remove_index(0);
    assert!(!p.is_playing());
    assert!(!p.backend().is_playing());
    assert_eq!(p.state(), PlaybackState::Loaded { index: 0 });
    assert_eq!(active_name(&p), Some("b"));
    assert_eq!(p.backend().released(), &["a.mp3".to_string()]);
}

#[test]
fn removing_last_active_item_clamps_index() {
    let mut p = player();
    for n in ["a", "b", "c"] {
        p.add_item(audio(n));
    }
    p.select_index(2);
    p.remove_index(2);
    assert_eq!(p.state(), PlaybackState::Loaded { index: 1 });
    assert_eq!(active_name(&p), Some("b"));
}

#[test]
fn removing_item_before_active_keeps_the_same_item() {
    let mut p = player();
    for n in ["a", "b", "c"] {
        p.add_item(audio(n));
    }
    p.select_index(2);
    p.remove_index(0);
    assert_eq!(p.state(), PlaybackState::Loaded { index: 1 });
    assert_eq!(active_name(&p), Some("c"));
    assert!(p.is_playing());
}

#[test]
fn removing_only_item_empties_the_session() {
    let mut p = player();
    p.add_item(audio("a"));
    p.remove_index(0);
    assert_eq!(p.state(), PlaybackState::Empty);
    assert!(p.active_item().is_none());
    assert!(p.backend().connected_sources().is_empty());
}

#[test]
fn out_of_bounds_select_and_remove_are_noops() {
    let mut p = player();
    p.add_item(audio("a"));
    p.add_item(audio("b"));
    let before = p.state();
    let attached = p.backend().current_source();

    for i in [2usize, 3, usize::MAX] {
        p.select_index(i);
        assert_eq!(p.state(), before);
        p.remove_index(i);
        assert_eq!(p.state(), before);
        assert_eq!(p.len(), 2);
    }
    assert_eq!(p.backend().current_source(), attached);
}

#[test]
fn empty_playlist_operations_do_nothing() {
    let mut p = player();
    p.next();
    p.prev();
    p.play();
    p.toggle_play();
    p.seek(0.5);
    p.remove_index(0);
    assert_eq!(p.state(), PlaybackState::Empty);
    assert!(!p.is_playing());
    assert_eq!(p.backend().connect_calls(), 0);
}

#[test]
fn clear_releases_every_item() {
    let mut p = player();
    for n in ["a", "b", "c"] {
        p.add_item(audio(n));
    }
    p.clear();
    assert_eq!(p.state(), PlaybackState::Empty);
    assert!(p.is_empty());
    assert_eq!(p.backend().released().len(), 3);
    assert!(p.backend().connected_sources().is_empty());
}

#[test]
fn end_of_media_behaves_as_next() {
    let mut p = player_with(SimulatedOptions {
        track_seconds: 1.0,
        ..SimulatedOptions::default()
    });
    p.add_item(audio("a"));
    p.add_item(audio("b"));

    for _ in 0..25 {
        p.tick(0.05);
    }
    assert_eq!(active_name(&p), Some("b"));
    assert!(p.is_playing());
}

// ── Audio graph hygiene ─────────────────────────────────────────────────────

#[test]
fn switching_items_never_leaves_two_connections() {
    let mut p = player();
    for n in ["a", "b", "c"] {
        p.add_item(audio(n));
    }
    for i in [1, 2, 0, 0, 2] {
        p.select_index(i);
        let connected = p.backend().connected_sources();
        assert_eq!(connected.len(), 1);
        assert_eq!(Some(connected[0]), p.backend().current_source());
        assert_eq!(p.connection(), p.backend().current_source());
    }
}

#[test]
fn reconnecting_a_connected_source_is_tolerated() {
    let mut p = player();
    p.add_item(audio("a"));
    let calls = p.backend().connect_calls();

    p.pause();
    p.play();
    assert_eq!(p.backend().connect_calls(), calls + 1);
    assert!(p.is_playing());
    assert_eq!(p.backend().connected_sources().len(), 1);
}

#[test]
fn rejected_playback_is_swallowed() {
    let mut p = player_with(SimulatedOptions {
        reject_play: true,
        ..SimulatedOptions::default()
    });
    p.add_item(audio("a"));
    assert_eq!(p.state(), PlaybackState::Loaded { index: 0 });
    assert!(!p.is_playing());

    p.backend_mut().set_reject_play(false);
    p.toggle_play();
    assert!(p.is_playing());
}

#[test]
fn images_play_without_a_timeline() {
    let mut p = player();
    p.add_item(PlaylistItem::new("cover", "cover.png", MediaKind::Image));
    assert!(p.is_playing());
    assert!(!p.backend().is_playing());
    assert!(matches!(p.spectrum_input(), SpectrumInput::Image));
    for _ in 0..100 {
        p.tick(10.0);
    }
    assert_eq!(active_name(&p), Some("cover"));
}

#[test]
fn spectrum_input_follows_the_session() {
    let mut p = player();
    assert!(matches!(p.spectrum_input(), SpectrumInput::Silent));
    p.add_item(audio("a"));
    assert!(matches!(p.spectrum_input(), SpectrumInput::Analyser(_)));
    p.clear();
    assert!(matches!(p.spectrum_input(), SpectrumInput::Silent));
}

// ── Transport extras ────────────────────────────────────────────────────────

#[test]
fn volume_steps_clamp_to_unit_range() {
    let mut p = player();
    assert_eq!(p.volume(), DEFAULT_VOLUME);
    for _ in 0..20 {
        p.volume_up();
    }
    assert_eq!(p.volume(), 1.0);
    assert_eq!(p.backend().volume(), 1.0);
    for _ in 0..20 {
        p.volume_down();
    }
    assert_eq!(p.volume(), 0.0);
    p.set_volume(f32::NAN);
    assert_eq!(p.volume(), 0.0);
}

#[test]
fn mute_toggles_backend() {
    let mut p = player();
    p.toggle_mute();
    assert!(p.is_muted());
    assert!(p.backend().muted());
    p.toggle_mute();
    assert!(!p.backend().muted());
}

#[test]
fn seek_clamps_to_the_track() {
    let mut p = player_with(SimulatedOptions {
        track_seconds: 100.0,
        ..SimulatedOptions::default()
    });
    p.add_item(audio("a"));
    p.seek(0.25);
    assert_eq!(p.position().map(|pos| pos.current_s), Some(25.0));
    p.seek(3.0);
    assert_eq!(p.position().map(|pos| pos.current_s), Some(100.0));
}

#[test]
fn unsupported_locators_are_skipped() {
    let mut p = player();
    let added = p.add_locators(&["  ", "song.ogg", "clip.webm?x=1"]);
    assert_eq!(added, 2);
    assert_eq!(p.items()[1].kind, MediaKind::Video);
    assert_eq!(p.items()[1].name, "clip");
}
