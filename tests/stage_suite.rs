use crossterm::event::{KeyCode, KeyModifiers};
use lounge_viz::commands::{Command, KeyBindings, HUE_STEP, SLIDER_STEP};
use lounge_viz::engine::RenderLoop;
use lounge_viz::media::{MediaKind, PlaylistItem};
use lounge_viz::palette::ColorScheme;
use lounge_viz::params::{Mode, ParameterBundle, Slider, Toggle};
use lounge_viz::platform::{FrequencyAnalyser, SimulatedBackend, SimulatedOptions};
use lounge_viz::playback::{PlaybackState, Player};
use lounge_viz::raster::DrawCmd;
use lounge_viz::spectrum::SpectrumInput;
use lounge_viz::stage::Stage;
use lounge_viz::visual::BACKGROUND;

fn stage() -> Stage<SimulatedBackend> {
    let player = Player::new(SimulatedBackend::new(SimulatedOptions::default()));
    Stage::new(player, ParameterBundle::default(), RenderLoop::new(64, 32, 256, 7))
}

fn audio(name: &str) -> PlaylistItem {
    PlaylistItem::new(name, format!("{name}.mp3"), MediaKind::Audio)
}

/// Every bin at full scale.
struct Loud;

impl FrequencyAnalyser for Loud {
    fn bin_count(&self) -> usize {
        256
    }

    fn byte_frequency_data(&self, out: &mut [u8]) {
        out.fill(255);
    }
}

// ── Command dispatch ────────────────────────────────────────────────────────

#[test]
fn only_quit_ends_the_session() {
    let mut s = stage();
    for cmd in [
        Command::NextMode,
        Command::ToggleHud,
        Command::VolumeDown,
        Command::Clear,
        Command::TogglePlay,
    ] {
        assert!(!s.apply(cmd), "{cmd:?}");
    }
    assert!(s.apply(Command::Quit));
}

#[test]
fn mode_and_scheme_commands_cycle() {
    let mut s = stage();
    s.apply(Command::NextMode);
    assert_eq!(s.params.mode(), Mode::Wave);
    s.apply(Command::PrevMode);
    s.apply(Command::PrevMode);
    assert_eq!(s.params.mode(), Mode::Tunnel);
    s.apply(Command::SetMode(Mode::Fire));
    assert_eq!(s.params.mode(), Mode::Fire);

    s.apply(Command::PrevScheme);
    assert_eq!(s.params.color_scheme(), ColorScheme::Rainbow);
    s.apply(Command::SetScheme(ColorScheme::Forest));
    s.apply(Command::NextScheme);
    assert_eq!(s.params.color_scheme(), ColorScheme::Fire);
}

#[test]
fn slider_and_hue_commands_clamp() {
    let mut s = stage();
    for _ in 0..40 {
        s.apply(Command::StepSlider(Slider::Glow, SLIDER_STEP));
    }
    assert_eq!(s.params.glow(), 100.0);
    s.apply(Command::SetSlider(Slider::Speed, -5.0));
    assert_eq!(s.params.speed(), 0.0);
    s.apply(Command::StepHue(-HUE_STEP));
    assert!((s.params.hue_shift() - 345.0).abs() < 1e-4);
    s.apply(Command::Toggle(Toggle::Mirror));
    assert!(s.params.mirror());
}

#[test]
fn fullscreen_hides_the_hud() {
    let mut s = stage();
    assert!(s.hud_visible());
    s.apply(Command::ToggleFullscreen);
    assert!(s.is_fullscreen());
    assert!(!s.hud_visible());
    s.apply(Command::ToggleFullscreen);
    assert!(s.hud_visible());
    s.apply(Command::ToggleHud);
    assert!(!s.hud_visible());
}

#[test]
fn help_toggles() {
    let mut s = stage();
    assert!(!s.help_visible());
    s.apply(Command::ToggleHelp);
    assert!(s.help_visible());
}

#[test]
fn remove_active_drops_the_current_item() {
    let mut s = stage();
    s.player.add_item(audio("a"));
    s.player.add_item(audio("b"));
    s.apply(Command::Select(1));
    s.apply(Command::RemoveActive);
    assert_eq!(s.player.len(), 1);
    assert_eq!(s.player.state(), PlaybackState::Loaded { index: 0 });

    s.apply(Command::RemoveActive);
    assert_eq!(s.player.state(), PlaybackState::Empty);
    // Nothing left to remove.
    s.apply(Command::RemoveActive);
    assert!(s.player.is_empty());
}

#[test]
fn transport_commands_reach_the_player() {
    let mut s = stage();
    s.player.add_item(audio("a"));
    s.apply(Command::Pause);
    assert!(!s.player.is_playing());
    s.apply(Command::Play);
    assert!(s.player.is_playing());
    s.apply(Command::SetVolume(0.25));
    assert_eq!(s.player.volume(), 0.25);
    s.apply(Command::ToggleMute);
    assert!(s.player.is_muted());
    s.apply(Command::Seek(0.5));
    assert_eq!(s.player.position().map(|p| p.current_s), Some(90.0));
}

// ── HUD ─────────────────────────────────────────────────────────────────────

#[test]
fn hud_without_media() {
    let s = stage();
    let hud = s.hud_line(59.94);
    assert!(hud.starts_with("Mode: bars | Scheme: neon"), "{hud}");
    assert!(hud.contains("no media"));
    assert!(hud.contains("Vol: 70%"));
    assert!(hud.ends_with("FPS: 59.9"), "{hud}");
}

#[test]
fn hud_with_media_and_flags() {
    let mut s = stage();
    s.player.add_item(audio("intro"));
    s.player.add_item(audio("outro"));
    s.apply(Command::Toggle(Toggle::BassShake));
    s.apply(Command::ToggleMute);
    let hud = s.hud_line(60.0);
    assert!(hud.contains("1/2 intro [audio] playing 0:00/3:00"), "{hud}");
    assert!(hud.contains("Vol: muted (70%)"), "{hud}");
    assert!(hud.contains("| shake |"), "{hud}");
}

// ── Ticking ─────────────────────────────────────────────────────────────────

#[test]
fn tick_follows_mode_changes() {
    let mut s = stage();
    s.player.add_item(audio("a"));
    s.apply(Command::SetMode(Mode::Galaxy));
    s.tick(1.0 / 60.0);
    assert_eq!(s.engine.active_mode(), Mode::Galaxy);
    assert_eq!(s.engine.clock().frames(), 1);
    assert!(!s.engine.commands().is_empty());
}

#[test]
fn still_image_drives_the_spectrum() {
    let mut s = stage();
    s.player.add_item(PlaylistItem::new("cover", "cover.jpg", MediaKind::Image));
    for _ in 0..5 {
        s.tick(1.0 / 60.0);
    }
    assert!(s.engine.signal().mean > 0.0);
}

#[test]
fn empty_session_is_silent() {
    let mut s = stage();
    s.tick(1.0 / 60.0);
    assert_eq!(s.engine.signal().peak, 0);
}

#[test]
fn resize_changes_the_surface() {
    let mut s = stage();
    s.resize(40, 20);
    s.tick(0.016);
    assert_eq!(s.engine.surface().width(), 40);
    assert_eq!(s.engine.pixels().len(), 40 * 20 * 4);
}

// ── Global effects ──────────────────────────────────────────────────────────

#[test]
fn pulse_background_follows_bass() {
    let mut engine = RenderLoop::new(32, 16, 256, 3);
    let mut p = ParameterBundle::default();
    engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
    assert_eq!(engine.background(), BACKGROUND);

    p.set_toggle(Toggle::PulseBackground, true);
    engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
    assert_ne!(engine.background(), BACKGROUND);

    engine.tick(&p, SpectrumInput::Silent, 0.016);
    assert_eq!(engine.background(), BACKGROUND);
}

#[test]
fn bass_shake_is_short_lived() {
    let mut engine = RenderLoop::new(32, 16, 256, 3);
    let mut p = ParameterBundle::default();
    p.set_toggle(Toggle::BassShake, true);

    engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
    assert!(engine.is_shaking());
    assert_eq!(engine.pixels().len(), 32 * 16 * 4);

    for _ in 0..10 {
        engine.tick(&p, SpectrumInput::Silent, 0.016);
    }
    assert!(!engine.is_shaking());

    p.set_toggle(Toggle::BassShake, false);
    engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
    assert!(!engine.is_shaking());
}

#[test]
fn glow_widens_the_lit_area() {
    let lit = |glow: f32| {
        let mut engine = RenderLoop::new(96, 64, 256, 3);
        let mut p = ParameterBundle::default();
        p.set_mode(Mode::Circular);
        p.set_glow(glow);
        engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
        engine
            .pixels()
            .chunks_exact(4)
            .filter(|px| (px[0], px[1], px[2]) != (BACKGROUND.0, BACKGROUND.1, BACKGROUND.2))
            .count()
    };
    let (plain, glowing) = (lit(0.0), lit(100.0));
    assert!(plain > 0);
    assert!(glowing > plain, "glow 0 lit {plain}, glow 100 lit {glowing}");
}

#[test]
fn rotate_flag_turns_the_drawn_geometry() {
    let run = |rotate: bool| {
        let mut engine = RenderLoop::new(96, 64, 256, 3);
        let mut p = ParameterBundle::default();
        p.set_mode(Mode::Circular);
        p.set_toggle(Toggle::Rotate, rotate);
        for _ in 0..5 {
            engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
        }
        (engine.clock().rotation(), engine.commands().to_vec())
    };
    let (still_angle, still) = run(false);
    let (turned_angle, turned) = run(true);
    assert_eq!(still_angle, 0.0);
    assert!(turned_angle > 0.0);
    assert_eq!(still.len(), turned.len());
    assert_ne!(still, turned);
}

#[test]
fn zoom_reaches_the_drawn_geometry() {
    let ring = |zoom: f32| {
        let mut engine = RenderLoop::new(96, 64, 256, 3);
        let mut p = ParameterBundle::default();
        p.set_mode(Mode::Circular);
        p.set_zoom(zoom);
        engine.tick(&p, SpectrumInput::Analyser(&Loud), 0.016);
        engine.commands().iter().find_map(|c| match c {
            DrawCmd::Ring { rx, .. } => Some(*rx),
            _ => None,
        })
    };
    let (near, far) = (ring(0.0).expect("ring drawn"), ring(100.0).expect("ring drawn"));
    assert!(far > near, "zoom 0 ring {near}, zoom 100 ring {far}");
}

// ── Key table ───────────────────────────────────────────────────────────────

#[test]
fn default_keys_cover_the_controls() {
    let keys = KeyBindings::default();
    let none = KeyModifiers::NONE;
    assert_eq!(keys.lookup(KeyCode::Char(' '), none), Some(Command::TogglePlay));
    assert_eq!(keys.lookup(KeyCode::Right, none), Some(Command::Next));
    assert_eq!(keys.lookup(KeyCode::Tab, none), Some(Command::NextMode));
    assert_eq!(keys.lookup(KeyCode::Char('f'), none), Some(Command::ToggleFullscreen));
    assert_eq!(
        keys.lookup(KeyCode::Char('4'), none),
        Some(Command::Toggle(Toggle::BassShake))
    );
    assert_eq!(keys.lookup(KeyCode::Esc, none), Some(Command::Quit));
    assert_eq!(keys.lookup(KeyCode::Char('~'), none), None);
}

#[test]
fn unbinding_silences_a_key() {
    let mut keys = KeyBindings::default();
    keys.unbind(KeyCode::Char('q'));
    assert_eq!(keys.lookup(KeyCode::Char('q'), KeyModifiers::NONE), None);
    assert_eq!(keys.lookup(KeyCode::Char('Q'), KeyModifiers::NONE), Some(Command::Quit));
}
