//! Per-frame driver: clock, spectrum refresh, aggregate signal, global
//! effects and mode dispatch onto the raster surface.

use crate::palette::{Palette, Rgb};
use crate::params::{Mode, ParameterBundle};
use crate::raster::{Color, DrawCmd, Surface};
use crate::spectrum::{AggregateSignal, SpectrumFrame, SpectrumInput, SpectrumSource};
use crate::visual::{FrameCtx, ModeLibrary, BACKGROUND};
use tracing::debug;

/// Time added per tick at the baseline speed.
pub const TIME_STEP: f32 = 0.05;
/// Radians added per tick at the baseline speed while the rotate flag is on.
pub const ROTATION_STEP: f32 = 0.01;
/// Bass level that triggers a shake.
pub const SHAKE_THRESHOLD: f32 = 0.8;
pub const SHAKE_SECONDS: f32 = 0.05;
pub const SHAKE_OFFSET_PX: i32 = 4;
/// How far a full bass level pulls the background toward the palette.
pub const PULSE_MIX: f32 = 0.35;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    time: f32,
    rotation: f32,
    frames: u64,
}

impl AnimationClock {
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Steps 1 and 2 of a tick.
    pub fn advance(&mut self, params: &ParameterBundle) {
        let k = params.speed_mul();
        self.time += TIME_STEP * k;
        if params.rotate() {
            self.rotation = (self.rotation + ROTATION_STEP * k).rem_euclid(std::f32::consts::TAU);
        }
        self.frames += 1;
    }
}

pub struct RenderLoop {
    clock: AnimationClock,
    source: SpectrumSource,
    signal: AggregateSignal,
    modes: ModeLibrary,
    palette: Palette,
    surface: Surface,
    commands: Vec<DrawCmd>,
    background: Rgb,
    shake_left: f32,
    shake_offset: (i32, i32),
    shaken: Vec<u8>,
    rng: fastrand::Rng,
}

impl RenderLoop {
    pub fn new(width: usize, height: usize, bin_count: usize, seed: u64) -> Self {
        let mut surface = Surface::new(width, height);
        surface.clear(BACKGROUND);
        let mut modes = ModeLibrary::new(seed);
        modes.on_resize(width, height);
        let defaults = ParameterBundle::default();
        Self {
            clock: AnimationClock::default(),
            source: SpectrumSource::new(bin_count),
            signal: AggregateSignal::default(),
            modes,
            palette: Palette::new(defaults.color_scheme(), defaults.hue_shift()),
            surface,
            commands: Vec::new(),
            background: BACKGROUND,
            shake_left: 0.0,
            shake_offset: (0, 0),
            shaken: Vec::new(),
            rng: fastrand::Rng::with_seed(seed.rotate_left(17)),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.surface.resize(width, height) {
            self.surface.clear(BACKGROUND);
            self.modes.on_resize(width, height);
            debug!(width, height, "surface resized");
        }
    }

    /// Runs one tick. `dt` is wall time since the previous tick and only
    /// drives the shake timer; animation advances by fixed steps.
    pub fn tick(&mut self, params: &ParameterBundle, input: SpectrumInput<'_>, dt: f32) {
        self.clock.advance(params);
        self.source.refresh(input, self.clock.time());
        self.signal = AggregateSignal::compute(self.source.current_frame());

        if !self.palette.matches(params.color_scheme(), params.hue_shift()) {
            self.palette = Palette::new(params.color_scheme(), params.hue_shift());
        }
        self.apply_effects(params, dt);

        if self.modes.active() != params.mode() {
            debug!(from = %self.modes.active().label(), to = %params.mode().label(), "mode switch");
            self.modes.activate(params.mode());
        }
        let visualizer = self.modes.current();
        self.surface
            .fade(Color::with_alpha(self.background, visualizer.trail_alpha()));

        let ctx = FrameCtx {
            spectrum: self.source.current_frame(),
            signal: self.signal,
            params,
            palette: &self.palette,
            time: self.clock.time(),
            rotation: self.clock.rotation(),
            width: self.surface.width() as f32,
            height: self.surface.height() as f32,
        };
        self.commands.clear();
        visualizer.draw(&ctx, &mut self.commands);
        self.surface.draw_all(&self.commands, params.glow_px());

        if self.is_shaking() {
            let (dx, dy) = self.shake_offset;
            self.surface
                .copy_shifted(dx, dy, self.background, &mut self.shaken);
        }
    }

    fn apply_effects(&mut self, params: &ParameterBundle, dt: f32) {
        let bass = self.signal.bass_level();

        self.background = if params.pulse_background() {
            BACKGROUND.lerp(self.palette.at(0), bass * PULSE_MIX)
        } else {
            BACKGROUND
        };

        if !params.bass_shake() {
            self.shake_left = 0.0;
            return;
        }
        self.shake_left = (self.shake_left - dt.max(0.0)).max(0.0);
        if self.shake_left <= 0.0 && bass > SHAKE_THRESHOLD {
            self.shake_left = SHAKE_SECONDS;
            self.shake_offset = (
                self.rng.i32(-SHAKE_OFFSET_PX..=SHAKE_OFFSET_PX),
                self.rng.i32(-SHAKE_OFFSET_PX..=SHAKE_OFFSET_PX),
            );
        }
    }

    /// Pixels to present this frame, shake offset applied.
    pub fn pixels(&self) -> &[u8] {
        if self.is_shaking() && self.shaken.len() == self.surface.pixels().len() {
            &self.shaken
        } else {
            self.surface.pixels()
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_left > 0.0
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn signal(&self) -> AggregateSignal {
        self.signal
    }

    pub fn spectrum(&self) -> &SpectrumFrame {
        self.source.current_frame()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn active_mode(&self) -> Mode {
        self.modes.active()
    }

    pub fn modes_mut(&mut self) -> &mut ModeLibrary {
        &mut self.modes
    }
}
