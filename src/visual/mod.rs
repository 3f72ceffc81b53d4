mod bars;
mod fire;
mod helix;
mod matrix;
mod radial;
mod swarm;
mod terrain;
mod wave;

use crate::palette::{Palette, Rgb};
use crate::params::{Mode, ParameterBundle};
use crate::raster::DrawCmd;
use crate::spectrum::{AggregateSignal, SpectrumFrame};

pub use bars::{BarsMode, SpectrumMode};
pub use fire::FireMode;
pub use helix::DnaMode;
pub use matrix::{MatrixMode, MATRIX_FONT_SIZE, MATRIX_GLYPHS};
pub use radial::{CircularMode, KaleidoscopeMode, TunnelMode};
pub use swarm::{GalaxyMode, ParticlesMode};
pub use terrain::TerrainMode;
pub use wave::{WaveMode, WaveformMode};

/// Everything a mode may read for one frame. All borrows are shared: modes
/// cannot touch the spectrum or the parameters.
pub struct FrameCtx<'a> {
    pub spectrum: &'a SpectrumFrame,
    pub signal: AggregateSignal,
    pub params: &'a ParameterBundle,
    pub palette: &'a Palette,
    /// Animation time, already scaled by the speed slider.
    pub time: f32,
    /// Rotation accumulator in radians; 0 unless the rotate flag has run.
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
}

impl FrameCtx<'_> {
    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }

    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Normalized magnitude for sample `i` of `required`.
    pub fn level(&self, i: usize, required: usize) -> f32 {
        self.spectrum.level(i, required)
    }

    pub fn intensity(&self) -> f32 {
        self.params.intensity_mul()
    }

    pub fn zoom(&self) -> f32 {
        self.params.zoom_mul()
    }
}

/// Page background behind every mode.
pub const BACKGROUND: Rgb = Rgb(10, 10, 15);

pub trait Visualizer {
    fn mode(&self) -> Mode;

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>);

    /// Alpha of the background veil laid over the previous frame.
    fn trail_alpha(&self) -> f32 {
        0.1
    }

    fn on_resize(&mut self, _w: usize, _h: usize) {}

    /// Drops cross-frame state.
    fn reset(&mut self) {}
}

/// One visualizer per mode, indexed by `Mode::index`.
pub struct ModeLibrary {
    modes: Vec<Box<dyn Visualizer>>,
    active: Mode,
}

impl ModeLibrary {
    pub fn new(seed: u64) -> Self {
        let modes: Vec<Box<dyn Visualizer>> = vec![
            Box::new(BarsMode),
            Box::new(WaveMode),
            Box::new(CircularMode),
            Box::new(ParticlesMode),
            Box::new(GalaxyMode),
            Box::new(DnaMode),
            Box::new(TerrainMode),
            Box::new(MatrixMode::new(seed)),
            Box::new(FireMode::new(seed ^ 0xF1_4E)),
            Box::new(KaleidoscopeMode),
            Box::new(WaveformMode),
            Box::new(SpectrumMode),
            Box::new(TunnelMode),
        ];
        debug_assert!(modes.iter().enumerate().all(|(i, m)| m.mode().index() == i));
        Self {
            modes,
            active: Mode::Bars,
        }
    }

    pub fn active(&self) -> Mode {
        self.active
    }

    /// Switches the dispatch target. Re-entering a mode starts it clean.
    pub fn activate(&mut self, mode: Mode) {
        if mode == self.active {
            return;
        }
        self.active = mode;
        self.modes[mode.index()].reset();
    }

    pub fn current(&mut self) -> &mut dyn Visualizer {
        self.modes[self.active.index()].as_mut()
    }

    pub fn get_mut(&mut self, mode: Mode) -> &mut dyn Visualizer {
        self.modes[mode.index()].as_mut()
    }

    pub fn on_resize(&mut self, w: usize, h: usize) {
        for m in &mut self.modes {
            m.on_resize(w, h);
        }
    }
}

pub(crate) fn polar(center: (f32, f32), radius: f32, angle: f32) -> (f32, f32) {
    (center.0 + angle.cos() * radius, center.1 + angle.sin() * radius)
}
