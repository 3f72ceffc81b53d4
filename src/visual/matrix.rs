use super::{FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd};

pub const MATRIX_FONT_SIZE: f32 = 14.0;
pub const MATRIX_GLYPHS: &[char] = &[
    'A', 'I', 'L', 'O', 'U', 'N', 'G', 'E', '0', '1', 'ア', 'イ', 'ラ', 'ウ', 'ン', 'ジ',
];
/// Per-tick chance that a column past the bottom edge restarts at the top.
const RESET_CHANCE: f32 = 0.025;

/// Glyph rain. The only mode with cross-frame state: one drop position per
/// column, in pixels from the top.
pub struct MatrixMode {
    drops: Vec<f32>,
    rng: fastrand::Rng,
}

impl MatrixMode {
    pub fn new(seed: u64) -> Self {
        Self {
            drops: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn drops(&self) -> &[f32] {
        &self.drops
    }

    fn columns_for(width: f32) -> usize {
        (width / MATRIX_FONT_SIZE).floor().max(0.0) as usize
    }
}

impl Visualizer for MatrixMode {
    fn mode(&self) -> Mode {
        Mode::Matrix
    }

    fn trail_alpha(&self) -> f32 {
        0.05
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let cols = Self::columns_for(ctx.width);
        if self.drops.len() != cols {
            self.drops.resize(cols, 0.0);
        }
        let advance = MATRIX_FONT_SIZE * ctx.intensity();
        let head = ctx.palette.at(0);

        for (i, drop) in self.drops.iter_mut().enumerate() {
            let ch = MATRIX_GLYPHS[self.rng.usize(..MATRIX_GLYPHS.len())];
            let lightness = self.rng.f32();
            let lv = ctx.spectrum.level(i, cols);
            let rgb = head.lerp(crate::palette::Rgb(255, 255, 255), lightness * 0.6);

            out.push(DrawCmd::Glyph {
                x: i as f32 * MATRIX_FONT_SIZE,
                y: *drop,
                size: MATRIX_FONT_SIZE,
                ch,
                color: Color::with_alpha(rgb, 0.35 + 0.65 * lv),
            });

            if *drop > ctx.height && self.rng.f32() < RESET_CHANCE {
                *drop = 0.0;
            }
            *drop += advance;
        }
    }

    fn on_resize(&mut self, w: usize, _h: usize) {
        self.drops = vec![0.0; Self::columns_for(w as f32)];
    }

    fn reset(&mut self) {
        self.drops.fill(0.0);
    }
}
