use super::{FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd, Fill};

const FIRE_COLUMNS: usize = 48;
const EMBERS_PER_COLUMN: usize = 6;

/// Flame tongues rising from the bottom edge, one per column, with random
/// embers drifting above them. The tongues are deterministic; only the
/// embers use the generator.
pub struct FireMode {
    rng: fastrand::Rng,
}

impl FireMode {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Visualizer for FireMode {
    fn mode(&self) -> Mode {
        Mode::Fire
    }

    fn trail_alpha(&self) -> f32 {
        0.3
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let n = FIRE_COLUMNS;
        let col_w = ctx.width / n as f32;
        let hot = ctx.palette.at(0);
        let cool = ctx.palette.at(1);
        let ember_scale = (ctx.min_dim() / 400.0).max(0.25);
        let mut embers = Vec::with_capacity(n * EMBERS_PER_COLUMN);

        for i in 0..n {
            let lv = ctx.level(i, n);
            let h = lv * ctx.height * 0.6 * ctx.intensity();
            let sway = (ctx.time * 3.0 + i as f32 * 0.7).sin() * col_w * 0.15;
            let x = i as f32 * col_w + sway;

            out.push(DrawCmd::Rect {
                x,
                y: ctx.height - h,
                w: col_w,
                h,
                fill: Fill::Vertical {
                    top: Color::with_alpha(cool, 0.2),
                    bottom: Color::with_alpha(hot, 0.95),
                },
            });

            if h <= 0.0 {
                continue;
            }
            for _ in 0..EMBERS_PER_COLUMN {
                let rise = self.rng.f32();
                let ex = x + self.rng.f32() * col_w;
                let ey = ctx.height - h * (0.5 + rise);
                embers.push(DrawCmd::Circle {
                    center: (ex, ey),
                    radius: (1.0 + lv * 3.0 * ctx.intensity()) * ember_scale,
                    color: Color::with_alpha(hot.lerp(cool, rise), 1.0 - rise * 0.7),
                });
            }
        }
        out.extend(embers);
    }
}
