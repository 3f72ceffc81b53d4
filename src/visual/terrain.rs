use super::{FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd, Fill};

const TERRAIN_LAYERS: usize = 4;
const TERRAIN_STEP_PX: f32 = 4.0;

/// Parallax ridgelines scrolling left; nearer ridges move faster and rise
/// higher on loud bins.
pub struct TerrainMode;

impl Visualizer for TerrainMode {
    fn mode(&self) -> Mode {
        Mode::Terrain
    }

    fn trail_alpha(&self) -> f32 {
        0.5
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let cols = ((ctx.width / TERRAIN_STEP_PX).ceil() as usize).max(1);

        for layer in 0..TERRAIN_LAYERS {
            let depth = (layer + 1) as f32 / TERRAIN_LAYERS as f32;
            let scroll = ctx.time * (20.0 + 30.0 * layer as f32) / TERRAIN_STEP_PX;
            let shift = scroll.rem_euclid(cols as f32) as usize;
            let floor = ctx.height * (0.1 + 0.08 * (TERRAIN_LAYERS - 1 - layer) as f32);
            let rgb = ctx.palette.at(layer).scale(0.4 + 0.6 * depth);
            let top = Color::with_alpha(rgb, 0.9);
            let bottom = Color::with_alpha(rgb.scale(0.35), 0.9);

            for c in 0..cols {
                let lv = ctx.level((c + shift) % cols, cols);
                let h = (floor + lv * ctx.height * 0.35 * ctx.intensity() * depth) * ctx.zoom();
                out.push(DrawCmd::Rect {
                    x: c as f32 * TERRAIN_STEP_PX,
                    y: ctx.height - h,
                    w: TERRAIN_STEP_PX,
                    h,
                    fill: Fill::Vertical { top, bottom },
                });
            }
        }
    }
}
