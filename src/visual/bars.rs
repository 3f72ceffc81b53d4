use super::{FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd, Fill};

pub const BAR_COUNT: usize = 64;

/// Equal-width columns, height proportional to magnitude.
pub struct BarsMode;

impl Visualizer for BarsMode {
    fn mode(&self) -> Mode {
        Mode::Bars
    }

    fn trail_alpha(&self) -> f32 {
        0.35
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let n = BAR_COUNT;
        let col_w = ctx.width / n as f32;
        let gap = (col_w * 0.15).min(2.0);
        let cy = ctx.height * 0.5;

        for i in 0..n {
            let h = ctx.level(i, n) * ctx.height * ctx.intensity();
            let top = Color::opaque(ctx.palette.at(i));
            let bottom = Color::opaque(ctx.palette.at(i + 1));
            let y = if ctx.params.mirror() {
                cy - h * 0.5
            } else {
                ctx.height - h
            };
            out.push(DrawCmd::Rect {
                x: i as f32 * col_w,
                y,
                w: col_w - gap,
                h,
                fill: Fill::Vertical { top, bottom },
            });
        }
    }
}

/// Spectrum analyser look: 64 gradient bars over a baseline with a faint
/// reflection underneath.
pub struct SpectrumMode;

impl Visualizer for SpectrumMode {
    fn mode(&self) -> Mode {
        Mode::Spectrum
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let n = BAR_COUNT;
        let bar_w = ctx.width / n as f32;
        let baseline = ctx.height * 0.8;
        let max_h = ctx.height * 0.8;
        let step = 1.0 / ctx.palette.len() as f32;

        for i in 0..n {
            let h = ctx.level(i, n) * max_h * ctx.intensity();
            let t = i as f32 / n as f32;
            let top = ctx.palette.cycle(t);
            let bottom = ctx.palette.cycle(t + step).scale(0.6);
            let x = i as f32 * bar_w;
            let w = (bar_w - 2.0).max(1.0);

            out.push(DrawCmd::Rect {
                x,
                y: baseline - h,
                w,
                h,
                fill: Fill::Vertical {
                    top: Color::opaque(top),
                    bottom: Color::opaque(bottom),
                },
            });
            out.push(DrawCmd::Rect {
                x,
                y: baseline,
                w,
                h: h * 0.3,
                fill: Fill::Vertical {
                    top: Color::with_alpha(top, 0.3),
                    bottom: Color::with_alpha(top, 0.0),
                },
            });
        }
    }
}
