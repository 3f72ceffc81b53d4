use super::{FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd};

const WAVE_LAYERS: usize = 3;
const WAVE_STEP_PX: f32 = 3.0;

fn sample_columns(width: f32, step: f32) -> usize {
    ((width / step).ceil() as usize).max(2) + 1
}

/// Layered sine traces whose local amplitude follows the spectrum.
pub struct WaveMode;

impl Visualizer for WaveMode {
    fn mode(&self) -> Mode {
        Mode::Wave
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let cy = ctx.height * 0.5;
        let cols = sample_columns(ctx.width, WAVE_STEP_PX);
        let max_amp = ctx.height * 0.25 * ctx.intensity() * ctx.zoom();

        for layer in 0..WAVE_LAYERS {
            let k = 0.015 + layer as f32 * 0.005;
            let phase_speed = 3.0 + layer as f32;
            let offset = layer as f32 * 1.3;
            let alpha = 1.0 - layer as f32 * 0.25;

            let mut upper = Vec::with_capacity(cols);
            let mut lower = Vec::with_capacity(cols);
            for c in 0..cols {
                let x = c as f32 * WAVE_STEP_PX;
                let amp = ctx.level(c, cols) * max_amp;
                let s = (x * k + ctx.time * phase_speed + offset).sin() * amp;
                upper.push((x, cy + s));
                lower.push((x, cy - s));
            }

            let color = ctx.palette.at(layer);
            out.push(DrawCmd::Polyline {
                points: upper,
                width: 2.0,
                color: Color::with_alpha(color, alpha),
            });
            if ctx.params.mirror() {
                out.push(DrawCmd::Polyline {
                    points: lower,
                    width: 2.0,
                    color: Color::with_alpha(color, alpha * 0.5),
                });
            }
        }
    }
}

/// A single oscilloscope-style trace plus its mirror image.
pub struct WaveformMode;

impl Visualizer for WaveformMode {
    fn mode(&self) -> Mode {
        Mode::Waveform
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let cy = ctx.height * 0.5;
        let step = 2.0;
        let cols = sample_columns(ctx.width, step);
        let amplitude = ctx.height * 0.3 * ctx.intensity();

        let mut trace = Vec::with_capacity(cols + 1);
        let mut mirror = Vec::with_capacity(cols + 1);
        trace.push((0.0, cy));
        mirror.push((0.0, cy));
        for c in 0..cols {
            let x = c as f32 * step;
            let v = ctx.level(c, cols);
            let s = (x * 0.02 + ctx.time * 5.0).sin() * v * amplitude;
            trace.push((x, cy + s));
            mirror.push((x, cy - s));
        }

        out.push(DrawCmd::Polyline {
            points: trace,
            width: 2.0,
            color: Color::opaque(ctx.palette.at(0)),
        });
        out.push(DrawCmd::Polyline {
            points: mirror,
            width: 2.0,
            color: Color::opaque(ctx.palette.at(1)),
        });
    }
}
