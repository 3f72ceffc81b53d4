use super::{FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd};

const HELIX_POINTS: usize = 48;

/// Double helix spanning the width. Each base pair opens wider as its bin
/// gets louder.
pub struct DnaMode;

impl Visualizer for DnaMode {
    fn mode(&self) -> Mode {
        Mode::Dna
    }

    fn trail_alpha(&self) -> f32 {
        0.25
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let n = HELIX_POINTS;
        let cy = ctx.height * 0.5;
        let node_scale = (ctx.min_dim() / 400.0).max(0.25);
        let strand_a = ctx.palette.at(0);
        let strand_b = ctx.palette.at(1);

        let mut upper = Vec::with_capacity(n);
        let mut lower = Vec::with_capacity(n);
        let mut nodes = Vec::with_capacity(n * 2);

        for i in 0..n {
            let lv = ctx.level(i, n);
            let amp = (ctx.height * 0.12 + lv * ctx.height * 0.22 * ctx.intensity()) * ctx.zoom();
            let x = (i as f32 + 0.5) / n as f32 * ctx.width;
            let phase = i as f32 * 0.35 + ctx.time * 2.0 + ctx.rotation;
            let s = phase.sin() * amp;
            let (y1, y2) = (cy + s, cy - s);

            out.push(DrawCmd::Line {
                from: (x, y1),
                to: (x, y2),
                width: 1.0,
                color: Color::with_alpha(strand_a.lerp(strand_b, 0.5), 0.35 + 0.4 * lv),
            });

            let r = (2.0 + lv * 5.0 * ctx.intensity()) * node_scale;
            nodes.push(DrawCmd::Circle {
                center: (x, y1),
                radius: r,
                color: Color::opaque(strand_a),
            });
            nodes.push(DrawCmd::Circle {
                center: (x, y2),
                radius: r,
                color: Color::opaque(strand_b),
            });
            upper.push((x, y1));
            lower.push((x, y2));
        }

        out.push(DrawCmd::Polyline {
            points: upper,
            width: 1.5,
            color: Color::with_alpha(strand_a, 0.6),
        });
        out.push(DrawCmd::Polyline {
            points: lower,
            width: 1.5,
            color: Color::with_alpha(strand_b, 0.6),
        });
        out.extend(nodes);
    }
}
