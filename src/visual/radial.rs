use super::{polar, FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd};
use std::f32::consts::TAU;

const CIRCULAR_BARS: usize = 128;
const KALEIDO_PETALS: usize = 16;
const TUNNEL_RINGS: usize = 20;

/// Radial bars standing on a ring that breathes with the bass.
pub struct CircularMode;

impl Visualizer for CircularMode {
    fn mode(&self) -> Mode {
        Mode::Circular
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let c = ctx.center();
        let m = ctx.min_dim();
        let n = CIRCULAR_BARS;
        let base = m * 0.2 * ctx.zoom()
            + ctx.signal.bass_level() * m * 0.05 * ctx.intensity();
        let bar_w = (TAU * base / n as f32 * 0.6).clamp(1.0, 6.0);

        out.push(DrawCmd::Ring {
            center: c,
            rx: base,
            ry: base,
            width: 1.5,
            color: Color::with_alpha(ctx.palette.at(0), 0.5),
        });

        for i in 0..n {
            let angle = TAU * i as f32 / n as f32 + ctx.rotation;
            let len = ctx.level(i, n) * m * 0.3 * ctx.intensity();
            let color = Color::opaque(ctx.palette.cycle(i as f32 / n as f32));
            out.push(DrawCmd::Line {
                from: polar(c, base, angle),
                to: polar(c, base + len, angle),
                width: bar_w,
                color,
            });
            if ctx.params.mirror() {
                let inner = (base - len * 0.5).max(0.0);
                out.push(DrawCmd::Line {
                    from: polar(c, base, angle),
                    to: polar(c, inner, angle),
                    width: bar_w,
                    color: color.fade(0.5),
                });
            }
        }
    }
}

/// Mirrored petal rings repeated around the center.
pub struct KaleidoscopeMode;

impl Visualizer for KaleidoscopeMode {
    fn mode(&self) -> Mode {
        Mode::Kaleidoscope
    }

    fn trail_alpha(&self) -> f32 {
        0.15
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let c = ctx.center();
        let segments = if ctx.params.mirror() { 12 } else { 8 };
        let max_r = ctx.min_dim() * 0.45 * ctx.zoom();

        for s in 0..segments {
            let base_angle = s as f32 * TAU / segments as f32 + ctx.rotation + ctx.time * 0.3;
            for j in 0..KALEIDO_PETALS {
                let lv = ctx.level(j, KALEIDO_PETALS);
                let reach = (j + 1) as f32 / KALEIDO_PETALS as f32;
                let r = reach * max_r * (0.6 + 0.4 * lv * ctx.intensity());
                let twist = j as f32 * 0.15;
                let size = 1.5 + lv * 8.0 * ctx.intensity();
                let color = Color::with_alpha(
                    ctx.palette.cycle(reach + s as f32 / segments as f32 * 0.5),
                    0.85,
                );
                for angle in [base_angle + twist, base_angle - twist] {
                    out.push(DrawCmd::Circle {
                        center: polar(c, r, angle),
                        radius: size,
                        color,
                    });
                }
            }
        }
    }
}

/// Concentric ellipses drifting outward, wobbling with the mean level.
pub struct TunnelMode;

impl Visualizer for TunnelMode {
    fn mode(&self) -> Mode {
        Mode::Tunnel
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let c = ctx.center();
        let m = ctx.min_dim();
        let base = m * 0.5 * ctx.zoom();
        let travel = (ctx.time * 50.0).rem_euclid(50.0) * (m / 600.0);
        let avg = ctx.signal.mean_level();

        for i in (1..=TUNNEL_RINGS).rev() {
            let depth = i as f32 / TUNNEL_RINGS as f32;
            let radius = depth * base + travel;
            let distortion =
                (ctx.time * 2.0 + i as f32 * 0.5).sin().abs() * avg * ctx.intensity() * m * 0.08;
            out.push(DrawCmd::Ring {
                center: c,
                rx: radius + distortion,
                ry: radius * 0.6 + distortion,
                width: 2.0,
                color: Color::with_alpha(ctx.palette.cycle(depth), 1.0 - depth),
            });
        }
    }
}
