use super::{polar, FrameCtx, Visualizer};
use crate::params::Mode;
use crate::raster::{Color, DrawCmd};
use std::f32::consts::TAU;

const GALAXY_ARMS: usize = 3;
const GALAXY_STARS_PER_ARM: usize = 60;

/// Sizes were tuned on a 400px-tall canvas.
fn size_scale(min_dim: f32) -> f32 {
    (min_dim / 400.0).max(0.25)
}

/// A ring of dots orbiting the center. The dot count follows the intensity
/// slider; the ring radius follows the mean level; each dot's size follows its
/// own bin (wrapping past the end of the spectrum).
pub struct ParticlesMode;

impl Visualizer for ParticlesMode {
    fn mode(&self) -> Mode {
        Mode::Particles
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let count = ctx.params.intensity().round() as usize;
        if count == 0 {
            return;
        }
        let c = ctx.center();
        let m = ctx.min_dim();
        let radius = (m * 0.15 + ctx.signal.mean_level() * m * 0.3) * ctx.zoom();
        let scale = size_scale(m);

        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU + ctx.time + ctx.rotation;
            let v = ctx.spectrum.wrapped(i) as f32 / 255.0;
            out.push(DrawCmd::Circle {
                center: polar(c, radius, angle),
                radius: (v * 20.0 + 2.0) * scale,
                color: Color::with_alpha(ctx.palette.cycle(i as f32 * 0.02), 0.8),
            });
        }
    }
}

/// Spiral arms of stars; the whole disc swells with the bass.
pub struct GalaxyMode;

impl Visualizer for GalaxyMode {
    fn mode(&self) -> Mode {
        Mode::Galaxy
    }

    fn trail_alpha(&self) -> f32 {
        0.2
    }

    fn draw(&mut self, ctx: &FrameCtx<'_>, out: &mut Vec<DrawCmd>) {
        let c = ctx.center();
        let m = ctx.min_dim();
        let bass = ctx.signal.bass_level() * ctx.intensity();
        let max_r = m * 0.45 * ctx.zoom() * (0.7 + 0.3 * bass);
        let scale = size_scale(m);

        out.push(DrawCmd::Circle {
            center: c,
            radius: m * 0.03 + bass * m * 0.05,
            color: Color::with_alpha(ctx.palette.at(0), 0.9),
        });

        for arm in 0..GALAXY_ARMS {
            let arm_angle = arm as f32 * TAU / GALAXY_ARMS as f32;
            for j in 0..GALAXY_STARS_PER_ARM {
                let t = (j + 1) as f32 / GALAXY_STARS_PER_ARM as f32;
                let lv = ctx.level(j, GALAXY_STARS_PER_ARM);
                let angle = arm_angle + t * TAU * 1.2 + ctx.time * 0.5 + ctx.rotation;
                let size = (0.8 + lv * 4.0 * ctx.intensity() * (1.0 - t * 0.5)) * scale;
                out.push(DrawCmd::Circle {
                    center: polar(c, t * max_r, angle),
                    radius: size,
                    color: Color::with_alpha(ctx.palette.sample(t), 0.5 + 0.5 * lv),
                });
            }
        }
    }
}
