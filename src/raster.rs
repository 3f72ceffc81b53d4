//! RGBA8 raster surface and the drawing commands modes emit into it.

use crate::palette::Rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Color {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub fn with_alpha(rgb: Rgb, alpha: f32) -> Self {
        Self {
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn fade(self, k: f32) -> Self {
        Self::with_alpha(self.rgb, self.alpha * k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Linear gradient from the rect's top edge to its bottom edge.
    Vertical { top: Color, bottom: Color },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Fill,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        width: f32,
        color: Color,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        color: Color,
    },
    /// Stroked axis-aligned ellipse.
    Ring {
        center: (f32, f32),
        rx: f32,
        ry: f32,
        width: f32,
        color: Color,
    },
    Glyph {
        x: f32,
        y: f32,
        size: f32,
        ch: char,
        color: Color,
    },
}

impl DrawCmd {
    /// Geometric extent of the command: area for rects, length for strokes,
    /// radius for circles and rings, size for glyphs. Used to compare how
    /// strongly a frame reacted to its input.
    pub fn extent(&self) -> f32 {
        match self {
            Self::Rect { w, h, .. } => w.abs() * h.abs(),
            Self::Line { from, to, .. } => dist(*from, *to),
            Self::Polyline { points, .. } => points.windows(2).map(|p| dist(p[0], p[1])).sum(),
            Self::Circle { radius, .. } => radius.abs(),
            Self::Ring { rx, ry, .. } => rx.abs() + ry.abs(),
            Self::Glyph { size, .. } => *size,
        }
    }
}

fn dist(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// 3x5 bitmaps for the glyph set used by matrix rain; other characters fall
/// back to a pattern derived from the code point.
fn glyph_bits(ch: char) -> u16 {
    match ch {
        'A' => 0b010_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'L' => 0b100_100_100_100_111,
        'O' | '0' => 0b111_101_101_101_111,
        'U' => 0b101_101_101_101_111,
        'N' => 0b110_101_101_101_101,
        'G' => 0b111_100_101_101_111,
        'E' => 0b111_100_110_100_111,
        '1' => 0b010_110_010_010_111,
        _ => {
            let h = (ch as u32).wrapping_mul(2_654_435_761);
            ((h >> 9) as u16 & 0x7fff) | 0b010_000_000_000_000
        }
    }
}

pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        let mut s = Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        s.resize(width, height);
        s
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns `true` when the dimensions actually changed.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width == self.width && height == self.height && !self.pixels.is_empty() {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0u8; width.saturating_mul(height).saturating_mul(4)];
        for px in self.pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn clear(&mut self, rgb: Rgb) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = rgb.0;
            px[1] = rgb.1;
            px[2] = rgb.2;
            px[3] = 255;
        }
    }

    /// Blends `color` over the whole surface; low alpha leaves motion trails.
    pub fn fade(&mut self, color: Color) {
        if color.alpha >= 1.0 {
            self.clear(color.rgb);
            return;
        }
        let a = color.alpha.clamp(0.0, 1.0);
        let src = [color.rgb.0 as f32, color.rgb.1 as f32, color.rgb.2 as f32];
        for px in self.pixels.chunks_exact_mut(4) {
            for c in 0..3 {
                px[c] = blend_channel(px[c], src[c], a);
            }
        }
    }

    /// Executes `cmd`; `glow_px > 0` first lays down a translucent halo.
    pub fn draw(&mut self, cmd: &DrawCmd, glow_px: f32) {
        if glow_px > 0.5 {
            self.draw_halo(cmd, glow_px);
        }
        match cmd {
            DrawCmd::Rect { x, y, w, h, fill } => self.fill_rect(*x, *y, *w, *h, *fill),
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => self.stroke_line(*from, *to, *width, *color),
            DrawCmd::Polyline {
                points,
                width,
                color,
            } => {
                for seg in points.windows(2) {
                    self.stroke_line(seg[0], seg[1], *width, *color);
                }
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => self.fill_circle(*center, *radius, *color),
            DrawCmd::Ring {
                center,
                rx,
                ry,
                width,
                color,
            } => self.stroke_ellipse(*center, *rx, *ry, *width, *color),
            DrawCmd::Glyph {
                x,
                y,
                size,
                ch,
                color,
            } => self.draw_glyph(*x, *y, *size, *ch, *color),
        }
    }

    pub fn draw_all(&mut self, cmds: &[DrawCmd], glow_px: f32) {
        for cmd in cmds {
            self.draw(cmd, glow_px);
        }
    }

    /// Copies the surface into `out`, shifted by (dx, dy); uncovered pixels
    /// take `fill`.
    pub fn copy_shifted(&self, dx: i32, dy: i32, fill: Rgb, out: &mut Vec<u8>) {
        out.clear();
        out.resize(self.pixels.len(), 0);
        let w = self.width as i64;
        let h = self.height as i64;
        for y in 0..h {
            for x in 0..w {
                let di = ((y * w + x) * 4) as usize;
                let sx = x - dx as i64;
                let sy = y - dy as i64;
                if sx >= 0 && sx < w && sy >= 0 && sy < h {
                    let si = ((sy * w + sx) * 4) as usize;
                    out[di..di + 4].copy_from_slice(&self.pixels[si..si + 4]);
                } else {
                    out[di] = fill.0;
                    out[di + 1] = fill.1;
                    out[di + 2] = fill.2;
                    out[di + 3] = 255;
                }
            }
        }
    }

    fn draw_halo(&mut self, cmd: &DrawCmd, glow_px: f32) {
        match cmd {
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => self.stroke_line(*from, *to, width + glow_px, color.fade(0.25)),
            DrawCmd::Polyline {
                points,
                width,
                color,
            } => {
                let halo = color.fade(0.25);
                for seg in points.windows(2) {
                    self.stroke_line(seg[0], seg[1], width + glow_px, halo);
                }
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => self.fill_circle(*center, radius + glow_px * 0.5, color.fade(0.25)),
            DrawCmd::Ring {
                center,
                rx,
                ry,
                width,
                color,
            } => self.stroke_ellipse(*center, *rx, *ry, width + glow_px, color.fade(0.25)),
            DrawCmd::Rect { .. } | DrawCmd::Glyph { .. } => {}
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        if color.alpha <= 0.0 {
            return;
        }
        let i = ((y as usize) * self.width + x as usize) * 4;
        let a = color.alpha.min(1.0);
        let px = &mut self.pixels[i..i + 4];
        px[0] = blend_channel(px[0], color.rgb.0 as f32, a);
        px[1] = blend_channel(px[1], color.rgb.1 as f32, a);
        px[2] = blend_channel(px[2], color.rgb.2 as f32, a);
        px[3] = 255;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Fill) {
        // Normalize negative extents (rects growing upward or leftward).
        let (x0, x1) = if w >= 0.0 { (x, x + w) } else { (x + w, x) };
        let (y0, y1) = if h >= 0.0 { (y, y + h) } else { (y + h, y) };
        let sx = x0.round().max(0.0) as i64;
        let ex = (x1.round() as i64).min(self.width as i64);
        let sy = y0.round().max(0.0) as i64;
        let ey = (y1.round() as i64).min(self.height as i64);
        if sx >= ex || sy >= ey {
            return;
        }
        let span = (y1 - y0).max(1.0);
        for py in sy..ey {
            let color = match fill {
                Fill::Solid(c) => c,
                Fill::Vertical { top, bottom } => {
                    let t = ((py as f32 + 0.5 - y0) / span).clamp(0.0, 1.0);
                    Color::with_alpha(
                        top.rgb.lerp(bottom.rgb, t),
                        top.alpha + (bottom.alpha - top.alpha) * t,
                    )
                }
            };
            for px in sx..ex {
                self.blend(px, py, color);
            }
        }
    }

    fn stamp(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let r = radius.max(0.5);
        let r2 = r * r;
        let x0 = ((cx - r).floor() as i64).max(0);
        let x1 = ((cx + r).ceil() as i64).min(self.width as i64 - 1);
        let y0 = ((cy - r).floor() as i64).max(0);
        let y1 = ((cy + r).ceil() as i64).min(self.height as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return;
        }
        let len = dist(from, to);
        let radius = (width * 0.5).max(0.5);
        // Segments far outside the surface are skipped entirely.
        let margin = radius + 1.0;
        let (w, h) = (self.width as f32, self.height as f32);
        if (from.0 < -margin && to.0 < -margin)
            || (from.1 < -margin && to.1 < -margin)
            || (from.0 > w + margin && to.0 > w + margin)
            || (from.1 > h + margin && to.1 > h + margin)
        {
            return;
        }
        let steps = (len / radius.max(0.75)).ceil().max(1.0) as usize;
        // Thin strokes overlap heavily when stamped; thin them out in alpha.
        let c = if radius <= 1.0 { color } else { color.fade(0.6) };
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            if radius <= 1.0 {
                self.blend(x.floor() as i64, y.floor() as i64, c);
            } else {
                self.stamp(x, y, radius, c);
            }
        }
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        if radius <= 0.0 || !center.0.is_finite() || !center.1.is_finite() {
            return;
        }
        self.stamp(center.0, center.1, radius, color);
    }

    fn stroke_ellipse(&mut self, center: (f32, f32), rx: f32, ry: f32, width: f32, color: Color) {
        let rx = rx.abs();
        let ry = ry.abs();
        if rx < 0.5 && ry < 0.5 {
            return;
        }
        let circumference = std::f32::consts::TAU * ((rx * rx + ry * ry) * 0.5).sqrt();
        let steps = (circumference / 2.0).ceil().clamp(12.0, 2048.0) as usize;
        let mut prev = (center.0 + rx, center.1);
        for s in 1..=steps {
            let a = s as f32 / steps as f32 * std::f32::consts::TAU;
            let p = (center.0 + rx * a.cos(), center.1 + ry * a.sin());
            self.stroke_line(prev, p, width, color);
            prev = p;
        }
    }

    fn draw_glyph(&mut self, x: f32, y: f32, size: f32, ch: char, color: Color) {
        // `y` is the baseline, as with canvas fillText.
        let bits = glyph_bits(ch);
        let cell_w = (size / 4.0).max(1.0);
        let cell_h = (size / 6.0).max(1.0);
        let top = y - cell_h * 5.0;
        for row in 0..5u16 {
            for col in 0..3u16 {
                let bit = 14 - (row * 3 + col);
                if bits & (1 << bit) != 0 {
                    let px = x + col as f32 * cell_w;
                    let py = top + row as f32 * cell_h;
                    self.fill_rect(px, py, cell_w, cell_h, Fill::Solid(color));
                }
            }
        }
    }
}

fn blend_channel(dst: u8, src: f32, a: f32) -> u8 {
    (dst as f32 + (src - dst as f32) * a).round().clamp(0.0, 255.0) as u8
}
