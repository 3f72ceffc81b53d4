use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Self((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self(
            lerp_u8(self.0, other.0, t),
            lerp_u8(self.1, other.1, t),
            lerp_u8(self.2, other.2, t),
        )
    }

    pub fn scale(self, k: f32) -> Self {
        let k = k.max(0.0);
        Self(
            (self.0 as f32 * k).round().min(255.0) as u8,
            (self.1 as f32 * k).round().min(255.0) as u8,
            (self.2 as f32 * k).round().min(255.0) as u8,
        )
    }

    /// Rotates the hue by `degrees`, keeping saturation and lightness.
    pub fn rotate_hue(self, degrees: f32) -> Self {
        if degrees.rem_euclid(360.0) == 0.0 {
            return self;
        }
        let (h, s, l) = rgb_to_hsl(self);
        hsl_to_rgb(h + degrees, s, l)
    }

    pub fn luma(self) -> u8 {
        let y = 0.2126 * self.0 as f32 + 0.7152 * self.1 as f32 + 0.0722 * self.2 as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

const NEON: &[Rgb] = &[Rgb::hex(0x00f0ff), Rgb::hex(0xff00ff), Rgb::hex(0xffff00)];
const SUNSET: &[Rgb] = &[
    Rgb::hex(0xff5e62),
    Rgb::hex(0xff9966),
    Rgb::hex(0xffcc70),
    Rgb::hex(0xc850c0),
];
const OCEAN: &[Rgb] = &[
    Rgb::hex(0x0052d4),
    Rgb::hex(0x4364f7),
    Rgb::hex(0x6fb1fc),
    Rgb::hex(0x00d2ff),
];
const FOREST: &[Rgb] = &[Rgb::hex(0x134e5e), Rgb::hex(0x3ca55c), Rgb::hex(0xb5e655)];
const FIRE: &[Rgb] = &[
    Rgb::hex(0xfff200),
    Rgb::hex(0xff9a00),
    Rgb::hex(0xff3d00),
    Rgb::hex(0x8b0000),
];
const VAPORWAVE: &[Rgb] = &[
    Rgb::hex(0xff71ce),
    Rgb::hex(0x01cdfe),
    Rgb::hex(0x05ffa1),
    Rgb::hex(0xb967ff),
    Rgb::hex(0xfffb96),
];
const MATRIX: &[Rgb] = &[Rgb::hex(0x00ff41), Rgb::hex(0x008f11), Rgb::hex(0x003b00)];
const MONOCHROME: &[Rgb] = &[Rgb::hex(0xffffff), Rgb::hex(0x9a9a9a), Rgb::hex(0x4a4a4a)];
const RAINBOW: &[Rgb] = &[
    Rgb::hex(0xff0000),
    Rgb::hex(0xff7f00),
    Rgb::hex(0xffff00),
    Rgb::hex(0x00ff00),
    Rgb::hex(0x0000ff),
    Rgb::hex(0x4b0082),
    Rgb::hex(0x9400d3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ColorScheme {
    Neon,
    Sunset,
    Ocean,
    Forest,
    Fire,
    #[value(alias = "vapor")]
    Vaporwave,
    Matrix,
    #[value(alias = "mono")]
    Monochrome,
    Rainbow,
}

impl ColorScheme {
    pub const fn all() -> [Self; 9] {
        [
            Self::Neon,
            Self::Sunset,
            Self::Ocean,
            Self::Forest,
            Self::Fire,
            Self::Vaporwave,
            Self::Matrix,
            Self::Monochrome,
            Self::Rainbow,
        ]
    }

    pub fn colors(self) -> &'static [Rgb] {
        match self {
            Self::Neon => NEON,
            Self::Sunset => SUNSET,
            Self::Ocean => OCEAN,
            Self::Forest => FOREST,
            Self::Fire => FIRE,
            Self::Vaporwave => VAPORWAVE,
            Self::Matrix => MATRIX,
            Self::Monochrome => MONOCHROME,
            Self::Rainbow => RAINBOW,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neon => "neon",
            Self::Sunset => "sunset",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Fire => "fire",
            Self::Vaporwave => "vaporwave",
            Self::Matrix => "matrix",
            Self::Monochrome => "monochrome",
            Self::Rainbow => "rainbow",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let key = normalize_name(name);
        Self::all()
            .into_iter()
            .find(|s| s.label() == key)
            .or(match key.as_str() {
                "vapor" => Some(Self::Vaporwave),
                "mono" => Some(Self::Monochrome),
                _ => None,
            })
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|s| *s == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|s| *s == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

/// A resolved, hue-shifted palette. Rebuilt only when the scheme or hue
/// changes, never per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    scheme: ColorScheme,
    hue_shift: f32,
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(scheme: ColorScheme, hue_shift: f32) -> Self {
        let colors = scheme
            .colors()
            .iter()
            .map(|c| c.rotate_hue(hue_shift))
            .collect();
        Self {
            scheme,
            hue_shift,
            colors,
        }
    }

    pub fn matches(&self, scheme: ColorScheme, hue_shift: f32) -> bool {
        self.scheme == scheme && self.hue_shift == hue_shift
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `i`, wrapping around the palette.
    pub fn at(&self, i: usize) -> Rgb {
        self.colors[i % self.colors.len()]
    }

    /// Continuous lookup over the whole palette for `t` in [0,1].
    pub fn sample(&self, t: f32) -> Rgb {
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }
        let x = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let i = (x.floor() as usize).min(n - 2);
        self.colors[i].lerp(self.colors[i + 1], x - i as f32)
    }

    /// Cyclic lookup: wraps from the last color back to the first.
    pub fn cycle(&self, t: f32) -> Rgb {
        let n = self.colors.len();
        let x = t.rem_euclid(1.0) * n as f32;
        let i = (x.floor() as usize).min(n - 1);
        self.colors[i].lerp(self.colors[(i + 1) % n], x - i as f32)
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

fn rgb_to_hsl(c: Rgb) -> (f32, f32, f32) {
    let r = c.0 as f32 / 255.0;
    let g = c.1 as f32 / 255.0;
    let b = c.2 as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let d = max - min;
    if d <= f32::EPSILON {
        return (0.0, 0.0, l);
    }
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s <= f32::EPSILON {
        let v = (l * 255.0).round() as u8;
        return Rgb(v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |mut t: f32| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgb(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}
