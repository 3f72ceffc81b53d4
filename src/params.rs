use crate::palette::{normalize_name, ColorScheme};
use clap::ValueEnum;

pub const SLIDER_MIN: f32 = 0.0;
pub const SLIDER_MAX: f32 = 100.0;
pub const SLIDER_BASELINE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Mode {
    Bars,
    Wave,
    Circular,
    Particles,
    Galaxy,
    Dna,
    Terrain,
    Matrix,
    Fire,
    #[value(alias = "kaleido")]
    Kaleidoscope,
    Waveform,
    Spectrum,
    Tunnel,
}

impl Mode {
    pub const COUNT: usize = 13;

    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Bars,
            Self::Wave,
            Self::Circular,
            Self::Particles,
            Self::Galaxy,
            Self::Dna,
            Self::Terrain,
            Self::Matrix,
            Self::Fire,
            Self::Kaleidoscope,
            Self::Waveform,
            Self::Spectrum,
            Self::Tunnel,
        ]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Wave => "wave",
            Self::Circular => "circular",
            Self::Particles => "particles",
            Self::Galaxy => "galaxy",
            Self::Dna => "dna",
            Self::Terrain => "terrain",
            Self::Matrix => "matrix",
            Self::Fire => "fire",
            Self::Kaleidoscope => "kaleidoscope",
            Self::Waveform => "waveform",
            Self::Spectrum => "spectrum",
            Self::Tunnel => "tunnel",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let key = normalize_name(name);
        if key == "kaleido" {
            return Some(Self::Kaleidoscope);
        }
        Self::all().into_iter().find(|m| m.label() == key)
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    /// Modes whose output includes per-draw randomness.
    pub fn is_stochastic(self) -> bool {
        matches!(self, Self::Matrix | Self::Fire)
    }
}

/// Slider identifiers for the 0..=100 numeric controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Intensity,
    Speed,
    Glow,
    Zoom,
}

impl Slider {
    pub fn label(self) -> &'static str {
        match self {
            Self::Intensity => "intensity",
            Self::Speed => "speed",
            Self::Glow => "glow",
            Self::Zoom => "zoom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Mirror,
    Rotate,
    PulseBackground,
    BassShake,
}

impl Toggle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Rotate => "rotate",
            Self::PulseBackground => "pulse",
            Self::BassShake => "shake",
        }
    }
}

/// Visual configuration read by the render loop and every mode.
///
/// Written only through the clamping setters; modes receive `&ParameterBundle`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBundle {
    mode: Mode,
    color_scheme: ColorScheme,
    intensity: f32,
    speed: f32,
    glow: f32,
    zoom: f32,
    hue_shift: f32,
    mirror: bool,
    rotate: bool,
    pulse_background: bool,
    bass_shake: bool,
}

impl Default for ParameterBundle {
    fn default() -> Self {
        Self {
            mode: Mode::Bars,
            color_scheme: ColorScheme::Neon,
            intensity: SLIDER_BASELINE,
            speed: SLIDER_BASELINE,
            glow: 30.0,
            zoom: SLIDER_BASELINE,
            hue_shift: 0.0,
            mirror: false,
            rotate: false,
            pulse_background: false,
            bass_shake: false,
        }
    }
}

impl ParameterBundle {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn glow(&self) -> f32 {
        self.glow
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn hue_shift(&self) -> f32 {
        self.hue_shift
    }

    pub fn slider(&self, slider: Slider) -> f32 {
        match slider {
            Slider::Intensity => self.intensity,
            Slider::Speed => self.speed,
            Slider::Glow => self.glow,
            Slider::Zoom => self.zoom,
        }
    }

    pub fn set_slider(&mut self, slider: Slider, value: f32) {
        let v = clamp_slider(value);
        match slider {
            Slider::Intensity => self.intensity = v,
            Slider::Speed => self.speed = v,
            Slider::Glow => self.glow = v,
            Slider::Zoom => self.zoom = v,
        }
    }

    pub fn step_slider(&mut self, slider: Slider, delta: f32) {
        self.set_slider(slider, self.slider(slider) + delta);
    }

    pub fn set_intensity(&mut self, v: f32) {
        self.set_slider(Slider::Intensity, v);
    }

    pub fn set_speed(&mut self, v: f32) {
        self.set_slider(Slider::Speed, v);
    }

    pub fn set_glow(&mut self, v: f32) {
        self.set_slider(Slider::Glow, v);
    }

    pub fn set_zoom(&mut self, v: f32) {
        self.set_slider(Slider::Zoom, v);
    }

    /// Hue rotation in degrees, wrapped into [0,360).
    pub fn set_hue_shift(&mut self, degrees: f32) {
        let wrapped = if degrees.is_finite() {
            degrees.rem_euclid(360.0)
        } else {
            0.0
        };
        // rem_euclid rounds tiny negatives up to exactly 360.
        self.hue_shift = if wrapped >= 360.0 { 0.0 } else { wrapped };
    }

    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Mirror => self.mirror,
            Toggle::Rotate => self.rotate,
            Toggle::PulseBackground => self.pulse_background,
            Toggle::BassShake => self.bass_shake,
        }
    }

    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) {
        match toggle {
            Toggle::Mirror => self.mirror = on,
            Toggle::Rotate => self.rotate = on,
            Toggle::PulseBackground => self.pulse_background = on,
            Toggle::BassShake => self.bass_shake = on,
        }
    }

    pub fn flip(&mut self, toggle: Toggle) {
        let on = self.toggle(toggle);
        self.set_toggle(toggle, !on);
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    pub fn rotate(&self) -> bool {
        self.rotate
    }

    pub fn pulse_background(&self) -> bool {
        self.pulse_background
    }

    pub fn bass_shake(&self) -> bool {
        self.bass_shake
    }

    /// 1.0 at the slider midpoint, 0.0..=2.0 over the full range.
    pub fn intensity_mul(&self) -> f32 {
        self.intensity / SLIDER_BASELINE
    }

    /// Scales the per-tick time step; 1.0 at the slider midpoint.
    pub fn speed_mul(&self) -> f32 {
        self.speed / SLIDER_BASELINE
    }

    /// 0.5..=1.5, 1.0 at the slider midpoint. Never collapses geometry to 0.
    pub fn zoom_mul(&self) -> f32 {
        0.5 + self.zoom / SLIDER_MAX
    }

    /// Halo width in pixels drawn under strokes.
    pub fn glow_px(&self) -> f32 {
        self.glow / SLIDER_MAX * 12.0
    }
}

fn clamp_slider(v: f32) -> f32 {
    if v.is_nan() {
        return SLIDER_BASELINE;
    }
    v.clamp(SLIDER_MIN, SLIDER_MAX)
}
