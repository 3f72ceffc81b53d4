use crate::palette::ColorScheme;
use crate::params::{Mode, ParameterBundle, Toggle};
use crate::spectrum::{DEFAULT_BIN_COUNT, MAX_BIN_COUNT, MIN_BIN_COUNT};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lounge-viz",
    version,
    about = "Audio-reactive lounge visualizer for true-color terminals"
)]
pub struct Config {
    /// Media files or URLs to queue. Kind is inferred from the extension.
    pub items: Vec<String>,

    #[arg(long, value_enum, default_value_t = Mode::Bars)]
    pub mode: Mode,

    #[arg(long, value_enum, default_value_t = ColorScheme::Neon)]
    pub scheme: ColorScheme,

    #[arg(long, default_value_t = 50.0)]
    pub intensity: f32,

    #[arg(long, default_value_t = 50.0)]
    pub speed: f32,

    #[arg(long, default_value_t = 30.0)]
    pub glow: f32,

    #[arg(long, default_value_t = 50.0)]
    pub zoom: f32,

    /// Palette hue rotation in degrees.
    #[arg(long, default_value_t = 0.0)]
    pub hue: f32,

    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    #[arg(long, default_value_t = false)]
    pub rotate: bool,

    #[arg(long, default_value_t = false)]
    pub pulse_background: bool,

    #[arg(long, default_value_t = false)]
    pub bass_shake: bool,

    /// Initial volume, 0-100.
    #[arg(long, default_value_t = 70.0)]
    pub volume: f32,

    /// Spectrum bins; a power of two.
    #[arg(long, default_value_t = DEFAULT_BIN_COUNT, value_parser = parse_bins)]
    pub bins: usize,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    /// Length of each simulated audio/video track.
    #[arg(long, default_value_t = 180.0)]
    pub track_seconds: f32,

    #[arg(long, default_value_t = 0x10C0_57A6)]
    pub seed: u64,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log destination. The terminal is busy rendering, so nothing is logged
    /// without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}

impl Config {
    /// Starting parameters; out-of-range sliders clamp.
    pub fn parameters(&self) -> ParameterBundle {
        let mut p = ParameterBundle::default();
        p.set_mode(self.mode);
        p.set_color_scheme(self.scheme);
        p.set_intensity(self.intensity);
        p.set_speed(self.speed);
        p.set_glow(self.glow);
        p.set_zoom(self.zoom);
        p.set_hue_shift(self.hue);
        p.set_toggle(Toggle::Mirror, self.mirror);
        p.set_toggle(Toggle::Rotate, self.rotate);
        p.set_toggle(Toggle::PulseBackground, self.pulse_background);
        p.set_toggle(Toggle::BassShake, self.bass_shake);
        p
    }

    /// Volume as a 0..=1 gain.
    pub fn volume_gain(&self) -> f32 {
        if self.volume.is_finite() {
            (self.volume / 100.0).clamp(0.0, 1.0)
        } else {
            crate::playback::DEFAULT_VOLUME
        }
    }
}

fn parse_bins(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !(MIN_BIN_COUNT..=MAX_BIN_COUNT).contains(&n) || !n.is_power_of_two() {
        return Err(format!(
            "bins must be a power of two in {MIN_BIN_COUNT}..={MAX_BIN_COUNT}"
        ));
    }
    Ok(n)
}
