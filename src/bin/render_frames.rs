use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lounge_viz::engine::RenderLoop;
use lounge_viz::logging::{self, LogTarget};
use lounge_viz::media::{MediaKind, PlaylistItem};
use lounge_viz::palette::ColorScheme;
use lounge_viz::params::{Mode, ParameterBundle};
use lounge_viz::platform::{SimulatedBackend, SimulatedOptions};
use lounge_viz::playback::Player;
use lounge_viz::spectrum::DEFAULT_BIN_COUNT;
use lounge_viz::stage::Stage;
use tracing::info;

const DEFAULT_OUTPUT_DIR: &str = "frames";
const DEFAULT_SEED: u64 = 0x10C0_57A6;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "render_frames",
    version,
    about = "Headless export of visualizer frames as binary PPM images"
)]
pub(crate) struct Cli {
    /// Media to play. With none, frames use the still-image signal.
    pub(crate) items: Vec<String>,

    #[arg(long, value_enum, default_value_t = Mode::Bars)]
    pub(crate) mode: Mode,

    #[arg(long, value_enum, default_value_t = ColorScheme::Neon)]
    pub(crate) scheme: ColorScheme,

    #[arg(long, default_value_t = 320)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = 180)]
    pub(crate) height: usize,

    #[arg(long, default_value_t = 120)]
    pub(crate) frames: usize,

    #[arg(long, default_value_t = 30)]
    pub(crate) fps: u32,

    #[arg(long, default_value_t = 50.0)]
    pub(crate) intensity: f32,

    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub(crate) out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,

    #[arg(long, default_value = "info")]
    pub(crate) log_level: String,
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.frames == 0 {
        bail!("--frames must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    Ok(())
}

pub(crate) fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:04}.ppm"))
}

/// Binary PPM (P6); alpha is dropped.
pub(crate) fn write_ppm(out: &mut dyn Write, width: usize, height: usize, rgba: &[u8]) -> Result<()> {
    let need = width * height * 4;
    if rgba.len() < need {
        bail!("pixel buffer too small (need {need}, got {})", rgba.len());
    }
    write!(out, "P6\n{width} {height}\n255\n")?;
    let mut row = Vec::with_capacity(width * 3);
    for y in 0..height {
        row.clear();
        for px in rgba[y * width * 4..(y + 1) * width * 4].chunks_exact(4) {
            row.extend_from_slice(&px[..3]);
        }
        out.write_all(&row)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let _log_guard = logging::init(&args.log_level, LogTarget::Stderr)?;
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;
    fs::create_dir_all(&args.out)
        .with_context(|| format!("create output directory {}", args.out.display()))?;

    let backend = SimulatedBackend::new(SimulatedOptions {
        bin_count: DEFAULT_BIN_COUNT,
        seed: args.seed,
        ..SimulatedOptions::default()
    });
    let mut player = Player::new(backend);
    if player.add_locators(&args.items) == 0 {
        player.add_item(PlaylistItem::new("still", "still.png", MediaKind::Image));
    }

    let mut params = ParameterBundle::default();
    params.set_mode(args.mode);
    params.set_color_scheme(args.scheme);
    params.set_intensity(args.intensity);

    let engine = RenderLoop::new(args.width, args.height, DEFAULT_BIN_COUNT, args.seed);
    let mut stage = Stage::new(player, params, engine);
    let dt = 1.0 / args.fps as f32;

    for i in 0..args.frames {
        stage.tick(dt);
        let path = frame_path(&args.out, i);
        let file = fs::File::create(&path)
            .with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_ppm(&mut w, args.width, args.height, stage.engine.pixels())
            .with_context(|| format!("write {}", path.display()))?;
        w.flush()?;
    }

    info!(
        frames = args.frames,
        mode = args.mode.label(),
        dir = %args.out.display(),
        "export finished"
    );
    println!(
        "rendered {} frames ({}x{}, {}) -> {}",
        args.frames,
        args.width,
        args.height,
        args.mode.label(),
        args.out.display()
    );
    Ok(())
}
