use crate::commands::{help_text, KeyBindings};
use crate::config::{Config, RendererMode};
use crate::engine::RenderLoop;
use crate::logging::{self, LogTarget};
use crate::platform::{SimulatedBackend, SimulatedOptions};
use crate::playback::Player;
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::stage::Stage;
use crate::terminal::TerminalGuard;
use anyhow::Context;
use crossterm::event::{self, Event, KeyEventKind};
use std::io::BufWriter;
use std::time::{Duration, Instant};
use tracing::info;

/// Most rows the HUD may take.
const MAX_HUD_ROWS: u16 = 3;
/// Width of a fully populated status line (media, volume, flags, FPS).
const HUD_FULL_WIDTH: usize = 120;

/// Builds the explicit session state for `cfg` on a `width` x `height`
/// surface, queueing `cfg.items`.
pub fn build_stage(cfg: &Config, width: usize, height: usize) -> Stage<SimulatedBackend> {
    let backend = SimulatedBackend::new(SimulatedOptions {
        bin_count: cfg.bins,
        track_seconds: cfg.track_seconds,
        seed: cfg.seed,
        reject_play: false,
    });
    let mut player = Player::new(backend);
    player.set_volume(cfg.volume_gain());
    let added = player.add_locators(&cfg.items);
    info!(added, requested = cfg.items.len(), "playlist ready");

    let engine = RenderLoop::new(width, height, cfg.bins, cfg.seed);
    Stage::new(player, cfg.parameters(), engine)
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let target = match &cfg.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Off,
    };
    let _log_guard = logging::init(&cfg.log_level, target)?;

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    };
    let px = renderer.cell_pixels();
    let keys = KeyBindings::default();

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut last_size = TerminalGuard::size()?;
    let mut hud_rows = hud_rows_for_size(last_size, true);
    let (w, h) = surface_size(last_size, hud_rows, px);
    let mut stage = build_stage(&cfg, w, h);
    info!(renderer = renderer.name(), width = w, height = h, "session start");

    let mut fps = FpsCounter::new();
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(cmd) = keys.lookup(k.code, k.modifiers) {
                    if stage.apply(cmd) {
                        info!("quit");
                        return Ok(());
                    }
                }
            }
        }

        // Polled every frame; some terminals drop resize events.
        let size = crossterm::terminal::size().context("get terminal size")?;
        let hud = if stage.hud_visible() {
            wrap_hud(size.0 as usize, &stage.hud_line(fps.fps()))
        } else {
            String::new()
        };
        let rows_needed = hud_rows_for_size(size, stage.hud_visible());
        if size != last_size || rows_needed != hud_rows {
            last_size = size;
            hud_rows = rows_needed;
            let (w, h) = surface_size(last_size, hud_rows, px);
            stage.resize(w, h);
        }

        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;
        stage.tick(dt);

        let (term_cols, term_rows) = last_size;
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let surface = stage.engine.surface();
        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: surface.width(),
            pixel_height: surface.height(),
            pixels_rgba: stage.engine.pixels(),
            hud: &hud,
            hud_rows,
            overlay: stage.help_visible().then(help_text),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn surface_size(size: (u16, u16), hud_rows: u16, px: (usize, usize)) -> (usize, usize) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    (cols as usize * px.0, visual_rows as usize * px.1)
}

/// Rows reserved for the status line. Depends on the terminal size only, so
/// the surface keeps its size while the text changes length; overflow is
/// clipped by the presenter.
pub(crate) fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    let (cols, rows) = size;
    if !show_hud || rows <= 1 {
        return 0;
    }
    let wanted = HUD_FULL_WIDTH
        .div_ceil(cols.max(1) as usize)
        .clamp(1, MAX_HUD_ROWS as usize) as u16;
    wanted.min(rows - 1)
}

/// Breaks the status line at `|` separators so each row fits in `cols`;
/// a single segment wider than `cols` is clipped by the presenter.
pub(crate) fn wrap_hud(cols: usize, line: &str) -> String {
    let cols = cols.max(1);
    let mut rows: Vec<String> = Vec::new();
    let mut cur = String::new();
    for seg in line.split(" | ") {
        let extra = if cur.is_empty() { 0 } else { 3 };
        if !cur.is_empty() && cur.chars().count() + extra + seg.chars().count() > cols {
            rows.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push_str(" | ");
        }
        cur.push_str(seg);
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows.join("\n")
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
