//! The explicit state object every input and every tick goes through.

use crate::commands::Command;
use crate::engine::RenderLoop;
use crate::params::{ParameterBundle, Toggle};
use crate::playback::{format_time, Player};
use crate::platform::MediaBackend;
use std::fmt::Write as _;
use tracing::debug;

pub struct Stage<B: MediaBackend> {
    pub player: Player<B>,
    pub params: ParameterBundle,
    pub engine: RenderLoop,
    show_hud: bool,
    show_help: bool,
    fullscreen: bool,
}

impl<B: MediaBackend> Stage<B> {
    pub fn new(player: Player<B>, params: ParameterBundle, engine: RenderLoop) -> Self {
        Self {
            player,
            params,
            engine,
            show_hud: true,
            show_help: false,
            fullscreen: false,
        }
    }

    /// Executes `cmd`. Returns `true` when the session should end.
    pub fn apply(&mut self, cmd: Command) -> bool {
        debug!(?cmd, "command");
        match cmd {
            Command::TogglePlay => self.player.toggle_play(),
            Command::Play => self.player.play(),
            Command::Pause => self.player.pause(),
            Command::Next => self.player.next(),
            Command::Prev => self.player.prev(),
            Command::Select(i) => self.player.select_index(i),
            Command::Remove(i) => self.player.remove_index(i),
            Command::RemoveActive => {
                if let Some(i) = self.player.active_index() {
                    self.player.remove_index(i);
                }
            }
            Command::Clear => self.player.clear(),
            Command::VolumeUp => self.player.volume_up(),
            Command::VolumeDown => self.player.volume_down(),
            Command::SetVolume(v) => self.player.set_volume(v),
            Command::ToggleMute => self.player.toggle_mute(),
            Command::Seek(fraction) => self.player.seek(fraction),
            Command::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            Command::NextMode => self.params.set_mode(self.params.mode().next()),
            Command::PrevMode => self.params.set_mode(self.params.mode().prev()),
            Command::SetMode(mode) => self.params.set_mode(mode),
            Command::NextScheme => self
                .params
                .set_color_scheme(self.params.color_scheme().next()),
            Command::PrevScheme => self
                .params
                .set_color_scheme(self.params.color_scheme().prev()),
            Command::SetScheme(scheme) => self.params.set_color_scheme(scheme),
            Command::Toggle(toggle) => self.params.flip(toggle),
            Command::StepSlider(slider, delta) => self.params.step_slider(slider, delta),
            Command::SetSlider(slider, value) => self.params.set_slider(slider, value),
            Command::StepHue(delta) => self
                .params
                .set_hue_shift(self.params.hue_shift() + delta),
            Command::ToggleHud => self.show_hud = !self.show_hud,
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::Quit => return true,
        }
        false
    }

    /// One render-loop iteration: media time, then the visual tick.
    pub fn tick(&mut self, dt: f32) {
        self.player.tick(dt);
        self.engine
            .tick(&self.params, self.player.spectrum_input(), dt);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.engine.resize(width, height);
    }

    pub fn hud_visible(&self) -> bool {
        self.show_hud && !self.fullscreen
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Status line: mode, scheme, item, transport, volume, flags and FPS.
    pub fn hud_line(&self, fps: f32) -> String {
        let p = &self.params;
        let mut s = String::new();
        let _ = write!(
            s,
            "Mode: {} | Scheme: {}",
            p.mode().label(),
            p.color_scheme().label()
        );

        match self.player.active_item() {
            Some(item) => {
                let index = self.player.active_index().unwrap_or(0);
                let state = if self.player.is_playing() { "playing" } else { "paused" };
                let _ = write!(
                    s,
                    " | {}/{} {} [{}] {}",
                    index + 1,
                    self.player.len(),
                    item.name,
                    item.kind,
                    state
                );
                if let Some(pos) = self.player.position() {
                    let _ = write!(
                        s,
                        " {}/{}",
                        format_time(pos.current_s),
                        format_time(pos.duration_s.unwrap_or(f32::NAN))
                    );
                }
            }
            None => s.push_str(" | no media"),
        }

        let vol = (self.player.volume() * 100.0).round() as u32;
        if self.player.is_muted() {
            let _ = write!(s, " | Vol: muted ({vol}%)");
        } else {
            let _ = write!(s, " | Vol: {vol}%");
        }

        let _ = write!(
            s,
            " | Int {:.0} Spd {:.0} Glow {:.0} Zoom {:.0} Hue {:.0}",
            p.intensity(),
            p.speed(),
            p.glow(),
            p.zoom(),
            p.hue_shift()
        );

        let flags: Vec<&str> = [
            Toggle::Mirror,
            Toggle::Rotate,
            Toggle::PulseBackground,
            Toggle::BassShake,
        ]
        .into_iter()
        .filter(|t| p.toggle(*t))
        .map(|t| t.label())
        .collect();
        if !flags.is_empty() {
            let _ = write!(s, " | {}", flags.join(","));
        }

        let _ = write!(s, " | FPS: {fps:.1}");
        s
    }
}
