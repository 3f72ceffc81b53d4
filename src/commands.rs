//! External inputs as commands, and the key table that produces them.

use crate::palette::ColorScheme;
use crate::params::{Mode, Slider, Toggle};
use crossterm::event::{KeyCode, KeyModifiers};

/// Slider change per key press, in slider units.
pub const SLIDER_STEP: f32 = 5.0;
/// Hue change per key press, in degrees.
pub const HUE_STEP: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TogglePlay,
    Play,
    Pause,
    Next,
    Prev,
    Select(usize),
    Remove(usize),
    RemoveActive,
    Clear,
    VolumeUp,
    VolumeDown,
    SetVolume(f32),
    ToggleMute,
    /// Fraction of the current media's duration.
    Seek(f32),
    ToggleFullscreen,
    NextMode,
    PrevMode,
    SetMode(Mode),
    NextScheme,
    PrevScheme,
    SetScheme(ColorScheme),
    Toggle(Toggle),
    StepSlider(Slider, f32),
    SetSlider(Slider, f32),
    StepHue(f32),
    ToggleHud,
    ToggleHelp,
    Quit,
}

/// Maps terminal keys to commands. Character keys are matched by the
/// character itself, so `g` and `G` can carry different commands.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    table: Vec<(KeyCode, Command)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let table = vec![
            (KeyCode::Char(' '), Command::TogglePlay),
            (KeyCode::Right, Command::Next),
            (KeyCode::Left, Command::Prev),
            (KeyCode::Up, Command::VolumeUp),
            (KeyCode::Down, Command::VolumeDown),
            (KeyCode::Char('m'), Command::ToggleMute),
            (KeyCode::Char('M'), Command::ToggleMute),
            (KeyCode::Char('f'), Command::ToggleFullscreen),
            (KeyCode::Char('F'), Command::ToggleFullscreen),
            (KeyCode::Tab, Command::NextMode),
            (KeyCode::BackTab, Command::PrevMode),
            (KeyCode::Char('c'), Command::NextScheme),
            (KeyCode::Char('C'), Command::PrevScheme),
            (KeyCode::Char('1'), Command::Toggle(Toggle::Mirror)),
            (KeyCode::Char('2'), Command::Toggle(Toggle::Rotate)),
            (KeyCode::Char('3'), Command::Toggle(Toggle::PulseBackground)),
            (KeyCode::Char('4'), Command::Toggle(Toggle::BassShake)),
            (KeyCode::Char(']'), Command::StepSlider(Slider::Intensity, SLIDER_STEP)),
            (KeyCode::Char('['), Command::StepSlider(Slider::Intensity, -SLIDER_STEP)),
            (KeyCode::Char('='), Command::StepSlider(Slider::Speed, SLIDER_STEP)),
            (KeyCode::Char('-'), Command::StepSlider(Slider::Speed, -SLIDER_STEP)),
            (KeyCode::Char('G'), Command::StepSlider(Slider::Glow, SLIDER_STEP)),
            (KeyCode::Char('g'), Command::StepSlider(Slider::Glow, -SLIDER_STEP)),
            (KeyCode::Char('Z'), Command::StepSlider(Slider::Zoom, SLIDER_STEP)),
            (KeyCode::Char('z'), Command::StepSlider(Slider::Zoom, -SLIDER_STEP)),
            (KeyCode::Char('H'), Command::StepHue(HUE_STEP)),
            (KeyCode::Char('h'), Command::StepHue(-HUE_STEP)),
            (KeyCode::Delete, Command::RemoveActive),
            (KeyCode::Char('x'), Command::Clear),
            (KeyCode::Char('i'), Command::ToggleHud),
            (KeyCode::Char('I'), Command::ToggleHud),
            (KeyCode::Char('?'), Command::ToggleHelp),
            (KeyCode::F(1), Command::ToggleHelp),
            (KeyCode::Char('q'), Command::Quit),
            (KeyCode::Char('Q'), Command::Quit),
            (KeyCode::Esc, Command::Quit),
        ];
        Self { table }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self { table: Vec::new() }
    }

    /// Binds `code` to `cmd`, replacing any previous binding for that key.
    pub fn bind(&mut self, code: KeyCode, cmd: Command) {
        self.unbind(code);
        self.table.push((code, cmd));
    }

    pub fn unbind(&mut self, code: KeyCode) {
        self.table.retain(|(k, _)| *k != code);
    }

    pub fn lookup(&self, code: KeyCode, mods: KeyModifiers) -> Option<Command> {
        if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            return Some(Command::Quit);
        }
        self.table
            .iter()
            .find(|(k, _)| *k == code)
            .map(|(_, cmd)| *cmd)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

pub fn help_text() -> &'static str {
    "Lounge Visualizer Hotkeys\n\
space  play/pause\n\
←/→  previous/next item\n\
↑/↓  volume up/down\n\
m  mute\n\
f  fullscreen (hide HUD)\n\
tab / shift-tab  next/previous mode\n\
c / C  next/previous color scheme\n\
1/2/3/4  mirror/rotate/pulse background/bass shake\n\
[ / ]  intensity down/up\n\
- / =  speed down/up\n\
g / G  glow down/up\n\
z / Z  zoom down/up\n\
h / H  hue shift\n\
delete  remove active item\n\
x  clear playlist\n\
i  show/hide HUD\n\
?  toggle this help\n\
q or esc  quit"
}
