use crate::render::{text_frame_begin, text_frame_end, write_bg_rgb, write_fg_rgb, Frame, Renderer};
use std::io::Write;

const HALF_BLOCK: &[u8] = "\u{2580}".as_bytes();

/// Two vertical pixels per cell: upper half in the foreground color, lower
/// half in the background color.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w, _h)) = text_frame_begin(frame, 1, 2, out)? else {
            return Ok(());
        };
        self.last_fg = None;
        self.last_bg = None;
        let px = frame.pixels_rgba;

        for row in 0..visual_rows {
            let top = row * 2 * w;
            let bottom = top + w;
            for x in 0..cols {
                let t = (top + x) * 4;
                let b = (bottom + x) * 4;
                let fg = (px[t], px[t + 1], px[t + 2]);
                let bg = (px[b], px[b + 1], px[b + 2]);
                if self.last_fg != Some(fg) {
                    write_fg_rgb(out, fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write_bg_rgb(out, bg.0, bg.1, bg.2)?;
                    self.last_bg = Some(bg);
                }
                out.write_all(HALF_BLOCK)?;
            }
            // A newline after the bottom row would scroll the screen when
            // the HUD is hidden.
            if row + 1 < visual_rows {
                out.write_all(b"\r\n")?;
            }
        }

        text_frame_end(frame, cols, visual_rows, out)
    }
}
