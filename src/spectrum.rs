use crate::platform::FrequencyAnalyser;

pub const DEFAULT_BIN_COUNT: usize = 256;
pub const MIN_BIN_COUNT: usize = 32;
pub const MAX_BIN_COUNT: usize = 2048;
/// Width of the low sub-band averaged into the bass level.
pub const BASS_BINS: usize = 10;

/// Fixed-length magnitude array, one unsigned sample per frequency bin.
///
/// The length is chosen once and never changes for the lifetime of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumFrame {
    bins: Vec<u8>,
}

impl SpectrumFrame {
    pub fn new(len: usize) -> Self {
        Self {
            bins: vec![0; len.max(1)],
        }
    }

    pub fn from_bins(bins: Vec<u8>) -> Self {
        if bins.is_empty() {
            return Self::new(1);
        }
        Self { bins }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Direct lookup; out-of-range reads as silence.
    pub fn get(&self, i: usize) -> u8 {
        self.bins.get(i).copied().unwrap_or(0)
    }

    /// Lookup for a consumer that wants `required` samples: index `i` maps to
    /// `floor(i / required * available)`.
    pub fn proportional(&self, i: usize, required: usize) -> u8 {
        if required == 0 {
            return 0;
        }
        let idx = (i as u64 * self.bins.len() as u64 / required as u64) as usize;
        self.get(idx)
    }

    /// Modulo lookup; indices past the end tile the spectrum again.
    pub fn wrapped(&self, i: usize) -> u8 {
        self.bins[i % self.bins.len()]
    }

    /// Normalized magnitude in [0,1].
    pub fn level(&self, i: usize, required: usize) -> f32 {
        self.proportional(i, required) as f32 / 255.0
    }

    pub fn fill(&mut self, v: u8) {
        self.bins.fill(v);
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [u8] {
        &mut self.bins
    }
}

/// Scalars derived once per tick from the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateSignal {
    /// Mean over all bins, 0..=255.
    pub mean: f32,
    /// Mean over the lowest `BASS_BINS` bins, 0..=255.
    pub bass: f32,
    pub peak: u8,
}

impl AggregateSignal {
    pub fn compute(frame: &SpectrumFrame) -> Self {
        let bins = frame.bins();
        let sum: u32 = bins.iter().map(|&b| b as u32).sum();
        let bass_slice = &bins[..BASS_BINS.min(bins.len())];
        let bass_sum: u32 = bass_slice.iter().map(|&b| b as u32).sum();
        Self {
            mean: sum as f32 / bins.len() as f32,
            bass: bass_sum as f32 / bass_slice.len() as f32,
            peak: bins.iter().copied().max().unwrap_or(0),
        }
    }

    pub fn mean_level(&self) -> f32 {
        (self.mean / 255.0).clamp(0.0, 1.0)
    }

    pub fn bass_level(&self) -> f32 {
        (self.bass / 255.0).clamp(0.0, 1.0)
    }
}

/// What feeds the spectrum this tick.
pub enum SpectrumInput<'a> {
    /// Nothing loaded: the frame is zeroed.
    Silent,
    /// Audio/video item without a live analyser (paused, not yet connected):
    /// the frame keeps its previous contents.
    Detached,
    /// Live analyser attached to the active source.
    Analyser(&'a dyn FrequencyAnalyser),
    /// Still image: synthesize a signal from the animation clock.
    Image,
}

impl SpectrumInput<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Detached => "detached",
            Self::Analyser(_) => "analyser",
            Self::Image => "image",
        }
    }
}

/// Synthetic magnitude used for still images.
pub fn image_sample(i: usize, t: f32) -> u8 {
    let i = i as f32;
    let v = 128.0 + 64.0 * (2.0 * t + 0.1 * i).sin() + 32.0 * (5.0 * t + 0.05 * i).sin();
    v.round().clamp(0.0, 255.0) as u8
}

pub struct SpectrumSource {
    frame: SpectrumFrame,
}

impl SpectrumSource {
    pub fn new(bin_count: usize) -> Self {
        Self {
            frame: SpectrumFrame::new(bin_count.clamp(MIN_BIN_COUNT, MAX_BIN_COUNT)),
        }
    }

    pub fn bin_count(&self) -> usize {
        self.frame.len()
    }

    pub fn current_frame(&self) -> &SpectrumFrame {
        &self.frame
    }

    /// Refreshes the frame in place. Never fails: a disconnected or
    /// mismatched analyser degrades to a partial or no-op update.
    pub fn refresh(&mut self, input: SpectrumInput<'_>, t: f32) {
        match input {
            SpectrumInput::Silent => self.frame.fill(0),
            SpectrumInput::Detached => {}
            SpectrumInput::Analyser(analyser) => {
                let available = analyser.bin_count();
                if available == 0 {
                    return;
                }
                let len = self.frame.len();
                if available == len {
                    analyser.byte_frequency_data(self.frame.bins_mut());
                } else {
                    // Resample proportionally into the fixed-length frame.
                    let mut scratch = vec![0u8; available];
                    analyser.byte_frequency_data(&mut scratch);
                    for (i, dst) in self.frame.bins_mut().iter_mut().enumerate() {
                        let src = (i as u64 * available as u64 / len as u64) as usize;
                        *dst = scratch.get(src).copied().unwrap_or(0);
                    }
                }
            }
            SpectrumInput::Image => {
                for (i, dst) in self.frame.bins_mut().iter_mut().enumerate() {
                    *dst = image_sample(i, t);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_lookup_spreads_and_clamps() {
        let frame = SpectrumFrame::from_bins((0..8).map(|v| v * 10).collect());
        assert_eq!(frame.proportional(0, 4), 0);
        assert_eq!(frame.proportional(1, 4), 20);
        assert_eq!(frame.proportional(3, 4), 60);
        assert_eq!(frame.proportional(4, 4), 0);
        assert_eq!(frame.proportional(1, 0), 0);
    }

    #[test]
    fn wrapped_lookup_tiles() {
        let frame = SpectrumFrame::from_bins(vec![1, 2, 3]);
        assert_eq!(frame.wrapped(4), 2);
    }
}
