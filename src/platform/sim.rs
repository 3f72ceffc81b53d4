use super::{FrequencyAnalyser, MediaBackend, MediaEvent, MediaPosition, PlatformError, SourceId};
use crate::media::{MediaKind, PlaylistItem};
use std::f32::consts::TAU;
use tracing::{debug, trace};

/// Browser analysers default to this time-smoothing constant.
const SMOOTHING: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct SimulatedOptions {
    pub bin_count: usize,
    pub track_seconds: f32,
    pub seed: u64,
    pub reject_play: bool,
}

impl Default for SimulatedOptions {
    fn default() -> Self {
        Self {
            bin_count: crate::spectrum::DEFAULT_BIN_COUNT,
            track_seconds: 180.0,
            seed: 0x10C0_57A6,
            reject_play: false,
        }
    }
}

struct Track {
    id: SourceId,
    seed: u64,
    kind: MediaKind,
    duration_s: Option<f32>,
    position_s: f32,
}

struct SimAnalyser {
    smoothed: Vec<f32>,
}

impl FrequencyAnalyser for SimAnalyser {
    fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    fn byte_frequency_data(&self, out: &mut [u8]) {
        for (dst, v) in out.iter_mut().zip(&self.smoothed) {
            *dst = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Deterministic stand-in for the host media stack.
///
/// Each attached item gets a seeded signal generator shaped like a club mix:
/// a kick on every beat in the low bins, a moving melodic band in the mids and
/// off-beat hats up top.
pub struct SimulatedBackend {
    opts: SimulatedOptions,
    next_id: u64,
    current: Option<Track>,
    playing: bool,
    volume: f32,
    muted: bool,
    connected: Vec<SourceId>,
    analyser: SimAnalyser,
    target: Vec<f32>,
    rng: fastrand::Rng,
    connect_calls: usize,
    released: Vec<String>,
}

impl SimulatedBackend {
    pub fn new(opts: SimulatedOptions) -> Self {
        let bins = opts.bin_count.max(1);
        let rng = fastrand::Rng::with_seed(opts.seed);
        Self {
            opts,
            next_id: 1,
            current: None,
            playing: false,
            volume: 1.0,
            muted: false,
            connected: Vec::new(),
            analyser: SimAnalyser {
                smoothed: vec![0.0; bins],
            },
            target: vec![0.0; bins],
            rng,
            connect_calls: 0,
            released: Vec::new(),
        }
    }

    pub fn set_reject_play(&mut self, reject: bool) {
        self.opts.reject_play = reject;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn connected_sources(&self) -> &[SourceId] {
        &self.connected
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls
    }

    pub fn released(&self) -> &[String] {
        &self.released
    }

    pub fn current_source(&self) -> Option<SourceId> {
        self.current.as_ref().map(|t| t.id)
    }

    fn synthesize(&mut self) {
        let Some(track) = self.current.as_ref() else {
            self.target.fill(0.0);
            return;
        };
        if !self.playing || !track.kind.has_audio() {
            self.target.fill(0.0);
            return;
        }

        let p = track.position_s;
        let bpm = 96.0 + (track.seed % 48) as f32;
        let beat = (p * bpm / 60.0).fract();
        let kick = (-beat * 7.0).exp();
        let hat = (-((beat + 0.5).fract()) * 18.0).exp();
        let melody_center = 0.22 + 0.12 * (p * 0.37 + (track.seed % 7) as f32).sin();
        let n = self.target.len() as f32;

        for (i, dst) in self.target.iter_mut().enumerate() {
            let x = i as f32 / n;
            let floor = (1.0 - x).powf(1.6) * 0.45;
            let low = if x < 0.08 { kick * (1.0 - x / 0.08 * 0.4) } else { 0.0 };
            let melody = 0.4 * (-((x - melody_center) * 18.0).powi(2)).exp()
                * (0.6 + 0.4 * (p * TAU * 0.5).sin());
            let top = if x > 0.55 { hat * 0.3 * (1.0 - x) } else { 0.0 };
            let noise = self.rng.f32() * 0.06;
            *dst = (floor + low + melody + top + noise).clamp(0.0, 1.0);
        }
    }
}

fn locator_seed(locator: &str) -> u64 {
    // FNV-1a
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in locator.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h
}

impl MediaBackend for SimulatedBackend {
    fn attach(&mut self, item: &PlaylistItem) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.playing = false;
        let duration_s = match item.kind {
            MediaKind::Image => None,
            MediaKind::Audio | MediaKind::Video => Some(self.opts.track_seconds.max(0.1)),
        };
        self.current = Some(Track {
            id,
            seed: self.opts.seed ^ locator_seed(&item.locator),
            kind: item.kind,
            duration_s,
            position_s: 0.0,
        });
        debug!(source = %id, item = %item.name, kind = %item.kind, "attached media");
        id
    }

    fn release(&mut self, item: &PlaylistItem) {
        self.released.push(item.locator.clone());
        trace!(locator = %item.locator, "released media handle");
    }

    fn connect(&mut self, source: SourceId) -> Result<(), PlatformError> {
        self.connect_calls += 1;
        if self.connected.contains(&source) {
            return Err(PlatformError::AlreadyConnected(source));
        }
        if self.current.as_ref().map(|t| t.id) != Some(source) {
            return Err(PlatformError::UnknownSource(source));
        }
        self.connected.push(source);
        Ok(())
    }

    fn disconnect(&mut self, source: SourceId) {
        self.connected.retain(|s| *s != source);
    }

    fn play(&mut self) -> Result<(), PlatformError> {
        if self.opts.reject_play {
            return Err(PlatformError::PlaybackRejected(
                "autoplay blocked".to_string(),
            ));
        }
        match self.current.as_ref() {
            Some(track) if track.kind.has_audio() => {
                self.playing = true;
                Ok(())
            }
            Some(_) => Err(PlatformError::PlaybackRejected(
                "image sources have no timeline".to_string(),
            )),
            None => Err(PlatformError::PlaybackRejected("no source attached".to_string())),
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn seek(&mut self, fraction: f32) {
        if let Some(track) = self.current.as_mut() {
            if let Some(d) = track.duration_s {
                track.position_s = fraction.clamp(0.0, 1.0) * d;
            }
        }
    }

    fn advance(&mut self, dt: f32) -> Option<MediaEvent> {
        let dt = dt.max(0.0);
        let mut event = None;
        if self.playing {
            if let Some(track) = self.current.as_mut() {
                track.position_s += dt;
                if let Some(d) = track.duration_s {
                    if track.position_s >= d {
                        track.position_s = d;
                        event = Some(MediaEvent::Ended);
                    }
                }
            }
        }
        if event.is_some() {
            self.playing = false;
        }

        self.synthesize();
        for (s, t) in self.analyser.smoothed.iter_mut().zip(&self.target) {
            *s = *s * SMOOTHING + *t * (1.0 - SMOOTHING);
        }
        event
    }

    fn analyser(&self) -> Option<&dyn FrequencyAnalyser> {
        let id = self.current.as_ref()?.id;
        if self.connected.contains(&id) {
            Some(&self.analyser)
        } else {
            None
        }
    }

    fn position(&self) -> Option<MediaPosition> {
        self.current.as_ref().map(|t| MediaPosition {
            current_s: t.position_s,
            duration_s: t.duration_s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connecting_the_same_source_twice_is_rejected() {
        let mut backend = SimulatedBackend::new(SimulatedOptions::default());
        let item = PlaylistItem::new("a", "a.mp3", MediaKind::Audio);
        let id = backend.attach(&item);
        assert!(backend.connect(id).is_ok());
        assert_eq!(backend.connect(id), Err(PlatformError::AlreadyConnected(id)));
    }

    #[test]
    fn playing_source_produces_nonzero_spectrum() {
        let mut backend = SimulatedBackend::new(SimulatedOptions::default());
        let item = PlaylistItem::new("a", "a.mp3", MediaKind::Audio);
        let id = backend.attach(&item);
        backend.connect(id).unwrap();
        backend.play().unwrap();
        for _ in 0..30 {
            backend.advance(1.0 / 60.0);
        }
        let analyser = backend.analyser().expect("connected analyser");
        let mut out = vec![0u8; analyser.bin_count()];
        analyser.byte_frequency_data(&mut out);
        assert!(out.iter().any(|&v| v > 0));
    }

    #[test]
    fn track_ends_after_its_duration() {
        let mut backend = SimulatedBackend::new(SimulatedOptions {
            track_seconds: 1.0,
            ..SimulatedOptions::default()
        });
        let item = PlaylistItem::new("a", "a.mp3", MediaKind::Audio);
        backend.attach(&item);
        backend.play().unwrap();
        assert_eq!(backend.advance(0.6), None);
        assert_eq!(backend.advance(0.6), Some(MediaEvent::Ended));
        assert!(!backend.is_playing());
    }
}
