//! Playlist and playback session state machine.
//!
//! The player owns the only audio-graph connection. Every transition that
//! changes the active source disconnects the old source before the new one
//! is attached, and every failure is logged and swallowed.

use crate::media::{MediaKind, PlaylistItem};
use crate::platform::{MediaBackend, MediaEvent, MediaPosition, PlatformError, SourceId};
use crate::spectrum::SpectrumInput;
use tracing::{debug, info, warn};

pub const VOLUME_STEP: f32 = 0.1;
pub const DEFAULT_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Empty,
    Loaded { index: usize },
}

pub struct Player<B: MediaBackend> {
    backend: B,
    items: Vec<PlaylistItem>,
    state: PlaybackState,
    playing: bool,
    connection: Option<SourceId>,
    source: Option<SourceId>,
    volume: f32,
    muted: bool,
}

impl<B: MediaBackend> Player<B> {
    pub fn new(mut backend: B) -> Self {
        backend.set_volume(DEFAULT_VOLUME);
        backend.set_muted(false);
        Self {
            backend,
            items: Vec::new(),
            state: PlaybackState::Empty,
            playing: false,
            connection: None,
            source: None,
            volume: DEFAULT_VOLUME,
            muted: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Empty => None,
            PlaybackState::Loaded { index } => Some(index),
        }
    }

    pub fn active_item(&self) -> Option<&PlaylistItem> {
        self.active_index().and_then(|i| self.items.get(i))
    }

    pub fn active_kind(&self) -> Option<MediaKind> {
        self.active_item().map(|item| item.kind)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// The connected source node, if any.
    pub fn connection(&self) -> Option<SourceId> {
        self.connection
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Appends `item`; the first item added to an empty playlist starts
    /// playing immediately.
    pub fn add_item(&mut self, item: PlaylistItem) {
        info!(name = %item.name, kind = %item.kind, "playlist add");
        self.items.push(item);
        if self.state == PlaybackState::Empty {
            self.select_index(0);
        }
    }

    /// Queues every locator whose kind can be inferred; the rest are skipped
    /// with a warning. Returns how many were added.
    pub fn add_locators<S: AsRef<str>>(&mut self, locators: &[S]) -> usize {
        let mut added = 0;
        for locator in locators {
            match PlaylistItem::from_locator(locator.as_ref()) {
                Ok(item) => {
                    self.add_item(item);
                    added += 1;
                }
                Err(err) => warn!(locator = locator.as_ref(), error = %err, "skipping media"),
            }
        }
        added
    }

    /// Makes item `i` active and starts it. Out of range is a no-op.
    pub fn select_index(&mut self, i: usize) {
        if i >= self.items.len() {
            debug!(index = i, len = self.items.len(), "select ignored: out of range");
            return;
        }
        self.load(i);
        self.start();
    }

    /// Removes item `i`, releasing its resource. Removing the active item
    /// stops playback first and leaves the next item at the same position
    /// loaded and paused.
    pub fn remove_index(&mut self, i: usize) {
        if i >= self.items.len() {
            debug!(index = i, len = self.items.len(), "remove ignored: out of range");
            return;
        }
        let active = self.active_index();
        if active == Some(i) {
            self.stop();
        }

        let item = self.items.remove(i);
        self.backend.release(&item);
        info!(name = %item.name, "playlist remove");

        if self.items.is_empty() {
            self.state = PlaybackState::Empty;
            self.source = None;
            return;
        }
        match active {
            Some(a) if a == i => {
                let next = i.min(self.items.len() - 1);
                self.load(next);
            }
            Some(a) if a > i => self.state = PlaybackState::Loaded { index: a - 1 },
            _ => {}
        }
    }

    /// Empties the playlist and releases every item.
    pub fn clear(&mut self) {
        self.stop();
        for item in self.items.drain(..) {
            self.backend.release(&item);
        }
        self.state = PlaybackState::Empty;
        self.source = None;
        info!("playlist cleared");
    }

    pub fn next(&mut self) {
        if let Some(i) = self.active_index() {
            self.select_index((i + 1) % self.items.len());
        }
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.active_index() {
            let len = self.items.len();
            self.select_index((i + len - 1) % len);
        }
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn play(&mut self) {
        if self.active_index().is_none() || self.playing {
            return;
        }
        self.start();
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.backend.pause();
        self.playing = false;
    }

    pub fn set_volume(&mut self, volume: f32) {
        let v = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { self.volume };
        self.volume = v;
        self.backend.set_volume(v);
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.volume + VOLUME_STEP);
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.volume - VOLUME_STEP);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.backend.set_muted(self.muted);
    }

    pub fn seek(&mut self, fraction: f32) {
        if self.active_index().is_none() || !fraction.is_finite() {
            return;
        }
        self.backend.seek(fraction.clamp(0.0, 1.0));
    }

    /// Lets `dt` seconds of media time pass; end of media advances.
    pub fn tick(&mut self, dt: f32) {
        if let Some(MediaEvent::Ended) = self.backend.advance(dt) {
            self.on_ended();
        }
    }

    pub fn on_ended(&mut self) {
        debug!("media ended");
        self.playing = false;
        self.next();
    }

    pub fn position(&self) -> Option<MediaPosition> {
        self.active_index()?;
        self.backend.position()
    }

    /// What the spectrum source should read this tick.
    pub fn spectrum_input(&self) -> SpectrumInput<'_> {
        match self.active_kind() {
            None => SpectrumInput::Silent,
            Some(MediaKind::Image) => SpectrumInput::Image,
            Some(_) => match self.backend.analyser() {
                Some(analyser) if self.connection.is_some() => SpectrumInput::Analyser(analyser),
                _ => SpectrumInput::Detached,
            },
        }
    }

    /// Tears down the current connection and attaches item `i`, paused.
    fn load(&mut self, i: usize) {
        self.stop();
        let item = &self.items[i];
        let source = self.backend.attach(item);
        self.source = Some(source);
        self.state = PlaybackState::Loaded { index: i };
        info!(index = i, name = %item.name, source = %source, "loaded");
    }

    fn start(&mut self) {
        let Some(kind) = self.active_kind() else {
            return;
        };
        if kind == MediaKind::Image {
            // Stills have no timeline; the synthetic spectrum animates them.
            self.playing = true;
            return;
        }
        self.ensure_connected();
        match self.backend.play() {
            Ok(()) => self.playing = true,
            Err(err) => {
                warn!(error = %err, "playback start failed");
                self.playing = false;
            }
        }
    }

    /// source -> analyser -> output. A source that is already connected is
    /// left as is.
    fn ensure_connected(&mut self) {
        let Some(source) = self.source else {
            return;
        };
        match self.backend.connect(source) {
            Ok(()) => self.connection = Some(source),
            Err(PlatformError::AlreadyConnected(id)) => {
                debug!(source = %id, "already connected");
                self.connection = Some(id);
            }
            Err(err) => warn!(error = %err, "connect failed"),
        }
    }

    fn stop(&mut self) {
        if self.playing {
            self.backend.pause();
            self.playing = false;
        }
        if let Some(source) = self.connection.take() {
            self.backend.disconnect(source);
        }
    }
}

/// `m:ss`; unknown or negative durations read `0:00`.
pub fn format_time(seconds: f32) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_handles_unknowns() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(61.9), "1:01");
        assert_eq!(format_time(f32::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(600.0), "10:00");
    }
}
