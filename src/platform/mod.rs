//! The host media capability: a shared media element, its audio graph and a
//! frequency analyser. Decoding and analysis live behind these traits.

mod sim;

use crate::media::PlaylistItem;
use std::fmt;
use thiserror::Error;

pub use sim::{SimulatedBackend, SimulatedOptions};

/// Handle to a media source node created for one attached item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaPosition {
    pub current_s: f32,
    /// `None` while unknown or for media without a timeline.
    pub duration_s: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("{0} is already connected to the analyser")]
    AlreadyConnected(SourceId),
    #[error("{0} is not attached")]
    UnknownSource(SourceId),
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

pub trait FrequencyAnalyser {
    fn bin_count(&self) -> usize;
    /// Copies the latest byte magnitudes into `out`. Writes at most
    /// `min(out.len(), bin_count())` samples.
    fn byte_frequency_data(&self, out: &mut [u8]);
}

pub trait MediaBackend {
    /// Points the shared media element at `item` and creates a source node.
    fn attach(&mut self, item: &PlaylistItem) -> SourceId;
    /// Releases the resource handle backing `item` (object URL, decoder).
    fn release(&mut self, item: &PlaylistItem);
    /// source -> analyser -> output.
    fn connect(&mut self, source: SourceId) -> Result<(), PlatformError>;
    fn disconnect(&mut self, source: SourceId);
    fn play(&mut self) -> Result<(), PlatformError>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    /// Seeks to `fraction` of the current media's duration.
    fn seek(&mut self, fraction: f32);
    /// Lets `dt` seconds of media time pass.
    fn advance(&mut self, dt: f32) -> Option<MediaEvent>;
    /// The analyser, when a source is connected to it.
    fn analyser(&self) -> Option<&dyn FrequencyAnalyser>;
    fn position(&self) -> Option<MediaPosition>;
}
