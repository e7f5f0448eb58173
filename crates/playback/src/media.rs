//! The media source provider seam.
//!
//! Decode, seek, and image readiness live outside the core: the host hands
//! the scheduler a [`MediaProvider`] and the core only ever talks to media
//! through it. Readiness is modeled without callbacks — `position_at`
//! returns once the explicit seek completes, and the inherited
//! [`ImageSource`] returns `None` while a resource is still loading.

use fc_common::{SourceId, TimeCode};
use fc_compositor::ImageSource;
use thiserror::Error;

/// Errors surfaced by a media provider.
///
/// The scheduler treats these as resource errors: the affected layer
/// degrades, a `media-invalid` notification goes out, and playback
/// continues.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("unknown media source: {0}")]
    UnknownSource(SourceId),

    #[error("seek failed for {src}: {reason}")]
    SeekFailed { src: SourceId, reason: String },
}

/// External media collaborator: decoded images, duration probing, and
/// transport control per source handle.
pub trait MediaProvider: ImageSource {
    /// Length of the source in frames at the project frame rate, when known.
    fn probe_duration(&self, source: &SourceId) -> Option<u64>;

    /// Position the source at the given local time. Synchronous from the
    /// caller's point of view: returns once the source is ready to be
    /// sampled at that position.
    fn position_at(&mut self, source: &SourceId, local_time: TimeCode) -> Result<(), MediaError>;

    /// The source's own current playback position while it is playing.
    /// `None` when the source is not playing or cannot report a position.
    fn playback_position(&self, source: &SourceId) -> Option<TimeCode>;

    /// Begin continuous decode/playback of the source.
    fn play(&mut self, source: &SourceId) -> Result<(), MediaError>;

    /// Halt continuous playback of the source.
    fn pause(&mut self, source: &SourceId);

    /// Set the source's playback rate (already clamped by the caller).
    fn set_rate(&mut self, source: &SourceId, rate: f64);
}
