//! The capture sink seam.
//!
//! The core only guarantees what pixels exist at what frame; turning the
//! buffer sequence into a distributable container is the sink's job and
//! lives outside this workspace.

use fc_common::{FrameNumber, PixelBuffer, Resolution};

use crate::error::ExportError;

/// External capture collaborator: accepts an ordered sequence of pixel
/// buffers at a fixed rate and produces a persisted artifact.
pub trait CaptureSink {
    /// Called once before the first frame with the fixed output format.
    fn begin(&mut self, resolution: Resolution, fps: u32) -> Result<(), ExportError>;

    /// Called once per frame, in order, with the composited buffer.
    fn write(&mut self, frame: FrameNumber, buffer: &PixelBuffer) -> Result<(), ExportError>;

    /// Called after the last frame. Returns the number of bytes the sink
    /// persisted; zero means the capture produced no data.
    fn finish(&mut self) -> Result<u64, ExportError>;
}
