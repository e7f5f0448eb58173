//! `fc-export` — Deterministic export for the Framecut engine.
//!
//! The [`ExportDriver`] repeatedly invokes the playback scheduler's
//! synchronous seek path and hands each composited buffer to an external
//! [`CaptureSink`], reporting progress over the notification bus. Exported
//! frames are identical regardless of wall-clock timing.

pub mod driver;
pub mod error;
pub mod sink;

pub use driver::{ExportConfig, ExportDriver, ExportSummary};
pub use error::{ExportError, ExportResult};
pub use sink::CaptureSink;
