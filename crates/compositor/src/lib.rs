//! `fc-compositor` — CPU image pipeline for the Framecut engine.
//!
//! A pure per-frame transform: layer descriptions plus source images in,
//! one RGBA8 [`fc_common::PixelBuffer`] out. The pipeline stages are
//! clear → base (contain-scaled, graded) → sharpen → overlays (text and
//! stickers, transformed about the buffer-center anchor).
//!
//! Missing or not-yet-ready media degrades per layer — a frame never fails
//! to produce pixels.

pub mod compositor;
pub mod error;
pub mod grade;
pub mod sharpen;
pub mod text;

pub use compositor::{Compositor, ImageSource, RenderOptions, RenderedFrame};
pub use error::{CompositorError, CompositorResult};
pub use grade::apply_grade;
pub use sharpen::sharpen;
pub use text::{CoverageMap, TextRenderer};
