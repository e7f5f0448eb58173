//! Layer descriptions — interface between the frame resolver and the compositor.
//!
//! The resolver turns the project model into a [`FrameLayers`] value for one
//! frame; the compositor consumes it without knowing about tracks or clips.

use serde::{Deserialize, Serialize};

use crate::types::{SourceId, TimeCode};

/// Transform for an overlay, anchored at the buffer center.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayTransform {
    /// Offset from the buffer center, in pixels.
    pub x: f32,
    pub y: f32,
    /// Uniform scale (1.0 = unscaled).
    pub scale: f32,
    /// Rotation about the anchor, in degrees.
    pub rotation: f32,
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Color-grading parameters for the base layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeParams {
    /// Exposure in stops; brightness multiplier is `2^exposure`.
    pub exposure: f32,
    /// Contrast factor around mid-gray (1.0 = neutral).
    pub contrast: f32,
    /// Saturation factor (1.0 = neutral, 0.0 = grayscale).
    pub saturation: f32,
    /// Color temperature in Kelvin (6500 = neutral).
    pub temperature: f32,
}

impl Default for GradeParams {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            temperature: 6500.0,
        }
    }
}

impl GradeParams {
    /// True when every parameter is at its neutral value.
    pub fn is_neutral(&self) -> bool {
        self.exposure == 0.0
            && self.contrast == 1.0
            && self.saturation == 1.0
            && self.temperature == 6500.0
    }

    /// The warm/cool tint factor derived from `temperature`.
    pub fn warm_factor(&self) -> f32 {
        ((self.temperature - 6500.0) / 6500.0 + 1.0).clamp(0.5, 1.5)
    }
}

/// The single video layer at the bottom of the stack for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    /// Clip this layer originates from.
    pub clip_id: String,
    /// Media source to sample.
    pub source: SourceId,
    /// Local time into the source: `(frame - clip.start) / (fps * speed)`.
    pub local_time: TimeCode,
    /// Grading applied to sampled pixels.
    pub grade: GradeParams,
    /// Unsharp amount in [0, 1]; 0 disables the pass.
    pub sharpen: f32,
    /// Composite opacity in [0, 1].
    pub opacity: f32,
}

/// A text overlay, drawn above the base layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub clip_id: String,
    pub content: String,
    /// Fill color, RGBA.
    pub color: [u8; 4],
    pub font_size: f32,
    pub bold: bool,
    pub outline: bool,
    pub outline_color: [u8; 4],
    pub transform: OverlayTransform,
    pub opacity: f32,
}

/// A sticker (image) overlay, drawn above the base layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StickerLayer {
    pub clip_id: String,
    pub source: SourceId,
    pub transform: OverlayTransform,
    pub opacity: f32,
}

/// One overlay in paint order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OverlayLayer {
    Text(TextLayer),
    Sticker(StickerLayer),
}

impl OverlayLayer {
    /// Id of the clip this overlay came from.
    pub fn clip_id(&self) -> &str {
        match self {
            Self::Text(t) => &t.clip_id,
            Self::Sticker(s) => &s.clip_id,
        }
    }
}

/// Everything the compositor needs for one frame.
///
/// `overlays` is ordered bottom-to-top: the last entry paints on top.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameLayers {
    pub base: Option<BaseLayer>,
    pub overlays: Vec<OverlayLayer>,
}

impl FrameLayers {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.overlays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_neutral_detection() {
        assert!(GradeParams::default().is_neutral());
        let mut g = GradeParams::default();
        g.exposure = 0.5;
        assert!(!g.is_neutral());
    }

    #[test]
    fn warm_factor_clamps() {
        let mut g = GradeParams::default();
        assert!((g.warm_factor() - 1.0).abs() < 1e-6);
        g.temperature = 20000.0;
        assert!((g.warm_factor() - 1.5).abs() < 1e-6);
        g.temperature = 0.0;
        assert!((g.warm_factor() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn overlay_clip_id_accessor() {
        let text = OverlayLayer::Text(TextLayer {
            clip_id: "c1".into(),
            content: "Hi".into(),
            color: [255, 255, 255, 255],
            font_size: 28.0,
            bold: false,
            outline: false,
            outline_color: [0, 0, 0, 230],
            transform: OverlayTransform::default(),
            opacity: 1.0,
        });
        assert_eq!(text.clip_id(), "c1");
    }
}
