//! Project data model types: tracks, clips, and typed per-clip parameters.
//!
//! Clips carry a [`ClipData`] tagged variant matching their owning track's
//! kind. Each variant is a defaulted-field struct, so documents written by
//! older versions load cleanly and new knobs can be added without breaking
//! compatibility.

use fc_common::{FrameNumber, ParamValue, SourceId};
use serde::{Deserialize, Serialize};

/// The four track kinds. A track's kind is fixed at creation and every clip
/// on it must match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Sticker,
}

impl TrackKind {
    /// Whether clips of this kind participate in visual layering.
    pub fn is_visual(self) -> bool {
        !matches!(self, TrackKind::Audio)
    }
}

/// An ordered lane of clips of one fixed kind.
///
/// Track order within the project defines compositing order: later tracks
/// render above earlier ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier.
    pub id: String,
    /// Fixed content kind.
    pub kind: TrackKind,
    /// Clips in insertion order. Not required to be sorted or disjoint.
    pub clips: Vec<Clip>,
}

impl Track {
    /// The first clip (lowest index) active at `frame`, if any.
    ///
    /// When clips overlap, the lowest index wins; this is the deterministic
    /// tie-break the resolver relies on.
    pub fn active_clip(&self, frame: FrameNumber) -> Option<&Clip> {
        self.clips.iter().find(|c| c.is_active_at(frame))
    }
}

/// A time-bounded placement of one media/content unit on one track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier.
    pub id: String,
    /// First frame covered (inclusive).
    pub start: FrameNumber,
    /// First frame no longer covered (exclusive). Invariant: `start < end`.
    pub end: FrameNumber,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// External media handle (video, audio, sticker image).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceId>,
    /// Typed parameters matching the owning track's kind.
    pub data: ClipData,
}

impl Clip {
    /// Kind of this clip, derived from its data variant.
    pub fn kind(&self) -> TrackKind {
        self.data.kind()
    }

    /// Returns `true` if this clip covers `frame` (`start <= frame < end`).
    pub fn is_active_at(&self, frame: FrameNumber) -> bool {
        frame >= self.start && frame < self.end
    }

    /// Length of this clip in frames.
    pub fn duration_frames(&self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }
}

/// Per-clip parameters, tagged by clip kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipData {
    Video(VideoParams),
    Audio(AudioParams),
    Text(TextParams),
    Sticker(StickerParams),
}

impl ClipData {
    pub fn kind(&self) -> TrackKind {
        match self {
            Self::Video(_) => TrackKind::Video,
            Self::Audio(_) => TrackKind::Audio,
            Self::Text(_) => TrackKind::Text,
            Self::Sticker(_) => TrackKind::Sticker,
        }
    }
}

/// Parameters for a video clip: playback speed, opacity, and color grading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoParams {
    /// Playback speed multiplier. Clamped to [0.1, 8.0] at use.
    pub speed: f32,
    /// Composite opacity, clamped to [0, 1] at use.
    pub opacity: f32,
    /// Exposure in stops (brightness multiplier is `2^exposure`).
    pub exposure: f32,
    /// Contrast factor around mid-gray.
    pub contrast: f32,
    /// Saturation factor.
    pub saturation: f32,
    /// Color temperature in Kelvin.
    pub temperature: f32,
    /// Unsharp amount, clamped to [0, 1] at use.
    pub sharpen: f32,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            opacity: 1.0,
            exposure: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            temperature: 6500.0,
            sharpen: 0.0,
        }
    }
}

impl VideoParams {
    /// Speed clamped into its valid range.
    pub fn clamped_speed(&self) -> f64 {
        (self.speed as f64).clamp(0.1, 8.0)
    }
}

/// Parameters for an audio clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioParams {
    /// Mix gain: 0.0 (silent) to 1.0 (full).
    pub volume: f32,
    /// If true, this clip contributes no audio.
    pub muted: bool,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

/// Parameters for a text overlay clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParams {
    /// Text content; line breaks split the block into multiple lines.
    pub content: String,
    /// Fill color, RGBA.
    pub color: [u8; 4],
    /// Font size in pixels. A floor of 8 is applied at draw.
    pub font_size: f32,
    pub bold: bool,
    pub outline: bool,
    /// Stroke color used when `outline` is set.
    pub outline_color: [u8; 4],
    /// Offset from the buffer center, in pixels.
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub opacity: f32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            content: "Text".to_string(),
            color: [255, 255, 255, 255],
            font_size: 28.0,
            bold: false,
            outline: false,
            outline_color: [0, 0, 0, 230],
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

/// Parameters for a sticker (image) overlay clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerParams {
    /// Offset from the buffer center, in pixels.
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub opacity: f32,
}

impl Default for StickerParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

/// A typed single-parameter update, the model-level replacement for the
/// stringly `data[key] = value` access pattern.
///
/// `key()` and `value()` feed the `clip-data-changed` notification.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamUpdate {
    // Video
    Speed(f32),
    Exposure(f32),
    Contrast(f32),
    Saturation(f32),
    Temperature(f32),
    Sharpen(f32),
    // Audio
    Volume(f32),
    Muted(bool),
    // Text
    Content(String),
    Color([u8; 4]),
    FontSize(f32),
    Bold(bool),
    Outline(bool),
    OutlineColor([u8; 4]),
    // Shared: video/text/sticker
    Opacity(f32),
    // Shared: text/sticker transform
    X(f32),
    Y(f32),
    Scale(f32),
    Rotation(f32),
}

impl ParamUpdate {
    /// Notification key for this parameter (camelCase, matching the
    /// serialized document field names).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Speed(_) => "speed",
            Self::Exposure(_) => "exposure",
            Self::Contrast(_) => "contrast",
            Self::Saturation(_) => "saturation",
            Self::Temperature(_) => "temperature",
            Self::Sharpen(_) => "sharpen",
            Self::Volume(_) => "volume",
            Self::Muted(_) => "muted",
            Self::Content(_) => "content",
            Self::Color(_) => "color",
            Self::FontSize(_) => "fontSize",
            Self::Bold(_) => "bold",
            Self::Outline(_) => "outline",
            Self::OutlineColor(_) => "outlineColor",
            Self::Opacity(_) => "opacity",
            Self::X(_) => "x",
            Self::Y(_) => "y",
            Self::Scale(_) => "scale",
            Self::Rotation(_) => "rotation",
        }
    }

    /// The updated value as a [`ParamValue`] for notifications.
    pub fn value(&self) -> ParamValue {
        match self {
            Self::Speed(v)
            | Self::Exposure(v)
            | Self::Contrast(v)
            | Self::Saturation(v)
            | Self::Temperature(v)
            | Self::Sharpen(v)
            | Self::Volume(v)
            | Self::FontSize(v)
            | Self::Opacity(v)
            | Self::X(v)
            | Self::Y(v)
            | Self::Scale(v)
            | Self::Rotation(v) => ParamValue::Float(*v),
            Self::Muted(v) | Self::Bold(v) | Self::Outline(v) => ParamValue::Bool(*v),
            Self::Content(v) => ParamValue::Text(v.clone()),
            Self::Color(v) | Self::OutlineColor(v) => ParamValue::Color(*v),
        }
    }

    /// Apply this update to the given clip data. Returns `false` when the
    /// parameter does not apply to the data's kind (the data is untouched).
    pub(crate) fn apply(&self, data: &mut ClipData) -> bool {
        match (self, data) {
            (Self::Speed(v), ClipData::Video(p)) => p.speed = *v,
            (Self::Exposure(v), ClipData::Video(p)) => p.exposure = *v,
            (Self::Contrast(v), ClipData::Video(p)) => p.contrast = *v,
            (Self::Saturation(v), ClipData::Video(p)) => p.saturation = *v,
            (Self::Temperature(v), ClipData::Video(p)) => p.temperature = *v,
            (Self::Sharpen(v), ClipData::Video(p)) => p.sharpen = *v,
            (Self::Volume(v), ClipData::Audio(p)) => p.volume = *v,
            (Self::Muted(v), ClipData::Audio(p)) => p.muted = *v,
            (Self::Content(v), ClipData::Text(p)) => p.content = v.clone(),
            (Self::Color(v), ClipData::Text(p)) => p.color = *v,
            (Self::FontSize(v), ClipData::Text(p)) => p.font_size = *v,
            (Self::Bold(v), ClipData::Text(p)) => p.bold = *v,
            (Self::Outline(v), ClipData::Text(p)) => p.outline = *v,
            (Self::OutlineColor(v), ClipData::Text(p)) => p.outline_color = *v,
            (Self::Opacity(v), ClipData::Video(p)) => p.opacity = *v,
            (Self::Opacity(v), ClipData::Text(p)) => p.opacity = *v,
            (Self::Opacity(v), ClipData::Sticker(p)) => p.opacity = *v,
            (Self::X(v), ClipData::Text(p)) => p.x = *v,
            (Self::X(v), ClipData::Sticker(p)) => p.x = *v,
            (Self::Y(v), ClipData::Text(p)) => p.y = *v,
            (Self::Y(v), ClipData::Sticker(p)) => p.y = *v,
            (Self::Scale(v), ClipData::Text(p)) => p.scale = *v,
            (Self::Scale(v), ClipData::Sticker(p)) => p.scale = *v,
            (Self::Rotation(v), ClipData::Text(p)) => p.rotation = *v,
            (Self::Rotation(v), ClipData::Sticker(p)) => p.rotation = *v,
            _ => return false,
        }
        true
    }
}
