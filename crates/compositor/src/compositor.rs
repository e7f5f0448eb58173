//! Main compositor — produces the pixel content of one frame.
//!
//! [`Compositor::render`] is a pure transform from layer descriptions and
//! source images to an RGBA buffer:
//!
//! 1. **Clear** — fill with the opaque background color.
//! 2. **Base** — sample the video source with "contain" scaling, grade each
//!    pixel, composite at clip opacity.
//! 3. **Sharpen** — cross-kernel unsharp over the composited buffer.
//! 4. **Overlays** — text and stickers in resolved z-order, transformed
//!    about the buffer-center anchor.
//!
//! Missing or not-yet-ready sources degrade per layer and are reported in
//! [`RenderedFrame::pending`] so the caller can re-render on readiness.

use fc_common::{
    BaseLayer, FrameLayers, OverlayTransform, PixelBuffer, RenderSettings, Resolution, SourceId,
    StickerLayer, TextLayer,
};
use tracing::debug;

use crate::grade::{clamp255, grade_rgb};
use crate::sharpen::sharpen;
use crate::text::{CoverageMap, TextRenderer};

/// Read access to decoded media images.
///
/// `None` means the resource is not ready yet (still decoding or loading);
/// the compositor skips that layer rather than blocking.
pub trait ImageSource {
    fn image(&self, source: &SourceId) -> Option<&PixelBuffer>;
}

/// Options threaded through a single render call.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Clip id of a text overlay under interactive in-place editing. That
    /// overlay is skipped entirely: the external editor surface is its sole
    /// visible representation while editing is active.
    pub editing_clip: Option<String>,
}

impl RenderOptions {
    /// Whether the overlay with the given clip id must not be drawn.
    pub fn suppresses(&self, clip_id: &str) -> bool {
        self.editing_clip.as_deref() == Some(clip_id)
    }
}

/// Result of one render: the composited buffer plus the sources that were
/// not ready and caused their layer to be skipped.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub buffer: PixelBuffer,
    pub pending: Vec<SourceId>,
}

impl RenderedFrame {
    /// True when no layer was skipped for readiness.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// CPU compositor targeting a fixed output resolution.
pub struct Compositor {
    settings: RenderSettings,
    text: Option<TextRenderer>,
}

impl Compositor {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            text: None,
        }
    }

    /// Install the font used for text overlays. Until a font is set, text
    /// overlays degrade to skipped layers.
    pub fn set_font(&mut self, renderer: TextRenderer) {
        self.text = Some(renderer);
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    pub fn resolution(&self) -> Resolution {
        self.settings.resolution
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.settings.resolution = resolution;
    }

    /// Composite one frame.
    pub fn render(
        &self,
        layers: &FrameLayers,
        images: &dyn ImageSource,
        options: &RenderOptions,
    ) -> RenderedFrame {
        let res = self.settings.resolution;
        let mut buffer = PixelBuffer::filled(res.width, res.height, self.settings.background);
        let mut pending = Vec::new();

        if let Some(base) = &layers.base {
            match images.image(&base.source) {
                Some(img) => draw_base(&mut buffer, img, base),
                None => {
                    debug!(source = %base.source, "Base image not ready, skipping layer");
                    pending.push(base.source.clone());
                }
            }
            if base.sharpen > 0.0 {
                sharpen(&mut buffer, base.sharpen);
            }
        }

        for overlay in &layers.overlays {
            match overlay {
                fc_common::OverlayLayer::Text(text) => {
                    if options.suppresses(&text.clip_id) {
                        continue;
                    }
                    match &self.text {
                        Some(renderer) => draw_text(&mut buffer, renderer, text),
                        None => {
                            debug!(clip_id = %text.clip_id, "No font configured, text overlay skipped");
                        }
                    }
                }
                fc_common::OverlayLayer::Sticker(sticker) => match images.image(&sticker.source) {
                    Some(img) => draw_sticker(&mut buffer, img, sticker),
                    None => {
                        debug!(source = %sticker.source, "Sticker image not ready, skipping layer");
                        pending.push(sticker.source.clone());
                    }
                },
            }
        }

        RenderedFrame { buffer, pending }
    }
}

// ---------------------------------------------------------------------------
// Base layer
// ---------------------------------------------------------------------------

/// Draw the base video image with "contain" scaling: the source is scaled to
/// the largest aspect-preserving size that fits the target, then centered.
fn draw_base(dst: &mut PixelBuffer, img: &PixelBuffer, base: &BaseLayer) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    let opacity = base.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    let cw = dst.width() as f32;
    let ch = dst.height() as f32;
    let vw = img.width() as f32;
    let vh = img.height() as f32;
    let scale = (cw / vw).min(ch / vh);
    let dw = vw * scale;
    let dh = vh * scale;
    let dx = (cw - dw) / 2.0;
    let dy = (ch - dh) / 2.0;

    let x0 = dx.floor().max(0.0) as u32;
    let y0 = dy.floor().max(0.0) as u32;
    let x1 = ((dx + dw).ceil() as u32).min(dst.width());
    let y1 = ((dy + dh).ceil() as u32).min(dst.height());

    for py in y0..y1 {
        for px in x0..x1 {
            let sx = (px as f32 + 0.5 - dx) / scale - 0.5;
            let sy = (py as f32 + 0.5 - dy) / scale - 0.5;
            let s = sample_clamped(img, sx, sy);
            let graded = grade_rgb([s[0], s[1], s[2]], &base.grade);
            let rgb = [
                clamp255(graded[0]) as f32,
                clamp255(graded[1]) as f32,
                clamp255(graded[2]) as f32,
            ];
            blend_pixel(dst, px, py, rgb, (s[3] / 255.0) * opacity);
        }
    }
}

// ---------------------------------------------------------------------------
// Sticker overlay
// ---------------------------------------------------------------------------

/// Draw a sticker image: scaled so its longest edge takes at most 40% of the
/// shorter buffer dimension, then by the overlay's own scale, rotated about
/// the buffer-center anchor offset by `(x, y)`.
fn draw_sticker(dst: &mut PixelBuffer, img: &PixelBuffer, layer: &StickerLayer) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    let opacity = layer.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    let iw = img.width() as f32;
    let ih = img.height() as f32;
    let max = dst.resolution().min_dimension() as f32 * 0.4;
    let fit = (max / iw).min(max / ih);
    let scale = fit * layer.transform.scale;
    if scale <= 0.0 {
        return;
    }

    let (cx, cy) = anchor(dst, &layer.transform);
    let (sin, cos) = layer.transform.rotation.to_radians().sin_cos();

    let half_w = iw / 2.0;
    let half_h = ih / 2.0;
    let Some((bx0, by0, bx1, by1)) =
        transformed_bounds(dst, cx, cy, scale, sin, cos, half_w, half_h, 1.0)
    else {
        return;
    };

    for py in by0..by1 {
        for px in bx0..bx1 {
            // Inverse-map the target pixel center into source coordinates.
            let rx = px as f32 + 0.5 - cx;
            let ry = py as f32 + 0.5 - cy;
            let qx = (rx * cos + ry * sin) / scale;
            let qy = (-rx * sin + ry * cos) / scale;
            let sx = qx + half_w - 0.5;
            let sy = qy + half_h - 0.5;
            let s = sample_zero(img, sx, sy);
            if s[3] <= 0.0 {
                continue;
            }
            blend_pixel(dst, px, py, [s[0], s[1], s[2]], (s[3] / 255.0) * opacity);
        }
    }
}

// ---------------------------------------------------------------------------
// Text overlay
// ---------------------------------------------------------------------------

/// Draw a text overlay: multi-line block vertically centered on the anchor,
/// optional outline stroke under the fill, optional bold emulation via
/// four offset fills.
fn draw_text(dst: &mut PixelBuffer, renderer: &TextRenderer, layer: &TextLayer) {
    let opacity = layer.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || layer.transform.scale <= 0.0 {
        return;
    }

    let font_size = layer.font_size.max(8.0);
    let line_height = 1.2 * font_size;
    let lines: Vec<&str> = layer
        .content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let start_y = -((lines.len() as f32 - 1.0) * line_height) / 2.0;

    let (cx, cy) = anchor(dst, &layer.transform);
    let (sin, cos) = layer.transform.rotation.to_radians().sin_cos();
    let scale = layer.transform.scale;

    // Offsets at which the fill coverage is sampled. Bold emulates weight by
    // overlaying four sub-pixel shifted copies of the fill.
    let fill_offsets: &[(f32, f32)] = if layer.bold {
        &[(0.0, 0.0), (0.3, 0.0), (-0.3, 0.0), (0.0, 0.3), (0.0, -0.3)]
    } else {
        &[(0.0, 0.0)]
    };

    // Ring offsets approximating a stroke of width proportional to the font
    // size; the stroke is painted first so the fill covers its interior.
    let outline_offsets: Vec<(f32, f32)> = if layer.outline {
        let radius = (font_size / 6.0).floor().max(2.0) / 2.0;
        let mut offsets = vec![(0.0, 0.0)];
        for i in 0..8 {
            let angle = std::f32::consts::TAU * i as f32 / 8.0;
            offsets.push((radius * angle.cos(), radius * angle.sin()));
        }
        offsets
    } else {
        Vec::new()
    };

    for (i, line) in lines.iter().enumerate() {
        let map = renderer.rasterize_line(line, font_size);
        let line_y = start_y + i as f32 * line_height;

        if layer.outline {
            blit_coverage(
                dst,
                &map,
                layer.outline_color,
                cx,
                cy,
                line_y,
                scale,
                sin,
                cos,
                opacity,
                &outline_offsets,
            );
        }
        blit_coverage(
            dst,
            &map,
            layer.color,
            cx,
            cy,
            line_y,
            scale,
            sin,
            cos,
            opacity,
            fill_offsets,
        );
    }
}

/// Blend a coverage map into the target as a solid color.
///
/// The map's center is placed at `(0, line_y)` in text-local space, which is
/// scaled, rotated, and translated to the anchor. Coverage is the maximum
/// sample over `offsets` (sub-pixel shifts in text-local space).
#[allow(clippy::too_many_arguments)]
fn blit_coverage(
    dst: &mut PixelBuffer,
    map: &CoverageMap,
    color: [u8; 4],
    cx: f32,
    cy: f32,
    line_y: f32,
    scale: f32,
    sin: f32,
    cos: f32,
    opacity: f32,
    offsets: &[(f32, f32)],
) {
    if offsets.is_empty() {
        return;
    }
    let half_w = map.width() as f32 / 2.0;
    let half_h = map.height() as f32 / 2.0;
    let margin = offsets
        .iter()
        .map(|(ox, oy)| ox.abs().max(oy.abs()))
        .fold(0.0f32, f32::max)
        + 1.0;

    let Some((bx0, by0, bx1, by1)) = transformed_bounds(
        dst,
        cx + line_y * -sin * scale,
        cy + line_y * cos * scale,
        scale,
        sin,
        cos,
        half_w + margin,
        half_h + margin,
        1.0,
    ) else {
        return;
    };

    let color_alpha = color[3] as f32 / 255.0;
    let rgb = [color[0] as f32, color[1] as f32, color[2] as f32];

    for py in by0..by1 {
        for px in bx0..bx1 {
            let rx = px as f32 + 0.5 - cx;
            let ry = py as f32 + 0.5 - cy;
            // Text-local coordinates (anchor at origin, y down).
            let qx = (rx * cos + ry * sin) / scale;
            let qy = (-rx * sin + ry * cos) / scale;
            let bx = qx + half_w - 0.5;
            let by = qy - line_y + half_h - 0.5;

            let mut coverage = 0.0f32;
            for (ox, oy) in offsets {
                coverage = coverage.max(map.sample(bx - ox, by - oy));
            }
            if coverage <= 0.0 {
                continue;
            }
            blend_pixel(dst, px, py, rgb, coverage * color_alpha * opacity);
        }
    }
}

// ---------------------------------------------------------------------------
// Shared raster helpers
// ---------------------------------------------------------------------------

/// Anchor point of an overlay: buffer center offset by the transform.
fn anchor(dst: &PixelBuffer, transform: &OverlayTransform) -> (f32, f32) {
    (
        dst.width() as f32 / 2.0 + transform.x,
        dst.height() as f32 / 2.0 + transform.y,
    )
}

/// Clamped target-pixel bounds of a rotated, scaled rect of half-extents
/// `(half_w, half_h)` centered at `(cx, cy)`. Returns `None` when the rect
/// lands entirely outside the buffer.
#[allow(clippy::too_many_arguments)]
fn transformed_bounds(
    dst: &PixelBuffer,
    cx: f32,
    cy: f32,
    scale: f32,
    sin: f32,
    cos: f32,
    half_w: f32,
    half_h: f32,
    pad: f32,
) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for (qx, qy) in [
        (-half_w, -half_h),
        (half_w, -half_h),
        (-half_w, half_h),
        (half_w, half_h),
    ] {
        let x = cx + (qx * cos - qy * sin) * scale;
        let y = cy + (qx * sin + qy * cos) * scale;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let bx0 = (min_x - pad).floor().max(0.0) as u32;
    let by0 = (min_y - pad).floor().max(0.0) as u32;
    let bx1 = ((max_x + pad).ceil().max(0.0) as u32).min(dst.width());
    let by1 = ((max_y + pad).ceil().max(0.0) as u32).min(dst.height());
    if bx0 >= bx1 || by0 >= by1 {
        return None;
    }
    Some((bx0, by0, bx1, by1))
}

/// Bilinear sample with edge-clamped coordinates.
fn sample_clamped(img: &PixelBuffer, fx: f32, fy: f32) -> [f32; 4] {
    let fx = fx.clamp(0.0, (img.width() - 1) as f32);
    let fy = fy.clamp(0.0, (img.height() - 1) as f32);
    bilinear(img, fx, fy)
}

/// Bilinear sample treating everything outside the image as transparent.
fn sample_zero(img: &PixelBuffer, fx: f32, fy: f32) -> [f32; 4] {
    if fx <= -1.0 || fy <= -1.0 || fx >= img.width() as f32 || fy >= img.height() as f32 {
        return [0.0; 4];
    }
    bilinear(img, fx, fy)
}

fn bilinear(img: &PixelBuffer, fx: f32, fy: f32) -> [f32; 4] {
    let x0f = fx.floor();
    let y0f = fy.floor();
    let tx = fx - x0f;
    let ty = fy - y0f;

    let at = |x: i64, y: i64| -> [f32; 4] {
        if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
            [0.0; 4]
        } else {
            let p = img.pixel(x as u32, y as u32);
            [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
        }
    };

    let x0 = x0f as i64;
    let y0 = y0f as i64;
    let mut out = [0.0f32; 4];
    let p00 = at(x0, y0);
    let p10 = at(x0 + 1, y0);
    let p01 = at(x0, y0 + 1);
    let p11 = at(x0 + 1, y0 + 1);
    for i in 0..4 {
        let top = p00[i] * (1.0 - tx) + p10[i] * tx;
        let bottom = p01[i] * (1.0 - tx) + p11[i] * tx;
        out[i] = top * (1.0 - ty) + bottom * ty;
    }
    out
}

/// Source-over blend of a straight-alpha color onto the buffer.
fn blend_pixel(dst: &mut PixelBuffer, x: u32, y: u32, rgb: [f32; 3], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let a = alpha.min(1.0);
    let d = dst.pixel(x, y);
    let out = [
        (rgb[0] * a + d[0] as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8,
        (rgb[1] * a + d[1] as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8,
        (rgb[2] * a + d[2] as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8,
        ((a * 255.0) + d[3] as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8,
    ];
    dst.set_pixel(x, y, out);
}
