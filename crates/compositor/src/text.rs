//! Text rasterization via fontdue.
//!
//! A [`TextRenderer`] wraps a loaded font and rasterizes single lines into
//! grayscale [`CoverageMap`]s. The compositor transforms and colors those
//! maps when drawing text overlays; this module knows nothing about the
//! output buffer.

use fontdue::{Font, FontSettings};

use crate::error::{CompositorError, CompositorResult};

/// Grayscale coverage bitmap for one line of text, 0 = empty, 255 = full.
#[derive(Clone, Debug)]
pub struct CoverageMap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl CoverageMap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bilinear coverage sample in [0, 1]; positions outside the map are 0.
    pub fn sample(&self, fx: f32, fy: f32) -> f32 {
        if fx <= -1.0 || fy <= -1.0 || fx >= self.width as f32 || fy >= self.height as f32 {
            return 0.0;
        }
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let at = |x: i64, y: i64| -> f32 {
            if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                0.0
            } else {
                self.data[y as usize * self.width + x as usize] as f32 / 255.0
            }
        };

        let top = at(x0, y0) * (1.0 - tx) + at(x0 + 1, y0) * tx;
        let bottom = at(x0, y0 + 1) * (1.0 - tx) + at(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

/// Font wrapper that rasterizes lines of text into coverage maps.
pub struct TextRenderer {
    font: Font,
}

impl TextRenderer {
    /// Load a font from raw TTF/OTF bytes.
    pub fn from_bytes(bytes: &[u8]) -> CompositorResult<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| CompositorError::FontLoad(e.to_string()))?;
        Ok(Self { font })
    }

    /// Rasterize one line (no line breaks) at the given pixel size.
    ///
    /// The map is tightly sized: width is the summed advance, height spans
    /// the line's maximum ascent and descent.
    pub fn rasterize_line(&self, text: &str, px: f32) -> CoverageMap {
        // Measure
        let mut total_width: i32 = 0;
        let mut max_ascent: i32 = 0;
        let mut max_descent: i32 = 0;
        for ch in text.chars() {
            let (metrics, _) = self.font.rasterize(ch, px);
            let ascent = metrics.height as i32 + metrics.ymin;
            let descent = -metrics.ymin;
            max_ascent = max_ascent.max(ascent);
            max_descent = max_descent.max(descent);
            total_width += metrics.advance_width as i32;
        }

        let width = total_width.max(1) as usize;
        let height = (max_ascent + max_descent).max(1) as usize;
        let mut data = vec![0u8; width * height];

        // Render glyphs along the baseline
        let mut cursor_x: i32 = 0;
        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, px);
            let glyph_x = cursor_x + metrics.xmin;
            let glyph_y = max_ascent - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let x = glyph_x + gx as i32;
                    let y = glyph_y + gy as i32;
                    if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height {
                        let idx = y as usize * width + x as usize;
                        data[idx] = data[idx].max(coverage);
                    }
                }
            }
            cursor_x += metrics.advance_width as i32;
        }

        CoverageMap {
            width,
            height,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_map() -> CoverageMap {
        // 2x2 map: full coverage top-left only.
        CoverageMap {
            width: 2,
            height: 2,
            data: vec![255, 0, 0, 0],
        }
    }

    #[test]
    fn sample_at_texel_center() {
        let map = synthetic_map();
        assert!((map.sample(0.0, 0.0) - 1.0).abs() < 1e-6);
        assert!((map.sample(1.0, 1.0) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn sample_interpolates_between_texels() {
        let map = synthetic_map();
        let mid = map.sample(0.5, 0.0);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sample_outside_is_zero() {
        let map = synthetic_map();
        assert_eq!(map.sample(-5.0, 0.0), 0.0);
        assert_eq!(map.sample(0.0, 10.0), 0.0);
    }

    #[test]
    fn invalid_font_bytes_fail_to_load() {
        assert!(matches!(
            TextRenderer::from_bytes(&[0u8; 16]),
            Err(CompositorError::FontLoad(_))
        ));
    }
}
