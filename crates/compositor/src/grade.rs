//! Color grading: exposure, temperature tint, contrast, saturation.
//!
//! The stage order is brightness → temperature → contrast → saturation,
//! with channel values carried in `f32` and clamped to [0, 255] once at the
//! end. Clamping only at the final step avoids compounding clamping error
//! between stages.

use fc_common::GradeParams;
use fc_common::PixelBuffer;

/// Rec.709 luma weights.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Grade one RGB triple (0..255 range, not yet clamped).
///
/// The caller clamps; intermediate values may leave [0, 255].
pub fn grade_rgb(rgb: [f32; 3], grade: &GradeParams) -> [f32; 3] {
    let [mut r, mut g, mut b] = rgb;

    let brightness = 2f32.powf(grade.exposure);
    r *= brightness;
    g *= brightness;
    b *= brightness;

    let warm = grade.warm_factor();
    r *= warm;
    b /= warm;

    let cf = grade.contrast.max(0.0);
    r = (r - 128.0) * cf + 128.0;
    g = (g - 128.0) * cf + 128.0;
    b = (b - 128.0) * cf + 128.0;

    let sat = grade.saturation.max(0.0);
    let luma = LUMA_R * r + LUMA_G * g + LUMA_B * b;
    r = luma + (r - luma) * sat;
    g = luma + (g - luma) * sat;
    b = luma + (b - luma) * sat;

    [r, g, b]
}

/// Clamp a graded channel into displayable range.
pub fn clamp255(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Grade every pixel of a buffer in place. Alpha is untouched.
pub fn apply_grade(buffer: &mut PixelBuffer, grade: &GradeParams) {
    if grade.is_neutral() {
        return;
    }
    for px in buffer.as_bytes_mut().chunks_exact_mut(4) {
        let graded = grade_rgb([px[0] as f32, px[1] as f32, px[2] as f32], grade);
        px[0] = clamp255(graded[0]);
        px[1] = clamp255(graded[1]);
        px[2] = clamp255(graded[2]);
    }
}
