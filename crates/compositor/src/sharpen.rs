//! Unsharp pass: 3×3 cross-kernel sharpening over the composited buffer.

use fc_common::PixelBuffer;

/// Sharpen interior pixels in place.
///
/// For each interior pixel and color channel,
/// `out = (1 + 4k)·center − k·(up + down + left + right)` with `k = amount`
/// clamped to [0, 1], result clamped to [0, 255]. The alpha channel passes
/// through and the one-pixel border ring is left unmodified. An amount of
/// zero returns without touching the buffer, so the bytes stay identical.
pub fn sharpen(buffer: &mut PixelBuffer, amount: f32) {
    let k = amount.clamp(0.0, 1.0);
    if k <= 0.0 {
        return;
    }

    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    if w < 3 || h < 3 {
        return;
    }

    let src = buffer.as_bytes().to_vec();
    let data = buffer.as_bytes_mut();

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = (y * w + x) * 4;
            for ch in 0..3 {
                let c0 = src[idx + ch] as f32;
                let up = src[idx - w * 4 + ch] as f32;
                let down = src[idx + w * 4 + ch] as f32;
                let left = src[idx - 4 + ch] as f32;
                let right = src[idx + 4 + ch] as f32;
                let v = (1.0 + 4.0 * k) * c0 - k * (up + down + left + right);
                data[idx + ch] = v.clamp(0.0, 255.0) as u8;
            }
            data[idx + 3] = src[idx + 3];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 200 } else { 50 };
                buf.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        buf
    }

    #[test]
    fn zero_amount_is_byte_identical() {
        let mut buf = checkerboard(8, 8);
        let before = buf.as_bytes().to_vec();
        sharpen(&mut buf, 0.0);
        assert_eq!(buf.as_bytes(), before.as_slice());
    }

    #[test]
    fn negative_amount_clamps_to_noop() {
        let mut buf = checkerboard(8, 8);
        let before = buf.as_bytes().to_vec();
        sharpen(&mut buf, -1.0);
        assert_eq!(buf.as_bytes(), before.as_slice());
    }

    #[test]
    fn flat_buffer_is_unchanged() {
        let mut buf = PixelBuffer::filled(8, 8, [120, 120, 120, 255]);
        let before = buf.clone();
        sharpen(&mut buf, 1.0);
        assert_eq!(buf, before);
    }

    #[test]
    fn border_ring_is_untouched() {
        let mut buf = checkerboard(8, 8);
        let before = buf.clone();
        sharpen(&mut buf, 0.8);

        for x in 0..8 {
            assert_eq!(buf.pixel(x, 0), before.pixel(x, 0));
            assert_eq!(buf.pixel(x, 7), before.pixel(x, 7));
        }
        for y in 0..8 {
            assert_eq!(buf.pixel(0, y), before.pixel(0, y));
            assert_eq!(buf.pixel(7, y), before.pixel(7, y));
        }
    }

    #[test]
    fn contrast_increases_at_edges() {
        let mut buf = checkerboard(8, 8);
        sharpen(&mut buf, 1.0);

        // A bright interior pixel surrounded by dark neighbors gets pushed up.
        let px = buf.pixel(2, 2);
        assert_eq!(px[0], 255);
        // And a dark one surrounded by bright neighbors gets pushed down.
        let px = buf.pixel(2, 3);
        assert_eq!(px[0], 0);
    }

    #[test]
    fn alpha_passes_through() {
        let mut buf = checkerboard(8, 8);
        buf.set_pixel(3, 3, [200, 200, 200, 42]);
        sharpen(&mut buf, 0.5);
        assert_eq!(buf.pixel(3, 3)[3], 42);
    }

    #[test]
    fn tiny_buffers_are_left_alone() {
        let mut buf = checkerboard(2, 2);
        let before = buf.clone();
        sharpen(&mut buf, 1.0);
        assert_eq!(buf, before);
    }
}
