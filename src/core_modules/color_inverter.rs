// THEORY:
// Color inversion is a pure per-pixel map, `255 - c` on each channel. No pixel
// depends on another, so it parallelizes trivially and is its own inverse.

use crate::core_modules::pixel_buffer::{PixelBuffer, Rgb};
use crate::core_modules::row_executor;

#[inline]
pub fn invert_pixel(pixel: Rgb) -> Rgb {
    Rgb::new(255 - pixel.red, 255 - pixel.green, 255 - pixel.blue)
}

/// Returns a new buffer with every channel of `source` inverted.
pub fn invert(source: &PixelBuffer, thread_count: usize) -> PixelBuffer {
    let mut result = PixelBuffer::like(source);
    let width = source.width() as usize;

    row_executor::run(result.pixels_mut(), width, thread_count, |rows, chunk| {
        let start = rows.start * width;
        let input = &source.pixels()[start..start + chunk.len()];
        for (out, &pixel) in chunk.iter_mut().zip(input) {
            *out = invert_pixel(pixel);
        }
    });

    result
}
