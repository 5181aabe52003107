// THEORY:
// The shifter translates an image by `(dx, dy)` with no wrap-around and no
// interpolation. Destination pixels whose source would lie outside the image take
// the border color.

use crate::core_modules::pixel_buffer::{BorderColor, PixelBuffer};
use crate::core_modules::row_executor;

/// Returns `source` moved right by `dx` and down by `dy`. Negative offsets move left/up.
pub fn shift(
    source: &PixelBuffer,
    dx: i64,
    dy: i64,
    border: BorderColor,
    thread_count: usize,
) -> PixelBuffer {
    let mut result = PixelBuffer::like(source);
    let width = source.width() as usize;

    row_executor::run(result.pixels_mut(), width, thread_count, |rows, chunk| {
        for (local_y, row) in chunk.chunks_mut(width).enumerate() {
            let source_y = ((rows.start + local_y) as i64).saturating_sub(dy);
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = source
                    .get_checked((x as i64).saturating_sub(dx), source_y)
                    .unwrap_or(border);
            }
        }
    });

    result
}
