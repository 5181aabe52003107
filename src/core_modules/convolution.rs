// THEORY:
// The convolution filter slides a kernel over the source and writes each weighted
// sum into a fresh destination.
//
// Edge policy: window samples that land outside the image are skipped. They are not
// zero-padded, not clamped to the nearest edge, and the partial sum is not rescaled
// by the covered weight. Border pixels therefore come from a partial window, which
// darkens blurred edges and shifts sharpened ones. Output must match this policy
// byte for byte, so it is kept as is.
//
// Numeric policy: accumulate in f64 in kernel order (`ky` outer, `kx` inner),
// then `trunc(sum / divisor + offset)` (toward zero, saturating) and clamp to
// 0..=255. The three channels share one pass over the window but never mix.

use crate::core_modules::kernel::ConvolutionKernel;
use crate::core_modules::pixel_buffer::{PixelBuffer, Rgb, clamp_channel};
use crate::core_modules::row_executor;

/// Applies `kernel` to `source` using `thread_count` row workers.
pub fn apply(source: &PixelBuffer, kernel: &ConvolutionKernel, thread_count: usize) -> PixelBuffer {
    let mut result = PixelBuffer::like(source);
    let width = source.width() as usize;

    row_executor::run(result.pixels_mut(), width, thread_count, |rows, chunk| {
        for (local_y, row) in chunk.chunks_mut(width).enumerate() {
            let y = rows.start + local_y;
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = convolve_pixel(source, kernel, x as i64, y as i64);
            }
        }
    });

    result
}

#[inline]
fn convolve_pixel(source: &PixelBuffer, kernel: &ConvolutionKernel, x: i64, y: i64) -> Rgb {
    let radius = kernel.radius() as i64;
    let mut sums = [0.0f64; 3];

    for ky in 0..kernel.size() {
        for kx in 0..kernel.size() {
            let Some(sample) = source.get_checked(x + kx as i64 - radius, y + ky as i64 - radius)
            else {
                continue;
            };
            let weight = kernel.value(kx, ky);
            for (sum, channel) in sums.iter_mut().zip(sample.channels()) {
                *sum += channel as f64 * weight;
            }
        }
    }

    let [red, green, blue] = sums.map(|sum| finish_channel(sum, kernel));
    Rgb::new(red, green, blue)
}

#[inline]
fn finish_channel(sum: f64, kernel: &ConvolutionKernel) -> u8 {
    // `as i64` truncates toward zero and saturates, NaN becomes 0
    clamp_channel((sum / kernel.divisor() + kernel.offset()) as i64)
}
