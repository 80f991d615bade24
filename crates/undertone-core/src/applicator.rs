//! Linear per-channel filter application
//!
//! Applies a filter descriptor to every pixel independently. There is no
//! cross-pixel state, so large buffers are split across the rayon pool.

use rayon::prelude::*;

use crate::models::{FilterDescriptor, PixelBuffer, BYTES_PER_PIXEL};

/// Minimum number of pixels to trigger parallel processing
pub(crate) const PARALLEL_THRESHOLD: usize = 30_000;

/// Apply a filter to a buffer, producing a new buffer of the same dimensions.
///
/// The input is never mutated. Red mixes all three input channels; green and
/// blue use only their own channel; alpha is copied through unchanged (the
/// descriptor's alpha coefficients are deliberately not consumed). Output is
/// bit-identical whether the parallel or sequential path runs.
pub fn apply_filter(buffer: &PixelBuffer, filter: &FilterDescriptor) -> PixelBuffer {
    let mut data = vec![0u8; buffer.data.len()];

    if buffer.pixel_count() >= PARALLEL_THRESHOLD {
        data.par_chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(buffer.data.par_chunks_exact(BYTES_PER_PIXEL))
            .for_each(|(out, src)| apply_pixel(out, src, filter));
    } else {
        data.chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(buffer.data.chunks_exact(BYTES_PER_PIXEL))
            .for_each(|(out, src)| apply_pixel(out, src, filter));
    }

    PixelBuffer {
        width: buffer.width,
        height: buffer.height,
        data,
    }
}

#[inline]
fn apply_pixel(out: &mut [u8], src: &[u8], filter: &FilterDescriptor) {
    let r = src[0] as f64;
    let g = src[1] as f64;
    let b = src[2] as f64;

    out[0] = quantize(r * filter.red.r + g * filter.red.g + b * filter.red.b
        + filter.red.offset * 255.0);
    out[1] = quantize(g * filter.green.g + filter.green.offset * 255.0);
    out[2] = quantize(b * filter.blue.b + filter.blue.offset * 255.0);
    out[3] = src[3];
}

#[inline]
fn quantize(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}
