//! Interleaved RGBA pixel buffer

use serde::{Deserialize, Serialize};

/// Number of bytes per interleaved RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Decoded raster image data.
///
/// Interleaved R,G,B,A bytes; `data.len()` is always `width * height * 4`.
/// Alpha is carried alongside the color channels but is independent of them:
/// the estimator ignores it and the applicator copies it through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGBA bytes, row-major
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, validating the dimension/length invariant.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(format!(
                "Pixel data length {} does not match {}x{} RGBA (expected {})",
                data.len(),
                width,
                height,
                expected
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * BYTES_PER_PIXEL);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_length() {
        let result = PixelBuffer::new(2, 2, vec![0u8; 15]);
        assert!(result.is_err(), "15 bytes cannot be a 2x2 RGBA image");

        let result = PixelBuffer::new(2, 2, vec![0u8; 16]);
        assert!(result.is_ok());
    }

    #[test]
    fn filled_respects_invariant() {
        let buffer = PixelBuffer::filled(3, 5, [10, 20, 30, 255]);
        assert_eq!(buffer.data.len(), 3 * 5 * BYTES_PER_PIXEL);
        assert_eq!(buffer.pixel_count(), 15);
        assert_eq!(&buffer.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn zero_sized_buffer_is_representable() {
        // A 0x0 buffer is constructible; rejecting it is the estimator's job.
        let buffer = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        assert_eq!(buffer.pixel_count(), 0);
    }
}
