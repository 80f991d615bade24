//! JPEG image decoder

use std::path::Path;

use crate::models::PixelBuffer;

/// Decode a JPEG file
pub(crate) fn decode_jpeg<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, String> {
    let bytes =
        std::fs::read(path.as_ref()).map_err(|e| format!("Failed to read JPEG file: {}", e))?;
    decode_jpeg_bytes(&bytes)
}

/// Decode JPEG bytes already in memory
pub(crate) fn decode_jpeg_bytes(bytes: &[u8]) -> Result<PixelBuffer, String> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to decode JPEG: {}", e))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}
