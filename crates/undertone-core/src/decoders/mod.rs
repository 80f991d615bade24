//! Image decoders
//!
//! PNG and JPEG sources, all normalized to interleaved RGBA8.

mod jpeg;
mod png;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::models::PixelBuffer;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 2] = [0xFF, 0xD8];

/// Decode an image from a file path, dispatching on the extension.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| "No file extension found".to_string())?;

    match extension.as_str() {
        "png" => png::decode_png(path),
        "jpg" | "jpeg" => jpeg::decode_jpeg(path),
        _ => Err(format!("Unsupported file format: {}", extension)),
    }
}

/// Decode encoded image bytes, sniffing the container format.
pub fn decode_image_from_bytes(bytes: &[u8]) -> Result<PixelBuffer, String> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        png::decode_png_bytes(bytes)
    } else if bytes.starts_with(&JPEG_SIGNATURE) {
        jpeg::decode_jpeg_bytes(bytes)
    } else {
        Err("Unrecognized image format (expected PNG or JPEG)".to_string())
    }
}
