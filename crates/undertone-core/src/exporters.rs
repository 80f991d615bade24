//! Image exporters
//!
//! Write corrected buffers out as RGBA8 PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::PixelBuffer;

/// Export a buffer to a PNG file
pub fn export_png<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<(), String> {
    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create PNG file: {}", e))?;
    write_png(BufWriter::new(file), buffer)
}

/// Encode a buffer as PNG in memory
pub fn export_png_to_bytes(buffer: &PixelBuffer) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    write_png(&mut bytes, buffer)?;
    Ok(bytes)
}

fn write_png<W: Write>(writer: W, buffer: &PixelBuffer) -> Result<(), String> {
    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;
    writer
        .write_image_data(&buffer.data)
        .map_err(|e| format!("Failed to write PNG data: {}", e))?;

    Ok(())
}
