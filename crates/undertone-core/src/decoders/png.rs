//! PNG image decoder

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

use crate::models::PixelBuffer;

/// Decode a PNG file
pub(crate) fn decode_png<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, String> {
    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open PNG file: {}", e))?;
    decode_reader(BufReader::new(file))
}

/// Decode PNG bytes already in memory
pub(crate) fn decode_png_bytes(bytes: &[u8]) -> Result<PixelBuffer, String> {
    decode_reader(Cursor::new(bytes))
}

fn decode_reader<R: BufRead + Seek>(reader: R) -> Result<PixelBuffer, String> {
    let decoder = png::Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| "Failed to determine PNG buffer size".to_string())?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;
    let bytes = &buf[..frame_info.buffer_size()];

    // Normalize every supported layout to RGBA8
    let data = match (color_type, bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => bytes.to_vec(),
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => high_bytes(bytes),
        (png::ColorType::Rgb, png::BitDepth::Eight) => rgb8_to_rgba(bytes),
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => rgb8_to_rgba(&high_bytes(bytes)),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => gray8_to_rgba(bytes),
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => gray8_to_rgba(&high_bytes(bytes)),
        (png::ColorType::GrayscaleAlpha, _) => {
            return Err("Grayscale+Alpha PNG not supported".to_string());
        }
        (png::ColorType::Indexed, _) => {
            return Err("Indexed PNG not supported".to_string());
        }
        _ => {
            return Err(format!(
                "Unsupported PNG format: {:?} at {:?}",
                color_type, bit_depth
            ));
        }
    };

    PixelBuffer::new(width, height, data)
}

/// Take the high byte of each big-endian 16-bit sample.
fn high_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.chunks_exact(2).map(|pair| pair[0]).collect()
}

fn rgb8_to_rgba(bytes: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(bytes.len() / 3 * 4);
    for pixel in bytes.chunks_exact(3) {
        data.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
    }
    data
}

fn gray8_to_rgba(bytes: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(bytes.len() * 4);
    for &value in bytes {
        data.extend_from_slice(&[value, value, value, 255]);
    }
    data
}
