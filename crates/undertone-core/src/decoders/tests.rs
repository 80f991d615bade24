//! Tests for image decoders

use super::*;
use crate::exporters::export_png_to_bytes;

#[test]
fn png_bytes_round_trip_preserves_rgba() {
    let mut data = Vec::new();
    for i in 0..(6 * 4) as u32 {
        data.extend_from_slice(&[(i * 9) as u8, (i * 5) as u8, (i * 3) as u8, (200 + i) as u8]);
    }
    let original = PixelBuffer::new(6, 4, data).unwrap();

    let encoded = export_png_to_bytes(&original).unwrap();
    let decoded = decode_image_from_bytes(&encoded).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn png_file_round_trip_preserves_rgba() {
    let original = PixelBuffer::filled(4, 4, [70, 140, 210, 255]);
    let encoded = export_png_to_bytes(&original).unwrap();

    let path = std::env::temp_dir().join("undertone_decoder_roundtrip.png");
    std::fs::write(&path, &encoded).unwrap();
    let decoded = decode_image(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(decoded.unwrap(), original);
}

#[test]
fn garbage_bytes_are_rejected() {
    let result = decode_image_from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00]);
    assert!(result.is_err());

    // A PNG signature followed by garbage must fail cleanly, not panic.
    let mut fake = Vec::from(PNG_SIGNATURE);
    fake.extend_from_slice(&[0u8; 16]);
    let result = decode_image_from_bytes(&fake);
    assert!(result.is_err());
}

#[test]
fn unsupported_extension_is_rejected_before_io() {
    let result = decode_image("missing_directory/picture.gif");
    assert!(result.is_err());
    assert!(
        result.unwrap_err().contains("Unsupported file format"),
        "extension check should come before file access"
    );
}

#[test]
fn missing_extension_is_rejected() {
    let result = decode_image("picture");
    assert!(result.is_err());
}
