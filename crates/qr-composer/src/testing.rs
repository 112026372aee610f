//! Shared helpers for unit tests.

use std::io::Cursor;

use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};

/// PNG bytes of a solid square.
pub fn solid_png(color: Rgba<u8>, size: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(size, size, color)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn png_data_uri(color: Rgba<u8>, size: u32) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(solid_png(color, size));
    format!("data:image/png;base64,{b64}")
}

/// Decode the single QR symbol in a PNG and return its payload.
pub fn decode_qr(png: &[u8]) -> String {
    let img = image::load_from_memory(png).unwrap().to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| img.get_pixel(x as u32, y as u32)[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
    let (_, content) = grids[0].decode().unwrap();
    content
}
