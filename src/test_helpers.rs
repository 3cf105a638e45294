//! Shared test utilities: synthetic images written with the `image` encoders.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("portrait.jpg");
//! // Stored 200x100, tagged "rotate 90 CW": displays as 100x200
//! create_test_jpeg_with_orientation(&path, 200, 100, 6);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Pixel sources
// =========================================================================

/// A gradient, so resampling and cropping have real content to work on.
fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

/// A little-endian TIFF block whose IFD0 holds a single Orientation entry.
fn exif_with_orientation(orientation: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"II");
    data.extend_from_slice(&42u16.to_le_bytes());
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    // tag 0x0112, type SHORT, count 1, inline value
    data.extend_from_slice(&0x0112u16.to_le_bytes());
    data.extend_from_slice(&3u16.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&orientation.to_le_bytes());
    data.extend_from_slice(&[0, 0]);
    data.extend_from_slice(&0u32.to_le_bytes());
    data
}

fn encode_jpeg(width: u32, height: u32, exif: Option<Vec<u8>>) -> Vec<u8> {
    let img = gradient_rgb(width, height);
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
    if let Some(exif) = exif {
        encoder.set_exif_metadata(exif).unwrap();
    }
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

// =========================================================================
// File writers
// =========================================================================

pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_jpeg(width, height, None)).unwrap();
}

/// Write a JPEG whose raster is `width`x`height` and whose EXIF block carries
/// the given Orientation tag.
pub fn create_test_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    let jpeg = encode_jpeg(width, height, Some(exif_with_orientation(orientation)));
    std::fs::write(path, jpeg).unwrap();
}

/// Write an RGBA PNG with a semi-transparent gradient.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            64,
            200,
        ])
    });
    img.save(path).unwrap();
}

#[test]
fn orientation_fixture_is_read_by_decoder() {
    use image::ImageDecoder;
    use image::metadata::Orientation;

    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("tagged.jpg");
    create_test_jpeg_with_orientation(&path, 40, 20, 6);

    let mut decoder = image::ImageReader::open(&path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .into_decoder()
        .unwrap();
    assert_eq!(decoder.orientation().unwrap(), Orientation::Rotate90);
}
