//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Auto-orient | EXIF Orientation → `DynamicImage::apply_orientation` |
//! | Resize | `resize_exact` with `Lanczos3` |
//! | Cover crop | `resize_exact` to fill size + centered `crop_imm` |
//! | Encode → JPEG, PNG | `image::codecs::{jpeg, png}` |
//! | Encode → WebP | `webp` crate (lossy, quality-controlled) |
//! | EXIF carry-over | `Orientation::remove_from_exif_chunk` + `set_exif_metadata` (JPEG, PNG) |

use super::backend::{BackendError, ImageBackend};
use super::calculations::center_offset;
use super::geometry::RESAMPLE_FILTER;
use super::params::{ConvertParams, Dimensions, Resample, ResizeParams, ResizePlan};
use crate::format::{Codec, EncodeOptions};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageEncoder, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded, upright image plus its EXIF block with the Orientation tag
/// already reset to 1.
struct Decoded {
    image: DynamicImage,
    exif: Option<Vec<u8>>,
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn open_decoder(path: &Path) -> Result<impl ImageDecoder, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()
        .map_err(|e| decode_error(path, e))
}

/// Orientation values 5-8 transpose the raster.
fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Load, decode and auto-orient an image from disk.
fn load_image(path: &Path) -> Result<Decoded, BackendError> {
    let mut decoder = open_decoder(path)?;
    // Unreadable metadata never blocks the pixels.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let exif = decoder.exif_metadata().ok().flatten().map(|mut chunk| {
        // The pixels are rotated below, so the carried tag must say "upright"
        let _ = Orientation::remove_from_exif_chunk(&mut chunk);
        chunk
    });

    let mut image = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    image.apply_orientation(orientation);

    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        ?orientation,
        has_exif = exif.is_some(),
        "decoded"
    );
    Ok(Decoded { image, exif })
}

fn resample(image: &DynamicImage, plan: &ResizePlan) -> DynamicImage {
    let target = plan.target;
    match plan.resample {
        Resample::Scale => image.resize_exact(target.width, target.height, RESAMPLE_FILTER),
        Resample::FillCrop { fill } => {
            let filled = image.resize_exact(fill.width, fill.height, RESAMPLE_FILTER);
            filled.crop_imm(
                center_offset(fill.width, target.width),
                center_offset(fill.height, target.height),
                target.width,
                target.height,
            )
        }
    }
}

fn encode_error(codec: Codec, e: impl std::fmt::Display) -> BackendError {
    BackendError::Encode {
        codec: codec.name(),
        reason: e.to_string(),
    }
}

/// Hand the EXIF block to an `image` encoder that can embed it.
fn with_exif<E: ImageEncoder>(
    mut encoder: E,
    exif: Option<&[u8]>,
    codec: Codec,
) -> Result<E, BackendError> {
    if let Some(exif) = exif {
        encoder
            .set_exif_metadata(exif.to_vec())
            .map_err(|e| encode_error(codec, e))?;
    }
    Ok(encoder)
}

/// Encode `image` into an in-memory buffer according to `options`.
fn encode(
    image: &DynamicImage,
    exif: Option<&[u8]>,
    options: &EncodeOptions,
) -> Result<Vec<u8>, BackendError> {
    let codec = options.codec;
    let exif = exif.filter(|_| options.embed_exif);
    let mut buf = Vec::new();
    match codec {
        Codec::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            let quality = options.quality.unwrap_or_default().value();
            let encoder = with_exif(JpegEncoder::new_with_quality(&mut buf, quality), exif, codec)?;
            rgb.write_with_encoder(encoder)
                .map_err(|e| encode_error(codec, e))?;
        }
        Codec::Png => {
            let encoder = with_exif(PngEncoder::new(&mut buf), exif, codec)?;
            image
                .write_with_encoder(encoder)
                .map_err(|e| encode_error(codec, e))?;
        }
        Codec::WebP => {
            // The webp encoder only takes 8-bit RGB/RGBA
            let pixels = if image.color().has_alpha() {
                DynamicImage::ImageRgba8(image.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(image.to_rgb8())
            };
            let quality = options.quality.unwrap_or_default().value();
            let encoder =
                webp::Encoder::from_image(&pixels).map_err(|e| encode_error(codec, e))?;
            buf = encoder.encode(quality as f32).to_vec();
        }
    }
    Ok(buf)
}

/// Encode, then write to `output`, creating parent directories on demand.
fn save_image(
    decoded: &Decoded,
    image: &DynamicImage,
    output: &Path,
    options: &EncodeOptions,
) -> Result<(), BackendError> {
    let bytes = encode(image, decoded.exif.as_deref(), options)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &bytes)?;

    tracing::debug!(
        output = %output.display(),
        codec = %options.codec,
        bytes = bytes.len(),
        "encoded"
    );
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let mut decoder = open_decoder(path)?;
        let (width, height) = decoder.dimensions();
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let dims = if swaps_axes(orientation) {
            Dimensions::new(height, width)
        } else {
            Dimensions::new(width, height)
        };
        Ok(dims)
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let decoded = load_image(&params.source)?;
        let resized = resample(&decoded.image, &params.plan);
        save_image(&decoded, &resized, &params.output, &params.encode)
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let decoded = load_image(&params.source)?;
        save_image(&decoded, &decoded.image, &params.output, &params.encode)
    }
}
