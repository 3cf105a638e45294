//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, resize, and convert. Geometry and path decisions are
//! made before the backend is called, so a backend only moves pixels.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate (decode, orientation, Lanczos3 resampling, JPEG/PNG encode) and the
//! `webp` crate (lossy WebP encode).

use super::params::{ConvertParams, Dimensions, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode {codec}: {reason}")]
    Encode { codec: &'static str, reason: String },
}

/// Trait for image processing backends.
///
/// Dimensions reported by `identify` are *display* dimensions: EXIF
/// orientation has already been applied, so a portrait photo stored as a
/// landscape raster reports as portrait.
pub trait ImageBackend {
    /// Get oriented image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, auto-orient, resample per the plan, encode, write.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Decode, auto-orient, encode in the target codec, write.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;
}
