//! Image processing, pure Rust and statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image` decoder dimensions + EXIF orientation |
//! | **Geometry** | [`resolve_geometry`] (pure) |
//! | **Resize** | Lanczos3 `resize_exact`, centered crop for `cover` |
//! | **Encode** | `image` JPEG/PNG encoders, `webp` for WebP |
//! | **EXIF** | `image` orientation reset + encoder `set_exif_metadata` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Geometry**: Request validation and fit-mode resolution
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
pub mod geometry;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use geometry::{RESAMPLE_FILTER, resolve_geometry};
pub use params::{
    ConvertParams, Dimensions, FitMode, Quality, Resample, ResizeParams, ResizePlan, ResizeRequest,
};
pub use rust_backend::RustBackend;
