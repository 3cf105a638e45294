//! # imgsh
//!
//! Local, privacy-first image resizing, format conversion and OCR text
//! extraction from the command line. Nothing leaves the machine: pixels are
//! handled by pure-Rust codecs and OCR runs a locally installed engine.
//!
//! # Architecture
//!
//! Every command is a short pipeline of pure resolvers followed by one call
//! into an external collaborator:
//!
//! ```text
//! format resolver   --format / --out suffix / input suffix → codec + extension
//! path resolver     input + --out + extension               → output file
//! geometry resolver source size + width/height/fit          → target size + resample
//! backend           decode → auto-orient → resample → encode → write
//! OCR engine        output image                           → sidecar (.txt / .json)
//! ```
//!
//! The resolvers never touch pixels and never write, so they are unit tested
//! directly. The [`process::Processor`] is generic over the backend and the
//! OCR engine, so orchestration is tested with mocks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | Format resolution by precedence, codec capability table, encode options |
//! | [`imaging`] | Geometry resolution and the `image`-crate backend (decode, orient, resample, encode) |
//! | [`paths`] | Output and sidecar path resolution, collision checks |
//! | [`naming`] | Batch `--name-pattern` parsing and rendering |
//! | [`scan`] | Sorted input discovery for batch mode |
//! | [`ocr`] | OCR engine trait, the `textract` engine, sidecar writing |
//! | [`process`] | resize / convert / extract-text / batch orchestration |
//! | [`config`] | Stock defaults plus optional `--config` TOML overrides |
//! | [`output`] | CLI output formatting |
//! | [`error`] | The crate-wide [`ImgshError`] |
//!
//! # Design Decisions
//!
//! ## Static Codec Capabilities
//!
//! Whether a codec takes a quality setting or can carry EXIF is a fixed table
//! in [`format`], not something discovered by attempting an encode and
//! retrying on failure. EXIF survives into JPEG and PNG; for WebP it is
//! dropped with a warning.
//!
//! ## Orientation First
//!
//! EXIF orientation is applied before the source size is measured, so a
//! portrait photo stored as a landscape raster resizes as a portrait. When
//! EXIF is carried over, its Orientation tag is reset to 1 so viewers do not
//! rotate the already-upright pixels again.
//!
//! ## Check, Then Write
//!
//! Output paths are resolved and checked for collisions before any decode,
//! encode or OCR call. A refused overwrite leaves the filesystem untouched.

pub mod config;
pub mod error;
pub mod format;
pub mod imaging;
pub mod naming;
pub mod ocr;
pub mod output;
pub mod paths;
pub mod process;
pub mod scan;

pub use error::{ImgshError, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
