//! The crate-wide error type.
//!
//! Every failure the CLI can report is an [`ImgshError`]. Variants name the
//! failure category; the `Display` text is the message shown to the user, and
//! it always says what to change. Lower layers ([`BackendError`],
//! [`ConfigError`]) keep their own enums and convert in via `#[from]`.

use crate::config::ConfigError;
use crate::imaging::BackendError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgshError {
    // ── Input errors ────────────────────────────────────────────────────
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Expected a file, got: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Expected a directory, got: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No supported images found in the input directory.")]
    NoImagesFound,

    // ── Option validation ───────────────────────────────────────────────
    #[error("{flag} must be greater than 0. Got: {value}")]
    NonPositive { flag: &'static str, value: i64 },

    #[error("{flag} must be at most {max}. Got: {value}")]
    TooLarge {
        flag: &'static str,
        value: i64,
        max: u32,
    },

    #[error("--quality must be between 1 and 100. Got: {0}")]
    QualityOutOfRange(i64),

    #[error("Invalid --fit '{0}'. Supported values: contain, cover, exact")]
    InvalidFitMode(String),

    #[error("At least one of --width or --height is required for resize.")]
    MissingDimensions,

    #[error("Fit mode '{0}' requires both --width and --height.")]
    IncompleteDimensionsForFitMode(&'static str),

    #[error("convert requires --format. Supported formats: jpeg, jpg, png, webp")]
    FormatRequired,

    #[error("Unsupported format '{requested}'. Supported formats: {supported}")]
    UnsupportedFormat { requested: String, supported: String },

    #[error("Unsupported OCR engine '{0}'. Supported values: textract")]
    UnsupportedOcrEngine(String),

    #[error("Unsupported --ocr-format '{0}'. Supported values: txt, json")]
    UnsupportedOcrFormat(String),

    // ── Batch naming ────────────────────────────────────────────────────
    #[error(
        "Invalid placeholder in --name-pattern: '{0}'. \
         Supported placeholders: {{stem}}, {{ext}}, {{width}}, {{height}}, {{index}}"
    )]
    InvalidPlaceholder(String),

    #[error("Malformed --name-pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },

    // ── Output ──────────────────────────────────────────────────────────
    #[error(
        "Output already exists: {}. Use --overwrite to replace existing files.",
        .0.display()
    )]
    OutputExists(PathBuf),

    // ── OCR ─────────────────────────────────────────────────────────────
    #[error("OCR engine '{engine}' is not available: {hint}")]
    OcrUnavailable { engine: &'static str, hint: String },

    #[error("OCR failed for '{}': {reason}", .path.display())]
    OcrFailed { path: PathBuf, reason: String },

    // ── GUI ─────────────────────────────────────────────────────────────
    #[error(
        "The desktop GUI is not part of this build. \
         Use the resize, batch-resize, convert or extract-text commands instead."
    )]
    GuiUnavailable,

    // ── Wrapped lower-layer errors ──────────────────────────────────────
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ImgshError>;
