//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`geometry`](super::geometry) resolver (which decides
//! the output size) and the [`backend`](super::backend) (which does the actual
//! pixel work). This separation allows swapping backends (e.g. for testing
//! with a mock) without changing resolution logic.
//!
//! ## Types
//!
//! - [`Dimensions`]: a pixel size, always at least 1×1 once computed.
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Validated on construction.
//! - [`FitMode`]: How the source aspect ratio relates to the requested box.
//! - [`ResizeRequest`]: Partially specified width/height plus fit mode and aspect flag.
//! - [`ResizePlan`] / [`Resample`]: The resolved target size and how to reach it.
//! - [`ResizeParams`] / [`ConvertParams`]: Full specification handed to a backend.

use crate::error::{ImgshError, Result};
use crate::format::EncodeOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    /// Validate a user-supplied quality. Out-of-range values are rejected,
    /// not clamped.
    pub fn new(value: i64) -> Result<Self> {
        if (1..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ImgshError::QualityOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Policy governing how the source aspect ratio relates to a requested box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit inside the box, preserving aspect ratio, no cropping.
    #[default]
    Contain,
    /// Scale and center-crop to exactly fill the box.
    Cover,
    /// Force the literal requested dimensions.
    Exact,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Contain => "contain",
            FitMode::Cover => "cover",
            FitMode::Exact => "exact",
        }
    }

    /// Modes that cannot derive a missing edge from the source.
    pub fn needs_both_dimensions(self) -> bool {
        matches!(self, FitMode::Cover | FitMode::Exact)
    }
}

impl FromStr for FitMode {
    type Err = ImgshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "contain" => Ok(FitMode::Contain),
            "cover" => Ok(FitMode::Cover),
            "exact" => Ok(FitMode::Exact),
            _ => Err(ImgshError::InvalidFitMode(s.to_string())),
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partially specified resize: either edge may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect: bool,
    pub fit: FitMode,
}

impl ResizeRequest {
    /// Build a request from raw CLI numbers, rejecting non-positive edges.
    pub fn from_raw(
        width: Option<i64>,
        height: Option<i64>,
        keep_aspect: bool,
        fit: FitMode,
    ) -> Result<Self> {
        Ok(Self {
            width: positive("--width", width)?,
            height: positive("--height", height)?,
            keep_aspect,
            fit,
        })
    }

    /// Check the width/height combination against the fit mode.
    pub fn validate(&self) -> Result<()> {
        match (self.width, self.height) {
            (None, None) => Err(ImgshError::MissingDimensions),
            (Some(_), Some(_)) => Ok(()),
            _ if self.fit.needs_both_dimensions() => Err(
                ImgshError::IncompleteDimensionsForFitMode(self.fit.as_str()),
            ),
            _ => Ok(()),
        }
    }
}

fn positive(flag: &'static str, value: Option<i64>) -> Result<Option<u32>> {
    match value {
        None => Ok(None),
        Some(v) if v <= 0 => Err(ImgshError::NonPositive { flag, value: v }),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| ImgshError::TooLarge {
                flag,
                value: v,
                max: u32::MAX,
            }),
    }
}

/// How the backend reaches the planned target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resample {
    /// Scale straight to the target; axes scale independently.
    Scale,
    /// Scale to `fill` (covers the target on both axes), then center-crop.
    FillCrop { fill: Dimensions },
}

/// Resolved output of the geometry stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub target: Dimensions,
    pub resample: Resample,
}

/// Parameters for a resize operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub plan: ResizePlan,
    pub encode: EncodeOptions,
}

/// Parameters for a re-encode without resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub encode: EncodeOptions,
}
