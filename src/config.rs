//! Tool configuration.
//!
//! Defaults for every option the CLI does not set explicitly live in one
//! [`Config`] value, built once at startup and passed by reference to the
//! [`Processor`](crate::process::Processor). Nothing reads configuration from
//! globals.
//!
//! ## Layers
//!
//! ```text
//! stock defaults  <  --config <PATH> file  <  command-line flags
//! ```
//!
//! The file is optional and sparse: it only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! [defaults]
//! quality = 90              # JPEG/WebP quality (1-100)
//! fit = "contain"           # contain | cover | exact
//! keep_aspect = true
//! preserve_exif = true
//! overwrite = false
//!
//! [naming]
//! resize_suffix = "_imgsh"
//! convert_suffix = "_converted"
//! batch_pattern = "{stem}_imgsh"
//!
//! [ocr]
//! engine = "textract"
//! format = "txt"            # txt | json
//! lang = "en"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{FitMode, Quality};
use crate::naming::NamePattern;
use crate::ocr::{OcrEngineKind, OcrFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from stock defaults plus an optional file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fallbacks for resize/convert options.
    pub defaults: DefaultsConfig,
    /// Output naming conventions.
    pub naming: NamingConfig,
    /// OCR defaults.
    pub ocr: OcrConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Quality::new(i64::from(self.defaults.quality)).is_err() {
            return Err(ConfigError::Validation(format!(
                "defaults.quality must be 1-100, got {}",
                self.defaults.quality
            )));
        }
        if self.naming.resize_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "naming.resize_suffix must not be empty".into(),
            ));
        }
        if self.naming.convert_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "naming.convert_suffix must not be empty".into(),
            ));
        }
        if let Err(e) = NamePattern::parse(&self.naming.batch_pattern) {
            return Err(ConfigError::Validation(format!("naming.batch_pattern: {e}")));
        }
        Ok(())
    }
}

/// Fallback values for options not given on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    pub fit: FitMode,
    pub keep_aspect: bool,
    pub preserve_exif: bool,
    pub overwrite: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            fit: FitMode::Contain,
            keep_aspect: true,
            preserve_exif: true,
            overwrite: false,
        }
    }
}

/// Suffixes and patterns used when no `--out` names the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Appended to the input stem by `resize`.
    pub resize_suffix: String,
    /// Appended to the input stem by `convert`.
    pub convert_suffix: String,
    /// Default `--name-pattern` for `batch-resize`.
    pub batch_pattern: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            resize_suffix: "_imgsh".to_string(),
            convert_suffix: "_converted".to_string(),
            batch_pattern: "{stem}_imgsh".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    pub format: OcrFormat,
    /// Language hint passed to the engine.
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Textract,
            format: OcrFormat::Txt,
            lang: "en".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration.
///
/// Without a path this is the stock defaults. A path that does not exist is
/// an error: it was asked for explicitly.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = match path {
        None => None,
        Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
        Some(p) => {
            let content = fs::read_to_string(p)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
    };
    let config = resolve_config(overlay)?;
    tracing::debug!(?path, "configuration loaded");
    Ok(config)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgsh configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Use with:  imgsh --config imgsh.toml <command> ...
# Command-line flags always win over values in this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Defaults for resize / convert / batch-resize
# ---------------------------------------------------------------------------
[defaults]
# JPEG/WebP encoding quality (1 = worst, 100 = best). PNG ignores it.
quality = 90

# How the source aspect ratio relates to --width/--height:
#   contain - fit inside the box, keep aspect ratio
#   cover   - fill the box exactly, crop the overflow (needs both edges)
#   exact   - force the literal size (needs both edges)
fit = "contain"

# With fit = "contain": derive a missing edge from the source aspect ratio.
keep_aspect = true

# Carry EXIF metadata into outputs that support it (JPEG and PNG).
preserve_exif = true

# Replace existing output files instead of failing.
overwrite = false

# ---------------------------------------------------------------------------
# Output naming
# ---------------------------------------------------------------------------
[naming]
# Added to the input file name when no --out is given.
resize_suffix = "_imgsh"
convert_suffix = "_converted"

# Default --name-pattern for batch-resize.
# Placeholders: {stem} {ext} {width} {height} {index}
batch_pattern = "{stem}_imgsh"

# ---------------------------------------------------------------------------
# OCR
# ---------------------------------------------------------------------------
[ocr]
# Only "textract" (the system tesseract binary) is supported.
engine = "textract"

# Sidecar format: "txt" or "json".
format = "txt"

# Language hint; "en" maps to tesseract's "eng".
lang = "en"
"##
}
