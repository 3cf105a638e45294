//! OCR adapter: text extraction delegated to an external engine.
//!
//! Recognition itself is not done here. An [`OcrEngine`] turns an image path
//! plus a language hint into text, and this module turns that text into a
//! sidecar file.
//!
//! ## Engines
//!
//! | `--engine` | Implementation |
//! |---|---|
//! | `textract` | system `tesseract` binary, `tesseract <image> stdout -l <lang>` |
//!
//! ## Sidecar formats
//!
//! - `txt`: the extracted text, UTF-8, as-is.
//! - `json`: `{"engine", "source_file", "language", "text"}`, pretty-printed
//!   with two-space indentation.

use crate::error::{ImgshError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

/// A text-extraction engine.
pub trait OcrEngine {
    /// Engine identifier as accepted by `--engine`.
    fn name(&self) -> &'static str;

    /// Extract text from the image at `path`. `lang` is a short hint
    /// (`en`, `de`, ...).
    fn extract(&self, path: &Path, lang: &str) -> Result<String>;
}

/// The closed set of selectable engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    #[default]
    Textract,
}

impl OcrEngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OcrEngineKind::Textract => "textract",
        }
    }
}

impl FromStr for OcrEngineKind {
    type Err = ImgshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "textract" => Ok(OcrEngineKind::Textract),
            _ => Err(ImgshError::UnsupportedOcrEngine(s.to_string())),
        }
    }
}

impl fmt::Display for OcrEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sidecar file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrFormat {
    #[default]
    Txt,
    Json,
}

impl OcrFormat {
    /// File suffix, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OcrFormat::Txt => "txt",
            OcrFormat::Json => "json",
        }
    }
}

impl FromStr for OcrFormat {
    type Err = ImgshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(OcrFormat::Txt),
            "json" => Ok(OcrFormat::Json),
            _ => Err(ImgshError::UnsupportedOcrFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OcrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// =============================================================================
// textract: tesseract CLI
// =============================================================================

/// Runs the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TextractEngine {
    program: String,
}

impl TextractEngine {
    pub fn new() -> Self {
        Self {
            program: "tesseract".to_string(),
        }
    }

    /// Use a different executable (absolute path or name on `PATH`).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TextractEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a short language hint to a tesseract language code.
///
/// Only `en` needs translating; anything else is passed through so that
/// installed traineddata names (`deu`, `chi_sim`) work directly.
pub fn language_code(lang: &str) -> String {
    match lang.trim().to_ascii_lowercase().as_str() {
        "" | "en" => "eng".to_string(),
        other => other.to_string(),
    }
}

impl OcrEngine for TextractEngine {
    fn name(&self) -> &'static str {
        OcrEngineKind::Textract.as_str()
    }

    fn extract(&self, path: &Path, lang: &str) -> Result<String> {
        let code = language_code(lang);
        tracing::debug!(program = %self.program, path = %path.display(), lang = %code, "running OCR");

        let output = Command::new(&self.program)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&code)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ImgshError::OcrUnavailable {
                    engine: self.name(),
                    hint: format!(
                        "'{}' was not found on PATH. Install Tesseract OCR \
                         (e.g. `apt install tesseract-ocr` or `brew install tesseract`).",
                        self.program
                    ),
                },
                _ => ImgshError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ImgshError::OcrFailed {
                path: path.to_path_buf(),
                reason: if stderr.is_empty() {
                    format!("{} exited with {}", self.program, output.status)
                } else {
                    stderr
                },
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(chars = text.len(), "OCR finished");
        Ok(text)
    }
}

// =============================================================================
// Sidecar writing
// =============================================================================

/// JSON sidecar body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrSidecar {
    pub engine: String,
    pub source_file: String,
    pub language: String,
    pub text: String,
}

/// Render a sidecar body in the given format.
pub fn render_sidecar(format: OcrFormat, sidecar: &OcrSidecar) -> Result<String> {
    match format {
        OcrFormat::Txt => Ok(sidecar.text.clone()),
        OcrFormat::Json => Ok(serde_json::to_string_pretty(sidecar)?),
    }
}

/// Write a sidecar, creating parent directories as needed.
pub fn write_sidecar(path: &Path, format: OcrFormat, sidecar: &OcrSidecar) -> Result<()> {
    let body = render_sidecar(format, sidecar)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;
    Ok(())
}
