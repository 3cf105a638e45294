//! Output format resolution and per-codec encode options.
//!
//! ## Precedence
//!
//! ```text
//! 1. --format value          (case-insensitive, leading dot stripped)
//! 2. --out suffix            (only if the hint has one)
//! 3. input file suffix
//! ```
//!
//! The winning key is looked up in a closed table. Aliases collapse onto one
//! codec, and every codec has exactly one canonical extension, so `jpeg`,
//! `JPG` and `.Jpeg` all produce `.jpg` files.
//!
//! ## Capabilities
//!
//! What each codec can take is decided here, statically, not by trying an
//! encode and catching the failure:
//!
//! | Codec | Quality | EXIF |
//! |---|---|---|
//! | JPEG | yes | yes (APP1 segment) |
//! | PNG | no | yes (`eXIf` chunk) |
//! | WebP | yes | no |

use crate::error::{ImgshError, Result};
use crate::imaging::Quality;
use std::fmt;
use std::path::Path;

/// Requested-format keys and the codec each maps to.
const FORMAT_KEYS: &[(&str, Codec)] = &[
    ("jpeg", Codec::Jpeg),
    ("jpg", Codec::Jpeg),
    ("png", Codec::Png),
    ("webp", Codec::WebP),
];

/// File extensions accepted as batch input, lowercase without the dot.
pub const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Jpeg,
    Png,
    WebP,
}

impl Codec {
    /// Canonical output extension, including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Jpeg => ".jpg",
            Codec::Png => ".png",
            Codec::WebP => ".webp",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Codec::Jpeg => "JPEG",
            Codec::Png => "PNG",
            Codec::WebP => "WEBP",
        }
    }

    /// Whether the encoder has a lossy quality knob.
    pub fn uses_quality(self) -> bool {
        matches!(self, Codec::Jpeg | Codec::WebP)
    }

    /// Whether an EXIF block can be carried into the encoded file.
    pub fn accepts_exif(self) -> bool {
        matches!(self, Codec::Jpeg | Codec::Png)
    }

    /// Look up a format key (`"jpg"`, `".PNG"`, ...).
    pub fn from_key(key: &str) -> Result<Self> {
        let normalized = key.trim_start_matches('.').to_ascii_lowercase();
        FORMAT_KEYS
            .iter()
            .find(|(k, _)| *k == normalized)
            .map(|(_, codec)| *codec)
            .ok_or_else(|| ImgshError::UnsupportedFormat {
                requested: normalized,
                supported: supported_format_list(),
            })
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated, sorted list of accepted format keys.
pub fn supported_format_list() -> String {
    let mut keys: Vec<&str> = FORMAT_KEYS.iter().map(|(k, _)| *k).collect();
    keys.sort_unstable();
    keys.join(", ")
}

/// A resolved output format: the codec and the extension files get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub codec: Codec,
    pub extension: &'static str,
}

impl From<Codec> for FormatSpec {
    fn from(codec: Codec) -> Self {
        Self {
            codec,
            extension: codec.extension(),
        }
    }
}

/// Resolve the output format by precedence: explicit request, then the
/// output hint's suffix, then the input's suffix.
pub fn resolve_format(
    requested: Option<&str>,
    output_hint: Option<&Path>,
    input: &Path,
) -> Result<FormatSpec> {
    let hint_suffix = output_hint.and_then(suffix);
    let key = match (requested, hint_suffix) {
        (Some(r), _) => r.to_string(),
        (None, Some(s)) => s,
        (None, None) => suffix(input).unwrap_or_default(),
    };
    Codec::from_key(&key).map(FormatSpec::from)
}

fn suffix(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

/// Encoder settings for one output file. Built by a pure mapping from the
/// codec, so fields a codec cannot use are `None`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub codec: Codec,
    pub quality: Option<Quality>,
    pub embed_exif: bool,
}

impl EncodeOptions {
    pub fn for_codec(codec: Codec, quality: Quality, preserve_exif: bool) -> Self {
        if preserve_exif && !codec.accepts_exif() {
            tracing::warn!(%codec, "EXIF not carried by this codec; it will be dropped");
        }
        Self {
            codec,
            quality: codec.uses_quality().then_some(quality),
            embed_exif: preserve_exif && codec.accepts_exif(),
        }
    }
}
