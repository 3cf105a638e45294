//! Output path resolution.
//!
//! Resolution is pure: it looks at the filesystem (to tell an existing
//! directory from a file) but never creates or writes anything. Directories
//! are created later, by the backend, at write time.
//!
//! ## Rules, in order
//!
//! ```text
//! no --out                      → <input dir>/<stem><suffix><ext>
//! --out is an existing dir      → <out>/<stem><ext>
//! --out has no suffix           → <out>/<stem><ext>      (dir created on write)
//! otherwise                     → <out> with its suffix replaced by <ext>
//! ```
//!
//! Input `cat.png`, convert, no `--out` → `cat_converted.png`.
//! Input `cat.png`, `--out exports`, webp → `exports/cat.webp`.

use crate::error::{ImgshError, Result};
use std::path::{Path, PathBuf};

/// File stem of `path`, or an empty string if it has none.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Heuristic: a hint that exists as a directory, or has no suffix, names a
/// directory to place outputs in.
fn is_directory_like(hint: &Path) -> bool {
    hint.is_dir() || hint.extension().is_none()
}

/// Replace (or add) the suffix of `path` with `extension` (leading dot
/// optional).
fn with_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension.trim_start_matches('.'))
}

/// Resolve the concrete output file for a single-image operation.
///
/// `extension` includes its leading dot (`.jpg`). `default_suffix` is only
/// used when there is no hint (`_imgsh`, `_converted`).
pub fn resolve_output_path(
    input: &Path,
    output_hint: Option<&Path>,
    extension: &str,
    default_suffix: &str,
) -> PathBuf {
    let stem = stem(input);
    match output_hint {
        None => input.with_file_name(format!("{stem}{default_suffix}{extension}")),
        Some(hint) if is_directory_like(hint) => hint.join(format!("{stem}{extension}")),
        Some(hint) => with_extension(hint, extension),
    }
}

/// Resolve where an OCR sidecar for `image` goes.
///
/// Same directory heuristic as images; without a hint the sidecar sits next
/// to the image with the format's suffix (`cat.jpg` → `cat.txt`).
pub fn resolve_sidecar_path(image: &Path, output_hint: Option<&Path>, format_ext: &str) -> PathBuf {
    match output_hint {
        Some(hint) if is_directory_like(hint) => {
            hint.join(format!("{}.{format_ext}", stem(image)))
        }
        Some(hint) => with_extension(hint, format_ext),
        None => with_extension(image, format_ext),
    }
}

/// Fail with [`ImgshError::OutputExists`] if `path` exists and overwriting
/// is not allowed. Called once, right before the write.
pub fn ensure_writable(path: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && path.exists() {
        return Err(ImgshError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

pub fn ensure_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ImgshError::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ImgshError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

pub fn ensure_input_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ImgshError::DirectoryNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ImgshError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}
