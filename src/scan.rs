//! Input discovery for batch mode.
//!
//! Lists supported image files under a directory, optionally recursing, and
//! returns them sorted by path. The order is what `{index}` numbers, so it
//! must be stable across runs.

use crate::error::Result;
use crate::format::INPUT_EXTENSIONS;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether `path` has a supported image extension (case-insensitive).
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            INPUT_EXTENSIONS
                .iter()
                .any(|supported| e.eq_ignore_ascii_case(supported))
        })
}

/// Collect image files under `root`, sorted by path.
///
/// Without `recursive` only direct children are listed. Unreadable entries
/// abort the scan rather than being skipped.
pub fn collect_images(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), recursive, count = files.len(), "scanned inputs");
    Ok(files)
}
