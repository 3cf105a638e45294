//! CLI output formatting for all commands.
//!
//! Every line the tool prints for a result is built here. The `format_*`
//! functions are pure and return lines; the `print_*` wrappers send them to
//! stdout (results) or stderr (failures). Diagnostics go through `tracing`
//! instead and never pass through this module.
//!
//! # Output Format
//!
//! ## resize / convert
//!
//! ```text
//! Saved image: photos/cat_imgsh.jpg
//! Saved OCR: photos/cat_imgsh.txt
//! ```
//!
//! ## batch-resize
//!
//! ```text
//! [ok] in/a.jpg -> out/a_1.jpg
//! [fail] in/b.jpg: Failed to decode in/b.jpg: ...     (stderr)
//! Batch complete. Processed: 1, Failed: 1
//! ```
//!
//! ## Errors
//!
//! ```text
//! Error: Output already exists: cat_imgsh.jpg. Use --overwrite to replace existing files.
//! ```

use crate::process::{BatchEvent, BatchReport, ProcessResult};
use std::path::Path;

/// Where a line should be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

// ============================================================================
// Single-file commands
// ============================================================================

pub fn format_saved_image(path: &Path) -> String {
    format!("Saved image: {}", path.display())
}

pub fn format_saved_ocr(path: &Path) -> String {
    format!("Saved OCR: {}", path.display())
}

/// Lines for a finished resize/convert.
pub fn format_process_result(result: &ProcessResult) -> Vec<String> {
    let mut lines = vec![format_saved_image(&result.output_path)];
    if let Some(ocr) = &result.ocr_path {
        lines.push(format_saved_ocr(ocr));
    }
    lines
}

pub fn print_process_result(result: &ProcessResult) {
    for line in format_process_result(result) {
        println!("{}", line);
    }
}

pub fn print_saved_ocr(path: &Path) {
    println!("{}", format_saved_ocr(path));
}

// ============================================================================
// Batch
// ============================================================================

/// Format one batch progress event, with the stream it belongs on.
pub fn format_batch_event(event: &BatchEvent) -> Vec<(Stream, String)> {
    match event {
        BatchEvent::Processed {
            input, output, ocr, ..
        } => {
            let mut lines = vec![(
                Stream::Stdout,
                format!("[ok] {} -> {}", input.display(), output.display()),
            )];
            if let Some(ocr) = ocr {
                lines.push((Stream::Stdout, format!("     {}", format_saved_ocr(ocr))));
            }
            lines
        }
        BatchEvent::Failed { input, message, .. } => {
            vec![(
                Stream::Stderr,
                format!("[fail] {}: {}", input.display(), message),
            )]
        }
    }
}

pub fn print_batch_event(event: &BatchEvent) {
    for (stream, line) in format_batch_event(event) {
        match stream {
            Stream::Stdout => println!("{}", line),
            Stream::Stderr => eprintln!("{}", line),
        }
    }
}

pub fn format_batch_summary(report: &BatchReport) -> String {
    format!(
        "Batch complete. Processed: {}, Failed: {}",
        report.processed, report.failed
    )
}

pub fn print_batch_summary(report: &BatchReport) {
    println!("{}", format_batch_summary(report));
}

// ============================================================================
// Errors
// ============================================================================

pub fn format_error(error: &dyn std::error::Error) -> String {
    format!("Error: {}", error)
}

pub fn print_error(error: &dyn std::error::Error) {
    eprintln!("{}", format_error(error));
}
