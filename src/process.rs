//! Resize, convert, OCR and batch orchestration.
//!
//! The [`Processor`] wires the pure resolvers to the two external
//! collaborators, an [`ImageBackend`] for pixels and an [`OcrEngine`] for
//! text. It owns no state between calls; every operation builds its own
//! request values from the job and the shared [`Config`].
//!
//! ## Single-file pipeline
//!
//! ```text
//! validate options → resolve format → resolve output path
//!   → collision check (image and sidecar) → identify (oriented)
//!   → resolve geometry → backend resize → optional OCR sidecar
//! ```
//!
//! Nothing is written until every check has passed, so a refused overwrite
//! leaves the filesystem untouched.
//!
//! ## Batch
//!
//! Options and the name pattern are validated once, before the input
//! directory is scanned. Files are then processed one at a time, in sorted
//! order; a failing file is reported and counted and the run moves on.
//! Progress is streamed as [`BatchEvent`]s over an optional channel.

use crate::config::Config;
use crate::error::{ImgshError, Result};
use crate::format::{EncodeOptions, FormatSpec, resolve_format};
use crate::imaging::{
    ConvertParams, FitMode, ImageBackend, Quality, ResizeParams, ResizeRequest, resolve_geometry,
};
use crate::naming::{NameContext, NamePattern};
use crate::ocr::{OcrEngine, OcrEngineKind, OcrFormat, OcrSidecar, write_sidecar};
use crate::paths::{
    ensure_input_dir, ensure_input_file, ensure_writable, resolve_output_path,
    resolve_sidecar_path, stem,
};
use crate::scan::collect_images;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Raw resize/encode options as given on the command line. `None` falls
/// back to the configuration.
#[derive(Debug, Clone, Default)]
pub struct ResizeOptions {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub keep_aspect: Option<bool>,
    pub fit: Option<String>,
    pub format: Option<String>,
    pub quality: Option<i64>,
    pub preserve_exif: Option<bool>,
    pub overwrite: Option<bool>,
}

/// Raw OCR options. Present on a job only when OCR was asked for.
#[derive(Debug, Clone, Default)]
pub struct OcrOptions {
    pub engine: Option<String>,
    pub format: Option<String>,
    pub lang: Option<String>,
    /// Sidecar file or directory.
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ResizeJob {
    pub input: PathBuf,
    pub out: Option<PathBuf>,
    pub options: ResizeOptions,
    pub ocr: Option<OcrOptions>,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub out: Option<PathBuf>,
    /// Target format key. Required: conversion has no implicit format.
    pub format: Option<String>,
    pub quality: Option<i64>,
    pub preserve_exif: Option<bool>,
    pub overwrite: Option<bool>,
    pub ocr: Option<OcrOptions>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractTextJob {
    pub input: PathBuf,
    pub ocr: OcrOptions,
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub out: Option<PathBuf>,
    pub recursive: bool,
    pub name_pattern: Option<String>,
    pub options: ResizeOptions,
    pub ocr: Option<OcrOptions>,
}

/// Files written by a single-image operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub output_path: PathBuf,
    pub ocr_path: Option<PathBuf>,
}

/// Progress events emitted during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Processed {
        index: usize,
        input: PathBuf,
        output: PathBuf,
        ocr: Option<PathBuf>,
    },
    Failed {
        index: usize,
        input: PathBuf,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Options after merging with configuration and validating.
#[derive(Debug, Clone, Copy)]
struct ResizeSettings {
    request: ResizeRequest,
    quality: Quality,
    preserve_exif: bool,
    overwrite: bool,
}

#[derive(Debug, Clone)]
struct OcrSettings {
    engine: OcrEngineKind,
    format: OcrFormat,
    lang: String,
    out: Option<PathBuf>,
}

/// Runs image operations against a backend and an OCR engine.
pub struct Processor<'a, B: ImageBackend, O: OcrEngine> {
    config: &'a Config,
    backend: &'a B,
    ocr: &'a O,
}

impl<'a, B: ImageBackend, O: OcrEngine> Processor<'a, B, O> {
    pub fn new(config: &'a Config, backend: &'a B, ocr: &'a O) -> Self {
        Self {
            config,
            backend,
            ocr,
        }
    }

    /// Resize one image.
    pub fn resize(&self, job: &ResizeJob) -> Result<ProcessResult> {
        ensure_input_file(&job.input)?;
        let settings = self.resize_settings(&job.options)?;
        let ocr = self.ocr_settings(job.ocr.as_ref())?;
        let format = resolve_format(job.options.format.as_deref(), job.out.as_deref(), &job.input)?;
        let output = resolve_output_path(
            &job.input,
            job.out.as_deref(),
            format.extension,
            &self.config.naming.resize_suffix,
        );
        self.resize_to(&job.input, &output, format, &settings, ocr.as_ref())
    }

    /// Re-encode one image in another format, without resampling.
    pub fn convert(&self, job: &ConvertJob) -> Result<ProcessResult> {
        ensure_input_file(&job.input)?;
        let requested = job.format.as_deref().ok_or(ImgshError::FormatRequired)?;
        let quality = self.quality(job.quality)?;
        let preserve_exif = job.preserve_exif.unwrap_or(self.config.defaults.preserve_exif);
        let overwrite = job.overwrite.unwrap_or(self.config.defaults.overwrite);
        let ocr = self.ocr_settings(job.ocr.as_ref())?;
        let format = resolve_format(Some(requested), job.out.as_deref(), &job.input)?;
        let output = resolve_output_path(
            &job.input,
            job.out.as_deref(),
            format.extension,
            &self.config.naming.convert_suffix,
        );

        ensure_writable(&output, overwrite)?;
        let sidecar = ocr.as_ref().map(|o| sidecar_for(&output, o));
        if let Some(path) = &sidecar {
            ensure_writable(path, overwrite)?;
        }

        self.backend.convert(&ConvertParams {
            source: job.input.clone(),
            output: output.clone(),
            encode: EncodeOptions::for_codec(format.codec, quality, preserve_exif),
        })?;
        tracing::info!(input = %job.input.display(), output = %output.display(), "converted");

        let ocr_path = match (ocr, sidecar) {
            (Some(settings), Some(path)) => Some(self.run_ocr(&output, &path, &settings)?),
            _ => None,
        };
        Ok(ProcessResult {
            output_path: output,
            ocr_path,
        })
    }

    /// Extract text from an image into a sidecar file.
    pub fn extract_text(&self, job: &ExtractTextJob) -> Result<PathBuf> {
        ensure_input_file(&job.input)?;
        let settings = self.resolve_ocr(&job.ocr)?;
        let overwrite = job.overwrite.unwrap_or(self.config.defaults.overwrite);
        let sidecar = sidecar_for(&job.input, &settings);
        ensure_writable(&sidecar, overwrite)?;
        self.run_ocr(&job.input, &sidecar, &settings)
    }

    /// Resize every supported image under a directory.
    ///
    /// Returns `Err` only for problems that stop the run before any file is
    /// processed. Per-file failures are reported through `events` and counted
    /// in the [`BatchReport`].
    pub fn batch_resize(
        &self,
        job: &BatchJob,
        events: Option<Sender<BatchEvent>>,
    ) -> Result<BatchReport> {
        ensure_input_dir(&job.input_dir)?;
        let settings = self.resize_settings(&job.options)?;
        // Sidecars always sit next to their image in batch mode
        let ocr = self.ocr_settings(job.ocr.as_ref())?.map(|o| OcrSettings { out: None, ..o });
        let pattern = NamePattern::parse(
            job.name_pattern
                .as_deref()
                .unwrap_or(&self.config.naming.batch_pattern),
        )?;

        let files = collect_images(&job.input_dir, job.recursive)?;
        if files.is_empty() {
            return Err(ImgshError::NoImagesFound);
        }

        let mut report = BatchReport::default();
        for (i, input) in files.iter().enumerate() {
            let index = i + 1;
            let event = match self.batch_one(job, &pattern, &settings, ocr.as_ref(), input, index) {
                Ok(result) => {
                    report.processed += 1;
                    BatchEvent::Processed {
                        index,
                        input: input.clone(),
                        output: result.output_path,
                        ocr: result.ocr_path,
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(input = %input.display(), error = %e, "batch item failed");
                    BatchEvent::Failed {
                        index,
                        input: input.clone(),
                        message: e.to_string(),
                    }
                }
            };
            if let Some(tx) = &events {
                tx.send(event).ok();
            }
        }

        tracing::info!(processed = report.processed, failed = report.failed, "batch finished");
        Ok(report)
    }

    fn batch_one(
        &self,
        job: &BatchJob,
        pattern: &NamePattern,
        settings: &ResizeSettings,
        ocr: Option<&OcrSettings>,
        input: &Path,
        index: usize,
    ) -> Result<ProcessResult> {
        let format = resolve_format(job.options.format.as_deref(), None, input)?;
        let stem = stem(input);
        let name = pattern.render(&NameContext {
            stem: &stem,
            extension: format.extension,
            width: settings.request.width,
            height: settings.request.height,
            index,
        });

        let parent = input.parent().unwrap_or(Path::new(""));
        let target_dir = match &job.out {
            Some(out) if job.recursive => match parent.strip_prefix(&job.input_dir) {
                Ok(relative) => out.join(relative),
                Err(_) => out.clone(),
            },
            Some(out) => out.clone(),
            None => parent.to_path_buf(),
        };
        let output = target_dir.join(format!("{name}{}", format.extension));

        self.resize_to(input, &output, format, settings, ocr)
    }

    /// Shared tail of `resize` and batch items: the output path is final.
    fn resize_to(
        &self,
        input: &Path,
        output: &Path,
        format: FormatSpec,
        settings: &ResizeSettings,
        ocr: Option<&OcrSettings>,
    ) -> Result<ProcessResult> {
        ensure_writable(output, settings.overwrite)?;
        let sidecar = ocr.map(|o| sidecar_for(output, o));
        if let Some(path) = &sidecar {
            ensure_writable(path, settings.overwrite)?;
        }

        let source = self.backend.identify(input)?;
        let plan = resolve_geometry(source, &settings.request)?;
        self.backend.resize(&ResizeParams {
            source: input.to_path_buf(),
            output: output.to_path_buf(),
            plan,
            encode: EncodeOptions::for_codec(format.codec, settings.quality, settings.preserve_exif),
        })?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            %source,
            target = %plan.target,
            "resized"
        );

        let ocr_path = match (ocr, sidecar) {
            (Some(ocr), Some(path)) => Some(self.run_ocr(output, &path, ocr)?),
            _ => None,
        };
        Ok(ProcessResult {
            output_path: output.to_path_buf(),
            ocr_path,
        })
    }

    fn run_ocr(&self, image: &Path, sidecar: &Path, settings: &OcrSettings) -> Result<PathBuf> {
        let text = self.ocr.extract(image, &settings.lang)?;
        write_sidecar(
            sidecar,
            settings.format,
            &OcrSidecar {
                engine: settings.engine.as_str().to_string(),
                source_file: image.display().to_string(),
                language: settings.lang.clone(),
                text,
            },
        )?;
        tracing::info!(image = %image.display(), sidecar = %sidecar.display(), "OCR written");
        Ok(sidecar.to_path_buf())
    }

    fn quality(&self, raw: Option<i64>) -> Result<Quality> {
        Quality::new(raw.unwrap_or(i64::from(self.config.defaults.quality)))
    }

    fn resize_settings(&self, options: &ResizeOptions) -> Result<ResizeSettings> {
        let defaults = &self.config.defaults;
        let fit = match &options.fit {
            Some(raw) => raw.parse::<FitMode>()?,
            None => defaults.fit,
        };
        let request = ResizeRequest::from_raw(
            options.width,
            options.height,
            options.keep_aspect.unwrap_or(defaults.keep_aspect),
            fit,
        )?;
        request.validate()?;
        Ok(ResizeSettings {
            request,
            quality: self.quality(options.quality)?,
            preserve_exif: options.preserve_exif.unwrap_or(defaults.preserve_exif),
            overwrite: options.overwrite.unwrap_or(defaults.overwrite),
        })
    }

    fn ocr_settings(&self, options: Option<&OcrOptions>) -> Result<Option<OcrSettings>> {
        options.map(|o| self.resolve_ocr(o)).transpose()
    }

    fn resolve_ocr(&self, options: &OcrOptions) -> Result<OcrSettings> {
        let defaults = &self.config.ocr;
        Ok(OcrSettings {
            engine: match &options.engine {
                Some(raw) => raw.parse()?,
                None => defaults.engine,
            },
            format: match &options.format {
                Some(raw) => raw.parse()?,
                None => defaults.format,
            },
            lang: options.lang.clone().unwrap_or_else(|| defaults.lang.clone()),
            out: options.out.clone(),
        })
    }
}

fn sidecar_for(image: &Path, settings: &OcrSettings) -> PathBuf {
    resolve_sidecar_path(image, settings.out.as_deref(), settings.format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Codec;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::ocr::tests::MockOcr;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not really an image").unwrap();
    }

    fn resize_ops(backend: &MockBackend) -> Vec<RecordedOp> {
        backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Resize { .. }))
            .collect()
    }

    fn width(w: i64) -> ResizeOptions {
        ResizeOptions {
            width: Some(w),
            ..ResizeOptions::default()
        }
    }

    // =========================================================================
    // resize
    // =========================================================================

    #[test]
    fn resize_default_output_is_suffixed_sibling() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(1000, 500);
        let ocr = MockOcr::default();

        let result = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input: input.clone(),
                options: width(400),
                ..ResizeJob::default()
            })
            .unwrap();

        assert_eq!(result.output_path, tmp.path().join("cat_imgsh.png"));
        assert_eq!(result.ocr_path, None);
        let ops = resize_ops(&backend);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize { width: 400, height: 200, codec: Codec::Png, quality: None, .. }
        ));
    }

    #[test]
    fn resize_format_wins_over_out_suffix() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("photo.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let result = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input,
                out: Some(tmp.path().join("result.jpg")),
                options: ResizeOptions {
                    format: Some("webp".into()),
                    quality: Some(70),
                    ..width(50)
                },
                ..ResizeJob::default()
            })
            .unwrap();

        assert_eq!(result.output_path, tmp.path().join("result.webp"));
        assert!(matches!(
            &resize_ops(&backend)[0],
            RecordedOp::Resize { codec: Codec::WebP, quality: Some(70), .. }
        ));
    }

    #[test]
    fn resize_refuses_existing_output_and_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.jpg");
        touch(&input);
        let existing = tmp.path().join("cat_imgsh.jpg");
        fs::write(&existing, b"keep me").unwrap();
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input,
                options: width(50),
                ..ResizeJob::default()
            })
            .unwrap_err();

        assert!(matches!(err, ImgshError::OutputExists(ref p) if *p == existing));
        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read(&existing).unwrap(), b"keep me");
    }

    #[test]
    fn resize_overwrite_from_config() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.jpg");
        touch(&input);
        touch(&tmp.path().join("cat_imgsh.jpg"));
        let mut config = Config::default();
        config.defaults.overwrite = true;
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let result = Processor::new(&config, &backend, &ocr).resize(&ResizeJob {
            input,
            options: width(50),
            ..ResizeJob::default()
        });
        assert!(result.is_ok());
    }

    #[test]
    fn resize_cover_with_one_edge_fails_before_backend() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.jpg");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input,
                options: ResizeOptions {
                    fit: Some("cover".into()),
                    ..width(50)
                },
                ..ResizeJob::default()
            })
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Fit mode 'cover' requires both --width and --height."
        );
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn resize_rejects_quality_out_of_range() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.jpg");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();
        let processor = Processor::new(&config, &backend, &ocr);

        for bad in [0, 101] {
            let err = processor
                .resize(&ResizeJob {
                    input: input.clone(),
                    options: ResizeOptions {
                        quality: Some(bad),
                        ..width(10)
                    },
                    ..ResizeJob::default()
                })
                .unwrap_err();
            assert!(matches!(err, ImgshError::QualityOutOfRange(q) if q == bad));
        }
    }

    #[test]
    fn resize_missing_input() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input: tmp.path().join("ghost.jpg"),
                options: width(10),
                ..ResizeJob::default()
            })
            .unwrap_err();
        assert!(matches!(err, ImgshError::FileNotFound(_)));
    }

    #[test]
    fn resize_with_ocr_writes_sidecar_next_to_output() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("scan.jpg");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::returning("INVOICE 42");

        let result = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input,
                options: width(50),
                ocr: Some(OcrOptions::default()),
                ..ResizeJob::default()
            })
            .unwrap();

        let sidecar = tmp.path().join("scan_imgsh.txt");
        assert_eq!(result.ocr_path, Some(sidecar.clone()));
        assert_eq!(fs::read_to_string(&sidecar).unwrap(), "INVOICE 42");
        // OCR reads the written output, not the source
        let calls = ocr.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.ends_with("scan_imgsh.jpg"));
        assert_eq!(calls[0].1, "en");
    }

    #[test]
    fn resize_refuses_existing_sidecar_before_writing_image() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("scan.jpg");
        touch(&input);
        touch(&tmp.path().join("scan_imgsh.txt"));
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::returning("text");

        let err = Processor::new(&config, &backend, &ocr)
            .resize(&ResizeJob {
                input,
                options: width(50),
                ocr: Some(OcrOptions::default()),
                ..ResizeJob::default()
            })
            .unwrap_err();

        assert!(matches!(err, ImgshError::OutputExists(_)));
        assert!(backend.get_operations().is_empty());
        assert!(ocr.get_calls().is_empty());
    }

    // =========================================================================
    // convert
    // =========================================================================

    #[test]
    fn convert_uses_converted_suffix_and_canonical_extension() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::default();

        let result = Processor::new(&config, &backend, &ocr)
            .convert(&ConvertJob {
                input,
                format: Some("JPEG".into()),
                ..ConvertJob::default()
            })
            .unwrap();

        assert_eq!(result.output_path, tmp.path().join("cat_converted.jpg"));
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Convert { codec: Codec::Jpeg, embed_exif: true, .. }
        ));
    }

    #[test]
    fn convert_into_directory_hint() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.png");
        touch(&input);
        let exports = tmp.path().join("exports");
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::default();

        let result = Processor::new(&config, &backend, &ocr)
            .convert(&ConvertJob {
                input,
                out: Some(exports.clone()),
                format: Some("webp".into()),
                preserve_exif: Some(false),
                ..ConvertJob::default()
            })
            .unwrap();

        assert_eq!(result.output_path, exports.join("cat.webp"));
    }

    #[test]
    fn convert_rejects_unknown_format() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("cat.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .convert(&ConvertJob {
                input,
                format: Some("gif".into()),
                ..ConvertJob::default()
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported format 'gif'. Supported formats: jpeg, jpg, png, webp"
        );
    }

    // =========================================================================
    // extract_text
    // =========================================================================

    #[test]
    fn extract_text_json_sidecar() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("receipt.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::returning("TOTAL 9.99");

        let sidecar = Processor::new(&config, &backend, &ocr)
            .extract_text(&ExtractTextJob {
                input: input.clone(),
                ocr: OcrOptions {
                    format: Some("json".into()),
                    lang: Some("de".into()),
                    ..OcrOptions::default()
                },
                ..ExtractTextJob::default()
            })
            .unwrap();

        assert_eq!(sidecar, tmp.path().join("receipt.json"));
        let body: OcrSidecar = serde_json::from_str(&fs::read_to_string(&sidecar).unwrap()).unwrap();
        assert_eq!(body.engine, "textract");
        assert_eq!(body.language, "de");
        assert_eq!(body.text, "TOTAL 9.99");
        assert_eq!(body.source_file, input.display().to_string());
    }

    #[test]
    fn extract_text_rejects_unknown_engine_before_running() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("receipt.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::returning("x");

        let err = Processor::new(&config, &backend, &ocr)
            .extract_text(&ExtractTextJob {
                input,
                ocr: OcrOptions {
                    engine: Some("easyocr".into()),
                    ..OcrOptions::default()
                },
                ..ExtractTextJob::default()
            })
            .unwrap_err();
        assert!(matches!(err, ImgshError::UnsupportedOcrEngine(_)));
        assert!(ocr.get_calls().is_empty());
    }

    #[test]
    fn extract_text_refuses_existing_sidecar_before_running() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("receipt.png");
        touch(&input);
        touch(&tmp.path().join("receipt.txt"));
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::returning("x");

        let err = Processor::new(&config, &backend, &ocr)
            .extract_text(&ExtractTextJob {
                input,
                ..ExtractTextJob::default()
            })
            .unwrap_err();
        assert!(matches!(err, ImgshError::OutputExists(_)));
        assert!(ocr.get_calls().is_empty());
    }

    #[test]
    fn extract_text_propagates_engine_failure() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("receipt.png");
        touch(&input);
        let config = Config::default();
        let backend = MockBackend::new();
        let ocr = MockOcr::failing();

        let err = Processor::new(&config, &backend, &ocr)
            .extract_text(&ExtractTextJob {
                input,
                ..ExtractTextJob::default()
            })
            .unwrap_err();
        assert!(matches!(err, ImgshError::OcrFailed { .. }));
        assert!(!tmp.path().join("receipt.txt").exists());
    }

    // =========================================================================
    // batch_resize
    // =========================================================================

    fn batch_dir(names: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in names {
            touch(&tmp.path().join("in").join(name));
        }
        tmp
    }

    fn collect(rx: std::sync::mpsc::Receiver<BatchEvent>) -> Vec<BatchEvent> {
        rx.into_iter().collect()
    }

    #[test]
    fn batch_index_pattern_follows_sorted_order() {
        let tmp = batch_dir(&["c.jpg", "a.jpg", "b.jpg", "notes.txt"]);
        let out = tmp.path().join("out");
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();
        let (tx, rx) = std::sync::mpsc::channel();

        let report = Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    out: Some(out.clone()),
                    name_pattern: Some("{stem}_{index}".into()),
                    options: width(50),
                    ..BatchJob::default()
                },
                Some(tx),
            )
            .unwrap();

        assert_eq!(report, BatchReport { processed: 3, failed: 0 });
        let outputs: Vec<PathBuf> = collect(rx)
            .into_iter()
            .map(|e| match e {
                BatchEvent::Processed { output, .. } => output,
                BatchEvent::Failed { message, .. } => panic!("unexpected failure: {message}"),
            })
            .collect();
        assert_eq!(
            outputs,
            vec![out.join("a_1.jpg"), out.join("b_2.jpg"), out.join("c_3.jpg")]
        );
    }

    #[test]
    fn batch_unknown_placeholder_fails_before_any_file() {
        let tmp = batch_dir(&["a.jpg", "b.jpg"]);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    name_pattern: Some("{stem}_{unknown}".into()),
                    options: width(50),
                    ..BatchJob::default()
                },
                None,
            )
            .unwrap_err();

        assert!(matches!(err, ImgshError::InvalidPlaceholder(ref p) if p == "unknown"));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn batch_missing_dimensions_fails_upfront() {
        let tmp = batch_dir(&["a.jpg"]);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    ..BatchJob::default()
                },
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ImgshError::MissingDimensions));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn batch_continues_after_failure() {
        let tmp = batch_dir(&["a.jpg", "broken.jpg", "c.png"]);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100).failing_on("broken");
        let ocr = MockOcr::default();
        let (tx, rx) = std::sync::mpsc::channel();

        let report = Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    options: width(50),
                    ..BatchJob::default()
                },
                Some(tx),
            )
            .unwrap();

        assert_eq!(report, BatchReport { processed: 2, failed: 1 });
        assert!(!report.is_success());
        let events = collect(rx);
        assert!(matches!(&events[1], BatchEvent::Failed { index: 2, .. }));
        assert!(matches!(
            &events[2],
            BatchEvent::Processed { index: 3, output, .. }
                if *output == tmp.path().join("in").join("c_imgsh.png")
        ));
    }

    #[test]
    fn batch_recursive_mirrors_subdirectories() {
        let tmp = batch_dir(&["top.jpg", "nested/deep.jpg"]);
        let out = tmp.path().join("out");
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();
        let (tx, rx) = std::sync::mpsc::channel();

        Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    out: Some(out.clone()),
                    recursive: true,
                    name_pattern: Some("{stem}_{width}x{height}".into()),
                    options: width(50),
                    ..BatchJob::default()
                },
                Some(tx),
            )
            .unwrap();

        let outputs: Vec<PathBuf> = collect(rx)
            .into_iter()
            .filter_map(|e| match e {
                BatchEvent::Processed { output, .. } => Some(output),
                BatchEvent::Failed { .. } => None,
            })
            .collect();
        assert_eq!(
            outputs,
            vec![out.join("nested").join("deep_50xauto.jpg"), out.join("top_50xauto.jpg")]
        );
    }

    #[test]
    fn batch_empty_directory_is_error() {
        let tmp = batch_dir(&["readme.md"]);
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::default();

        let err = Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    options: width(50),
                    ..BatchJob::default()
                },
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ImgshError::NoImagesFound));
    }

    #[test]
    fn batch_ocr_sidecars_follow_outputs() {
        let tmp = batch_dir(&["a.jpg"]);
        let out = tmp.path().join("out");
        let config = Config::default();
        let backend = MockBackend::with_dimensions(100, 100);
        let ocr = MockOcr::returning("hello");

        Processor::new(&config, &backend, &ocr)
            .batch_resize(
                &BatchJob {
                    input_dir: tmp.path().join("in"),
                    out: Some(out.clone()),
                    options: width(50),
                    ocr: Some(OcrOptions {
                        out: Some(tmp.path().join("ignored")),
                        ..OcrOptions::default()
                    }),
                    ..BatchJob::default()
                },
                None,
            )
            .unwrap();

        assert_eq!(fs::read_to_string(out.join("a_imgsh.txt")).unwrap(), "hello");
    }
}
