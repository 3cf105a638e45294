use clap::{Args, Parser, Subcommand};
use imgsh::config::{self, Config};
use imgsh::imaging::RustBackend;
use imgsh::ocr::TextractEngine;
use imgsh::output;
use imgsh::process::{
    BatchJob, ConvertJob, ExtractTextJob, OcrOptions, Processor, ResizeJob, ResizeOptions,
};
use imgsh::{ImgshError, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imgsh")]
#[command(about = "Privacy-first local image resizing, conversion and OCR")]
#[command(long_about = "\
Privacy-first local image resizing, conversion and OCR

Everything runs on this machine: images are decoded, resized and encoded by
built-in codecs, and OCR uses a locally installed Tesseract.

Output naming (when --out is not given):

  resize        photo.jpg  →  photo_imgsh.jpg
  convert       photo.png  →  photo_converted.webp
  batch-resize  in/a.jpg   →  in/a_imgsh.jpg   (see --name-pattern)
  extract-text  scan.png   →  scan.txt

--out may name a file (its suffix is replaced by the output format's) or a
directory (an existing one, or a path without a suffix, created on write).
Existing files are never replaced unless --overwrite is given.

Run 'imgsh gen-config' to print a documented configuration file.")]
#[command(version)]
struct Cli {
    /// Configuration file with default values (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize a single image
    Resize {
        input: PathBuf,
        /// Output file or directory
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        resize: ResizeArgs,
        #[command(flatten)]
        encode: EncodeArgs,
        #[command(flatten)]
        ocr: OcrArgs,
    },
    /// Resize every image in a directory
    BatchResize {
        input_dir: PathBuf,
        /// Output directory (default: next to each input)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Include images in subdirectories
        #[arg(long, overrides_with = "no_recursive")]
        recursive: bool,
        #[arg(long, overrides_with = "recursive", hide = true)]
        no_recursive: bool,
        /// Output name template; placeholders: {stem} {ext} {width} {height} {index}
        #[arg(long, value_name = "PATTERN")]
        name_pattern: Option<String>,
        #[command(flatten)]
        resize: ResizeArgs,
        #[command(flatten)]
        encode: EncodeArgs,
        #[command(flatten)]
        ocr: OcrArgs,
    },
    /// Re-encode an image in another format
    Convert {
        input: PathBuf,
        /// Output file or directory
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        encode: EncodeArgs,
        #[command(flatten)]
        ocr: OcrArgs,
    },
    /// Extract text from an image into a .txt or .json sidecar
    ExtractText {
        input: PathBuf,
        #[command(flatten)]
        engine: OcrEngineArgs,
        #[command(flatten)]
        overwrite: OverwriteArgs,
    },
    /// Open the desktop interface (not included in this build)
    Gui,
    /// Print a stock configuration file with all options documented
    GenConfig,
}

#[derive(Args)]
struct ResizeArgs {
    /// Target width in pixels
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,
    /// Target height in pixels
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,
    /// contain | cover | exact
    #[arg(long)]
    fit: Option<String>,
    /// Derive a missing edge from the source aspect ratio
    #[arg(long, overrides_with = "no_keep_aspect")]
    keep_aspect: bool,
    #[arg(long, overrides_with = "keep_aspect")]
    no_keep_aspect: bool,
}

#[derive(Args)]
struct EncodeArgs {
    /// Output format: jpg | jpeg | png | webp
    #[arg(long)]
    format: Option<String>,
    /// JPEG/WebP quality, 1-100
    #[arg(long, allow_negative_numbers = true)]
    quality: Option<i64>,
    /// Carry EXIF metadata into JPEG and PNG outputs
    #[arg(long, overrides_with = "strip_exif")]
    preserve_exif: bool,
    /// Drop all EXIF metadata
    #[arg(long, overrides_with = "preserve_exif")]
    strip_exif: bool,
    #[command(flatten)]
    overwrite: OverwriteArgs,
}

#[derive(Args)]
struct OverwriteArgs {
    /// Replace existing output files
    #[arg(long, overrides_with = "no_overwrite")]
    overwrite: bool,
    #[arg(long, overrides_with = "overwrite")]
    no_overwrite: bool,
}

#[derive(Args)]
struct OcrArgs {
    /// Also extract text from the written image
    #[arg(long)]
    ocr: bool,
    #[command(flatten)]
    engine: OcrEngineArgs,
}

#[derive(Args)]
struct OcrEngineArgs {
    /// OCR engine: textract
    #[arg(long)]
    engine: Option<String>,
    /// OCR sidecar file or directory
    #[arg(long)]
    ocr_out: Option<PathBuf>,
    /// Sidecar format: txt | json
    #[arg(long)]
    ocr_format: Option<String>,
    /// Language hint for OCR
    #[arg(long)]
    lang: Option<String>,
}

/// Resolve a `--flag` / `--no-flag` pair. clap's `overrides_with` leaves at
/// most one set (the last one given); neither set means "use config".
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl OverwriteArgs {
    fn resolve(&self) -> Option<bool> {
        toggle(self.overwrite, self.no_overwrite)
    }
}

impl OcrEngineArgs {
    fn into_options(self) -> OcrOptions {
        OcrOptions {
            engine: self.engine,
            format: self.ocr_format,
            lang: self.lang,
            out: self.ocr_out,
        }
    }
}

impl OcrArgs {
    fn into_options(self) -> Option<OcrOptions> {
        self.ocr.then(|| self.engine.into_options())
    }
}

fn resize_options(resize: ResizeArgs, encode: EncodeArgs) -> ResizeOptions {
    ResizeOptions {
        width: resize.width,
        height: resize.height,
        keep_aspect: toggle(resize.keep_aspect, resize.no_keep_aspect),
        fit: resize.fit,
        format: encode.format,
        quality: encode.quality,
        preserve_exif: toggle(encode.preserve_exif, encode.strip_exif),
        overwrite: encode.overwrite.resolve(),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "imgsh=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let app_config: Config = config::load_config(cli.config.as_deref())?;
    let backend = RustBackend::new();
    let engine = TextractEngine::new();
    let processor = Processor::new(&app_config, &backend, &engine);

    match cli.command {
        Command::Resize {
            input,
            out,
            resize,
            encode,
            ocr,
        } => {
            let result = processor.resize(&ResizeJob {
                input,
                out,
                options: resize_options(resize, encode),
                ocr: ocr.into_options(),
            })?;
            output::print_process_result(&result);
        }
        Command::BatchResize {
            input_dir,
            out,
            recursive,
            no_recursive: _,
            name_pattern,
            resize,
            encode,
            ocr,
        } => {
            let job = BatchJob {
                input_dir,
                out,
                recursive,
                name_pattern,
                options: resize_options(resize, encode),
                ocr: ocr.into_options(),
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_batch_event(&event);
                }
            });
            let result = processor.batch_resize(&job, Some(tx));
            // The sender is dropped with the call, so the printer drains and exits
            printer.join().ok();
            let report = result?;
            output::print_batch_summary(&report);
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Convert { input, out, encode, ocr } => {
            let result = processor.convert(&ConvertJob {
                input,
                out,
                format: encode.format,
                quality: encode.quality,
                preserve_exif: toggle(encode.preserve_exif, encode.strip_exif),
                overwrite: encode.overwrite.resolve(),
                ocr: ocr.into_options(),
            })?;
            output::print_process_result(&result);
        }
        Command::ExtractText {
            input,
            engine,
            overwrite,
        } => {
            let sidecar = processor.extract_text(&ExtractTextJob {
                input,
                ocr: engine.into_options(),
                overwrite: overwrite.resolve(),
            })?;
            output::print_saved_ocr(&sidecar);
        }
        Command::Gui => return Err(ImgshError::GuiUnavailable),
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(ExitCode::SUCCESS)
}
