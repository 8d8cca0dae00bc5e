//! Batch driver: enumerate files, stamp each one, isolate failures.
//!
//! The driver is a fold over per-file [`Outcome`]s: each file resolves to
//! `Processed`, `Skipped`, or `Errored`, and [`ProcessingStats`] accumulates
//! the outcome stream. Accounting is therefore testable without any real
//! pixel work — [`run_with`] accepts any [`Stamper`], and the production
//! [`run`] plugs in the real [`Compositor`].
//!
//! ## Failure isolation
//!
//! A fatal error (missing input, unreadable directory) aborts before or at
//! enumeration. Everything after that point is per-file: decode, compose,
//! and write failures increment the error counter and the run moves on;
//! unsupported extensions increment the skip counter and are never opened.
//!
//! ## Enumeration
//!
//! Directory mode looks at direct children only — subdirectories are not
//! descended into — in whatever order the filesystem yields them. Order is
//! not part of the contract; only the aggregate counts are.

use crate::config::WatermarkConfig;
use crate::date;
use crate::output;
use crate::render::{Compositor, Stamper};
use image::ImageFormat;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input path does not exist or is not readable: {0}")]
    MissingInput(PathBuf),
    #[error("Input is neither a file nor a directory: {0}")]
    InvalidInput(PathBuf),
}

/// Extensions accepted for input, lowercase. Matching is case-insensitive.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "bmp", "gif"];

/// Suffix appended to the input directory (or the file's parent) to form
/// the output directory name.
const OUTPUT_DIR_SUFFIX: &str = "_watermark";

/// Suffix inserted before the extension of every output file.
const OUTPUT_FILE_SUFFIX: &str = "_watermarked";

/// Whether `path` has a supported image extension.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
}

/// Encoding format for the output, chosen from the *original* file's
/// extension. Unrecognized and missing extensions fall back to JPEG.
pub fn output_format(source: &Path) -> ImageFormat {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => ImageFormat::Png,
        "gif" => ImageFormat::Gif,
        "bmp" => ImageFormat::Bmp,
        "tiff" | "tif" => ImageFormat::Tiff,
        _ => ImageFormat::Jpeg,
    }
}

/// Output path for `source`: `<stem>_watermarked<ext>` inside `output_dir`,
/// preserving the original extension byte-for-byte (case included). Names
/// with no extension get `.jpg`.
pub fn output_file(source: &Path, output_dir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    // A dot at index 0 is a hidden file, not an extension separator.
    let (stem, ext) = match name.rfind('.').filter(|&i| i > 0) {
        Some(i) => (&name[..i], &name[i..]),
        None => (name.as_str(), ".jpg"),
    };
    output_dir.join(format!("{stem}{OUTPUT_FILE_SUFFIX}{ext}"))
}

/// `<dirName>_watermark` alongside the contents of `dir`.
fn watermark_dir(dir: &Path) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{name}{OUTPUT_DIR_SUFFIX}"))
}

/// The per-file pipeline stage that failed, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Compose,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Compose => "compose",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Result of attempting one file.
#[derive(Debug)]
pub enum Outcome {
    Processed { output: PathBuf, date: String },
    Skipped,
    Errored { stage: Stage, message: String },
}

/// Counters accumulated from the outcome stream. Mutated only by the
/// driver's fold; read-only to everyone else.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    processed: u32,
    skipped: u32,
    errored: u32,
}

impl ProcessingStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Processed { .. } => self.processed += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Errored { .. } => self.errored += 1,
        }
    }

    pub fn processed(&self) -> u32 {
        self.processed
    }

    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    pub fn errored(&self) -> u32 {
        self.errored
    }

    pub fn total(&self) -> u32 {
        self.processed + self.skipped + self.errored
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One unit of work: a source file and where its stamped copy goes.
/// Created per discovered file and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub output_dir: PathBuf,
}

/// Result of a whole run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The directory contained no supported image files; nothing attempted.
    NoWork,
    /// Files were attempted; counts in the stats.
    Completed(ProcessingStats),
}

impl RunOutcome {
    /// A run succeeds when at least one file processed. Per-file failures
    /// never turn a completed run into a failed one.
    pub fn success(&self) -> bool {
        match self {
            RunOutcome::NoWork => false,
            RunOutcome::Completed(stats) => stats.processed() > 0,
        }
    }
}

/// Run the pipeline on a file or directory with the production compositor.
pub fn run(input: &Path, config: WatermarkConfig) -> Result<RunOutcome, PipelineError> {
    run_with(input, &Compositor::new(config))
}

/// Run the pipeline with a specific stamper (allows testing with a mock).
pub fn run_with(input: &Path, stamper: &impl Stamper) -> Result<RunOutcome, PipelineError> {
    let meta =
        fs::metadata(input).map_err(|_| PipelineError::MissingInput(input.to_path_buf()))?;
    if meta.is_dir() {
        run_directory(input, stamper)
    } else if meta.is_file() {
        run_single(input, stamper)
    } else {
        Err(PipelineError::InvalidInput(input.to_path_buf()))
    }
}

fn run_single(file: &Path, stamper: &impl Stamper) -> Result<RunOutcome, PipelineError> {
    let parent = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let task = FileTask {
        source: file.to_path_buf(),
        output_dir: watermark_dir(parent),
    };

    let outcome = if is_supported(&task.source) {
        process_file(stamper, task)
    } else {
        warn!("Unsupported file format: {}", task.source.display());
        Outcome::Skipped
    };
    output::print_file_outcome(file, &outcome);

    let mut stats = ProcessingStats::default();
    stats.record(&outcome);
    Ok(RunOutcome::Completed(stats))
}

fn run_directory(dir: &Path, stamper: &impl Stamper) -> Result<RunOutcome, PipelineError> {
    let output_dir = watermark_dir(dir);

    // Direct children only; subdirectories are deliberately not descended
    // into. An unreadable directory aborts the whole run here.
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file {
            files.push(entry.path());
        }
    }

    let supported = files.iter().filter(|f| is_supported(f)).count();
    if supported == 0 {
        output::print_no_work(dir);
        return Ok(RunOutcome::NoWork);
    }
    output::print_run_header(supported, &output_dir);

    let mut stats = ProcessingStats::default();
    for source in files {
        let outcome = if is_supported(&source) {
            process_file(
                stamper,
                FileTask {
                    source: source.clone(),
                    output_dir: output_dir.clone(),
                },
            )
        } else {
            debug!("Skipping unsupported file: {}", source.display());
            Outcome::Skipped
        };
        if let Outcome::Errored { stage, message } = &outcome {
            error!("{} failed at {}: {}", source.display(), stage, message);
        }
        output::print_file_outcome(&source, &outcome);
        stats.record(&outcome);
    }

    output::print_summary(&stats);
    Ok(RunOutcome::Completed(stats))
}

/// The per-file pipeline: decode → resolve date → stamp → encode.
///
/// Never propagates — every failure becomes an `Errored` outcome naming the
/// stage, so one bad file cannot stop the batch.
fn process_file(stamper: &impl Stamper, task: FileTask) -> Outcome {
    debug!("Processing {}", task.source.display());

    let image = match image::open(&task.source) {
        Ok(image) => image,
        Err(e) => {
            return Outcome::Errored {
                stage: Stage::Decode,
                message: e.to_string(),
            };
        }
    };

    // Never fails: degrades through mtime to the sentinel.
    let text = date::resolve(&task.source);

    let stamped = match stamper.apply(&image, &text) {
        Ok(stamped) => stamped,
        Err(e) => {
            return Outcome::Errored {
                stage: Stage::Compose,
                message: e.to_string(),
            };
        }
    };

    let output = output_file(&task.source, &task.output_dir);
    if let Err(message) = write_output(&stamped, &task.source, &output) {
        return Outcome::Errored {
            stage: Stage::Write,
            message,
        };
    }

    Outcome::Processed {
        output,
        date: text,
    }
}

fn write_output(image: &image::DynamicImage, source: &Path, output: &Path) -> Result<(), String> {
    // Create-if-absent; an already existing directory is fine.
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    image
        .save_with_format(output, output_format(source))
        .map_err(|e| e.to_string())
}
