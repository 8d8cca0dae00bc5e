//! CLI output formatting for the batch run.
//!
//! Each piece of output has a pure `format_*` function (returns strings, no
//! I/O) and a `print_*` wrapper that writes to stdout, so the exact text is
//! testable without capturing streams.
//!
//! ```text
//! Found 5 image files to process
//! Output directory: vacation/vacation_watermark
//!   ✓ beach.jpg → beach_watermarked.jpg (watermark: 2024-06-14)
//!   - notes.txt skipped (unsupported format)
//!   ✗ broken.jpg failed at decode: Format error decoding Jpeg
//!
//! ====================================================
//! Processing summary:
//!   Files processed successfully: 4
//!   Files skipped: 1
//!   Files with errors: 1
//!   Total files: 6
//! ====================================================
//! ```

use crate::pipeline::{Outcome, ProcessingStats};
use std::path::Path;

const RULE: &str = "====================================================";

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One line per attempted file.
pub fn format_file_outcome(source: &Path, outcome: &Outcome) -> String {
    let name = file_label(source);
    match outcome {
        Outcome::Processed { output, date } => {
            format!(
                "  ✓ {} → {} (watermark: {})",
                name,
                file_label(output),
                date
            )
        }
        Outcome::Skipped => format!("  - {name} skipped (unsupported format)"),
        Outcome::Errored { stage, message } => {
            format!("  ✗ {name} failed at {stage}: {message}")
        }
    }
}

/// Header lines printed before a directory run starts.
pub fn format_run_header(count: usize, output_dir: &Path) -> Vec<String> {
    vec![
        format!("Found {} image files to process", count),
        format!("Output directory: {}", output_dir.display()),
    ]
}

/// Fixed-order summary block: processed, skipped, errored, total.
pub fn format_summary(stats: &ProcessingStats) -> Vec<String> {
    vec![
        String::new(),
        RULE.to_string(),
        "Processing summary:".to_string(),
        format!("  Files processed successfully: {}", stats.processed()),
        format!("  Files skipped: {}", stats.skipped()),
        format!("  Files with errors: {}", stats.errored()),
        format!("  Total files: {}", stats.total()),
        RULE.to_string(),
    ]
}

pub fn format_no_work(dir: &Path) -> String {
    format!(
        "No supported image files found in directory: {}",
        dir.display()
    )
}

pub fn print_file_outcome(source: &Path, outcome: &Outcome) {
    println!("{}", format_file_outcome(source, outcome));
}

pub fn print_run_header(count: usize, output_dir: &Path) {
    for line in format_run_header(count, output_dir) {
        println!("{line}");
    }
}

pub fn print_summary(stats: &ProcessingStats) {
    for line in format_summary(stats) {
        println!("{line}");
    }
}

pub fn print_no_work(dir: &Path) {
    println!("{}", format_no_work(dir));
}
