//! # datemark
//!
//! Stamps a capture-date watermark onto photos. The date comes from EXIF
//! metadata when present, the file's modification time when not, and a
//! fixed `"Unknown Date"` sentinel when neither is available. Point it at a
//! single image or a directory; stamped copies land in a sibling
//! `<name>_watermark` directory, originals are never touched.
//!
//! # Architecture: Per-File Pipeline, Folded Outcomes
//!
//! A run is a fold over per-file outcomes:
//!
//! ```text
//! enumerate → (per file) decode → resolve date → composite → encode
//!                  │                                            │
//!                  └── Outcome {Processed, Skipped, Errored} ◄──┘
//! ```
//!
//! Every file resolves to exactly one outcome, and the driver accumulates
//! counts from the outcome stream. This keeps the accounting logic a pure
//! fold that tests can exercise with a mock stamper, and it makes failure
//! isolation structural: a corrupt file produces an `Errored` outcome
//! instead of unwinding the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Validated, immutable watermark settings (size, color, position, opacity) |
//! | [`date`] | Date resolution: EXIF tags → file mtime → sentinel, never fails |
//! | [`render`] | Placement math, font discovery, and the text compositor |
//! | [`pipeline`] | Batch driver: enumeration, per-file isolation, accounting |
//! | [`output`] | CLI output formatting — pure `format_*` functions + print wrappers |
//!
//! # Design Decisions
//!
//! ## The Date Chain Is Infallible by Construction
//!
//! [`date::resolve`] is a sequence of `Option`-returning steps tried in
//! order with a sentinel at the end. Metadata errors cannot abort a file —
//! the worst case is a less specific date — so the pipeline never has to
//! handle a date error.
//!
//! ## Clamping Is One Shared Post-Step
//!
//! Each anchor position has its own formula, but the bounds clamp in
//! [`render::place`] is applied unconditionally after every branch. A new
//! position variant cannot forget to clamp.
//!
//! ## Top-Level-Only Enumeration
//!
//! Directory runs look at direct children only. Not descending into
//! subdirectories is deliberate: the output directory lives inside the
//! input directory, and a recursive scan would re-process its own output
//! on the next run.
//!
//! ## Opaque Output
//!
//! The stamped copy is always opaque RGB. Source transparency is flattened
//! away before compositing; the alpha channel belongs to the watermark
//! blend alone, and JPEG output (the default) has no transparency anyway.

pub mod config;
pub mod date;
pub mod output;
pub mod pipeline;
pub mod render;
