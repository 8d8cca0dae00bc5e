//! Date resolution: EXIF capture time with a filesystem fallback.
//!
//! [`resolve`] always produces a usable string — it is a chain of
//! `Option`-returning steps tried in order, with a sentinel as the final
//! step, so the "never fails" contract is visible in the structure rather
//! than hidden in catch-all error handling:
//!
//! 1. EXIF `DateTimeOriginal`, then `DateTimeDigitized`, then the generic
//!    `DateTime` tag, searched across every IFD rexif exposes
//! 2. the file's last-modified timestamp, as a local calendar date
//! 3. the sentinel `"Unknown Date"`
//!
//! Metadata and filesystem errors are absorbed here and only degrade the
//! result; they never surface to the pipeline.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, trace};

/// Returned when neither EXIF metadata nor a file timestamp is available.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Capture-date tags in priority order.
const DATE_TAG_PRIORITY: [rexif::ExifTag; 3] = [
    rexif::ExifTag::DateTimeOriginal,
    rexif::ExifTag::DateTimeDigitized,
    rexif::ExifTag::DateTime,
];

/// Resolve the date to stamp on `path`. Always returns a usable string.
pub fn resolve(path: &Path) -> String {
    if let Some(date) = exif_date(path) {
        debug!("Using EXIF date for {}: {}", path.display(), date);
        return format_date(date);
    }
    if let Some(date) = modified_date(path) {
        debug!(
            "Using file modification date for {}: {}",
            path.display(),
            date
        );
        return format_date(date);
    }
    debug!("No date available for {}", path.display());
    UNKNOWN_DATE.to_string()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn exif_date(path: &Path) -> Option<NaiveDate> {
    let exif = match rexif::parse_file(path) {
        Ok(exif) => exif,
        Err(e) => {
            trace!("No EXIF data for {}: {}", path.display(), e);
            return None;
        }
    };
    let entries: Vec<(rexif::ExifTag, String)> = exif
        .entries
        .iter()
        .map(|e| (e.tag, e.value_more_readable.to_string()))
        .collect();
    pick_capture_date(&entries)
}

/// Pick the highest-priority parsable capture date from raw tag values.
///
/// A tag that is present but unparsable falls through to the next tag in
/// the priority list.
fn pick_capture_date(entries: &[(rexif::ExifTag, String)]) -> Option<NaiveDate> {
    for tag in &DATE_TAG_PRIORITY {
        let date = entries
            .iter()
            .filter(|(t, _)| t == tag)
            .find_map(|(_, value)| parse_exif_datetime(value));
        if date.is_some() {
            return date;
        }
    }
    None
}

/// Parse an EXIF datetime string into a calendar date.
///
/// The standard form is `"2023:07:14 10:30:00"`; some writers use dashes,
/// and some emit a bare date. EXIF timestamps are naive local wall-clock
/// values, so the date is taken as-is with no timezone shift.
fn parse_exif_datetime(value: &str) -> Option<NaiveDate> {
    let value = value.trim().trim_matches('\0').trim();

    for format in ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y:%m:%d", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// The file's last-modified timestamp as a local calendar date.
fn modified_date(path: &Path) -> Option<NaiveDate> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rexif::ExifTag;

    fn entry(tag: ExifTag, value: &str) -> (ExifTag, String) {
        (tag, value.to_string())
    }

    #[test]
    fn original_wins_over_digitized() {
        let entries = [
            entry(ExifTag::DateTimeDigitized, "2021:05:05 08:00:00"),
            entry(ExifTag::DateTimeOriginal, "2020:01:02 10:30:00"),
        ];
        assert_eq!(
            pick_capture_date(&entries),
            Some(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap())
        );
    }

    #[test]
    fn digitized_wins_over_generic() {
        let entries = [
            entry(ExifTag::DateTime, "2022:12:31 23:59:59"),
            entry(ExifTag::DateTimeDigitized, "2021:05:05 08:00:00"),
        ];
        assert_eq!(
            pick_capture_date(&entries),
            Some(NaiveDate::from_ymd_opt(2021, 5, 5).unwrap())
        );
    }

    #[test]
    fn generic_tag_used_when_alone() {
        let entries = [entry(ExifTag::DateTime, "2019:08:15 12:00:00")];
        assert_eq!(
            pick_capture_date(&entries),
            Some(NaiveDate::from_ymd_opt(2019, 8, 15).unwrap())
        );
    }

    #[test]
    fn unparsable_original_falls_through_to_digitized() {
        let entries = [
            entry(ExifTag::DateTimeOriginal, "not a date"),
            entry(ExifTag::DateTimeDigitized, "2021:05:05 08:00:00"),
        ];
        assert_eq!(
            pick_capture_date(&entries),
            Some(NaiveDate::from_ymd_opt(2021, 5, 5).unwrap())
        );
    }

    #[test]
    fn no_date_tags_yields_none() {
        let entries = [entry(ExifTag::Make, "TestCam")];
        assert_eq!(pick_capture_date(&entries), None);
    }

    #[test]
    fn exif_datetime_standard_and_variant_forms() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 14);
        assert_eq!(parse_exif_datetime("2023:07:14 10:30:00"), expected);
        assert_eq!(parse_exif_datetime("2023-07-14 10:30:00"), expected);
        assert_eq!(parse_exif_datetime("2023:07:14"), expected);
        assert_eq!(parse_exif_datetime("2023-07-14"), expected);
        assert_eq!(parse_exif_datetime("  2023:07:14 10:30:00\0"), expected);
        assert_eq!(parse_exif_datetime("garbage"), None);
    }

    #[test]
    fn date_formats_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
    }

    #[test]
    fn file_without_metadata_falls_back_to_mtime() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("plain.jpg");
        // A freshly written file with no EXIF: expect today's local date.
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let before = Local::now().date_naive();
        let resolved = resolve(&path);
        let after = Local::now().date_naive();

        assert!(
            resolved == format_date(before) || resolved == format_date(after),
            "expected today's date, got {resolved}"
        );
    }

    #[test]
    fn missing_file_yields_sentinel() {
        assert_eq!(resolve(Path::new("/nonexistent/photo.jpg")), UNKNOWN_DATE);
    }
}
