//! System font discovery for the watermark face.
//!
//! The configured font is a family name plus weight, not a file path, so we
//! look the face up in the platform's standard font directories. Matching is
//! done on normalized file stems (`DejaVuSans-Bold.ttf` → `dejavusansbold`):
//! exact family+weight beats family alone, and when the requested family is
//! absent entirely we fall back through a short list of faces that ship with
//! nearly every desktop.
//!
//! Discovery runs once per process in practice — the compositor caches the
//! resolved face.

use crate::config::FontWeight;
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("no usable font found for family '{family}'")]
    NotFound { family: String },
}

/// Faces tried when the requested family has no match on this system.
const FALLBACK_FAMILIES: &[&str] = &[
    "DejaVuSans",
    "LiberationSans",
    "FreeSans",
    "Arial",
    "Helvetica",
];

/// Resolve a loadable font for `family` at `weight`.
///
/// Candidates are ranked per family (exact weight match first) and the
/// first one that parses as a valid TTF/OTF wins. Unreadable or corrupt
/// font files are skipped, not fatal.
pub fn resolve(family: &str, weight: FontWeight) -> Result<FontVec, FontError> {
    let files = collect_font_files();
    trace!("Considering {} font files", files.len());

    let requested = normalize(family);
    let mut families = vec![family];
    families.extend(
        FALLBACK_FAMILIES
            .iter()
            .copied()
            .filter(|f| normalize(f) != requested),
    );

    for candidate_family in families {
        for path in rank_candidates(&files, candidate_family, weight) {
            if let Some(font) = load(&path) {
                debug!(
                    "Resolved font '{}' ({:?}) to {}",
                    family,
                    weight,
                    path.display()
                );
                return Ok(font);
            }
        }
    }

    Err(FontError::NotFound {
        family: family.to_string(),
    })
}

/// All `.ttf`/`.otf` files under the platform font directories.
fn collect_font_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in font_directories() {
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && has_font_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "windows")]
    dirs.push(PathBuf::from(r"C:\Windows\Fonts"));

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
    }

    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        #[cfg(target_os = "macos")]
        dirs.push(home.join("Library/Fonts"));

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
        }

        #[cfg(target_os = "windows")]
        let _ = home;
    }

    dirs.retain(|d| d.is_dir());
    dirs
}

/// Rank `files` as candidates for `family` at `weight`, best first.
///
/// Exact family+weight-suffix stems come first (in suffix order), then the
/// bare family stem as a last resort for Bold requests.
fn rank_candidates(files: &[PathBuf], family: &str, weight: FontWeight) -> Vec<PathBuf> {
    let fam = normalize(family);
    let suffixes = weight_suffixes(weight);

    let mut ranked: Vec<(usize, &PathBuf)> = files
        .iter()
        .filter_map(|path| {
            let stem = normalize(path.file_stem()?.to_str()?);
            suffixes
                .iter()
                .position(|suffix| stem == format!("{fam}{suffix}"))
                .or_else(|| {
                    // Any-weight fallback so "Arial Bold" can still land on
                    // arial.ttf when no bold face is installed.
                    (stem == fam).then_some(suffixes.len())
                })
                .map(|score| (score, path))
        })
        .collect();

    ranked.sort_by_key(|(score, _)| *score);
    ranked.into_iter().map(|(_, path)| path.clone()).collect()
}

fn weight_suffixes(weight: FontWeight) -> &'static [&'static str] {
    match weight {
        // "bd" covers the Windows-style arialbd.ttf naming.
        FontWeight::Bold => &["bold", "bd"],
        FontWeight::Regular => &["", "regular"],
    }
}

/// Lowercase and strip everything but letters and digits, so stem matching
/// survives `-`, `_`, and space variations.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn load(path: &Path) -> Option<FontVec> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            trace!("Skipping unreadable font {}: {}", path.display(), e);
            return None;
        }
    };
    match FontVec::try_from_vec(data) {
        Ok(font) => Some(font),
        Err(_) => {
            trace!("Skipping unparsable font {}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators_and_case() {
        assert_eq!(normalize("DejaVu Sans"), "dejavusans");
        assert_eq!(normalize("Liberation-Sans_Bold"), "liberationsansbold");
        assert_eq!(normalize("arialbd"), "arialbd");
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn bold_request_prefers_bold_face() {
        let files = paths(&[
            "/fonts/DejaVuSans.ttf",
            "/fonts/DejaVuSans-Bold.ttf",
            "/fonts/DejaVuSerif.ttf",
        ]);
        let ranked = rank_candidates(&files, "DejaVuSans", FontWeight::Bold);
        assert_eq!(ranked, paths(&[
            "/fonts/DejaVuSans-Bold.ttf",
            "/fonts/DejaVuSans.ttf",
        ]));
    }

    #[test]
    fn bold_request_accepts_windows_style_suffix() {
        let files = paths(&["/fonts/arial.ttf", "/fonts/arialbd.ttf"]);
        let ranked = rank_candidates(&files, "Arial", FontWeight::Bold);
        assert_eq!(ranked[0], PathBuf::from("/fonts/arialbd.ttf"));
    }

    #[test]
    fn regular_request_prefers_bare_stem() {
        let files = paths(&[
            "/fonts/LiberationSans-Bold.ttf",
            "/fonts/LiberationSans-Regular.ttf",
        ]);
        let ranked = rank_candidates(&files, "LiberationSans", FontWeight::Regular);
        assert_eq!(ranked, paths(&["/fonts/LiberationSans-Regular.ttf"]));
    }

    #[test]
    fn unrelated_families_are_excluded() {
        let files = paths(&["/fonts/Courier.ttf", "/fonts/Times.ttf"]);
        assert!(rank_candidates(&files, "Arial", FontWeight::Bold).is_empty());
    }

    #[test]
    fn resolve_falls_back_when_family_is_unknown() {
        // Works only on machines with at least one fallback face installed;
        // on bare systems resolve correctly reports NotFound.
        match resolve("NoSuchFamily12345", FontWeight::Regular) {
            Ok(_) => {}
            Err(FontError::NotFound { family }) => assert_eq!(family, "NoSuchFamily12345"),
        }
    }
}
