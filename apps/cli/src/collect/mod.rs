//! Line Normalizer — turns a source tree into a flat sequence of logical lines.
//!
//! Discovery walks the source directory, keeps files matching the configured
//! extension globs, and drops anything under an excluded directory. Each kept
//! file is decoded with the encoding fallback chain, optionally stripped of
//! comments and blank lines, and re-split if it looks minified. A failure on
//! one file is logged and skipped; it never aborts the collection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{info, warn};

use crate::config::SourceProcessingConfig;

pub mod comments;
pub mod encoding;

use comments::strip_comments;
use encoding::read_text_with_fallback;

/// Per-file contribution record, kept for reporting only.
#[derive(Debug, Clone)]
pub struct SourceFileRecord {
    pub relative_path: String,
    pub line_count: usize,
}

/// The normalizer's output: ordered logical lines plus the path→count report.
#[derive(Debug, Clone, Default)]
pub struct CollectedSource {
    pub lines: Vec<String>,
    pub files: Vec<SourceFileRecord>,
}

/// Collects and normalizes every matching file under `source_dir`.
pub fn collect_sources(source_dir: &Path, cfg: &SourceProcessingConfig) -> CollectedSource {
    if cfg.include_extensions.is_empty() {
        warn!("'include_extensions' is empty; no files will be processed.");
        return CollectedSource::default();
    }

    info!(
        "Step 1: Collecting files with extensions: {}",
        cfg.include_extensions.join(", ")
    );

    let Some(matcher) = build_extension_matcher(&cfg.include_extensions) else {
        return CollectedSource::default();
    };
    let exclude_dirs: HashSet<&str> = cfg.exclude_dirs.iter().map(String::as_str).collect();

    let mut paths = discover_files(source_dir, &matcher, &exclude_dirs);
    paths.sort();

    let mut collected = CollectedSource::default();
    for path in paths {
        match process_file(&path, cfg) {
            Ok(clean_lines) if !clean_lines.is_empty() => {
                let relative_path = path
                    .strip_prefix(source_dir)
                    .unwrap_or(&path)
                    .display()
                    .to_string();
                collected.files.push(SourceFileRecord {
                    relative_path,
                    line_count: clean_lines.len(),
                });
                collected.lines.extend(clean_lines);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Could not read or process file {}: {e}", path.display());
            }
        }
    }

    info!(
        "Collected {} logical lines from {} files.",
        collected.lines.len(),
        collected.files.len()
    );
    collected
}

fn build_extension_matcher(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Ignoring invalid include pattern '{pattern}': {e}"),
        }
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(e) => {
            warn!("Failed to build include-pattern matcher: {e}");
            None
        }
    }
}

fn discover_files(
    source_dir: &Path,
    matcher: &GlobSet,
    exclude_dirs: &HashSet<&str>,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    // Ignore files inside the collated tree must not shape the listing, so the
    // standard gitignore/hidden filters are off.
    let walker = WalkBuilder::new(source_dir)
        .standard_filters(false)
        .build();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read directory entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !matcher.is_match(file_name) {
            continue;
        }
        if is_excluded_path(path, source_dir, exclude_dirs) {
            continue;
        }

        files.push(path.to_path_buf());
    }
    files
}

/// A path is excluded when any component of its source-relative form is an
/// excluded directory name.
fn is_excluded_path(path: &Path, source_dir: &Path, exclude_dirs: &HashSet<&str>) -> bool {
    if exclude_dirs.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(source_dir).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .any(|part| exclude_dirs.contains(part))
}

fn process_file(path: &Path, cfg: &SourceProcessingConfig) -> std::io::Result<Vec<String>> {
    let mut code = read_text_with_fallback(path, &cfg.encoding_fallbacks)?;
    if cfg.strip_comments {
        code = strip_comments(&code, &file_suffix(path));
    }
    Ok(normalize_code(&code, cfg, path))
}

/// Splits cleaned file text into logical lines, applying minified re-splitting
/// before blank filtering so the statement split is never discarded as blank.
fn normalize_code(code: &str, cfg: &SourceProcessingConfig, path: &Path) -> Vec<String> {
    let raw_lines: Vec<&str> = code.lines().collect();

    let is_minified =
        raw_lines.len() <= cfg.minified_max_lines && code.chars().count() > cfg.minified_min_chars;

    if is_minified {
        info!(
            "Detected minified file '{}', applying statement re-splitting...",
            path.display()
        );
        let formatted = code.replace(';', ";\n");
        return formatted
            .lines()
            .map(str::trim)
            .filter(|line| !cfg.strip_blank_lines || !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    raw_lines
        .into_iter()
        .filter(|line| !cfg.strip_blank_lines || !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercased file suffix including the dot, or an empty string.
fn file_suffix(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}
