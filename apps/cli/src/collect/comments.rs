//! Best-effort comment stripping, dispatched on file suffix.
//!
//! This is a textual transform, not a parser: a comment delimiter inside a
//! string literal will be stripped too. That approximation is accepted — the
//! downstream size model only needs cleaned line counts, not valid programs.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());

/// Strips comments from `code` according to the lowercase file suffix
/// (including the leading dot). Unknown suffixes pass through untouched.
pub fn strip_comments(code: &str, suffix: &str) -> String {
    match suffix {
        ".html" | ".htm" => HTML_COMMENT.replace_all(code, "").into_owned(),
        ".js" | ".ts" | ".java" | ".c" | ".cpp" | ".cs" | ".css" => {
            let without_blocks = BLOCK_COMMENT.replace_all(code, "");
            LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
        }
        ".py" => code
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => code.to_string(),
    }
}
