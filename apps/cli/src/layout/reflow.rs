//! Line Reflow Engine — logical lines to page-width physical lines.
//!
//! Greedy wrap at a fixed column width, measured in display columns via
//! `unicode-width` so wide CJK glyphs count correctly. Long unbreakable tokens
//! are force-split at the boundary: an overflowing physical line would corrupt
//! the page-count estimation downstream. Hyphens are never treated as break
//! points — code tokens are full of hyphen-like operators.
//!
//! Continuation fragments carry the configured indent so wrapped code stays
//! visually distinguishable from a genuinely new logical line.

use unicode_width::UnicodeWidthChar;

use crate::config::WrappingConfig;

/// Wraps every logical line, preserving order. Each logical line contributes
/// at least one physical line, so `result.len() >= logical_lines.len()`.
pub fn reflow_lines(logical_lines: &[String], cfg: &WrappingConfig) -> Vec<String> {
    let mut physical = Vec::with_capacity(logical_lines.len());
    for line in logical_lines {
        physical.extend(wrap_line(line, cfg.width, &cfg.subsequent_indent));
    }
    physical
}

/// Wraps a single logical line to `width` display columns.
///
/// Break discipline: prefer the last whitespace gap that fits; hard-split an
/// unbreakable token at the column boundary. Whitespace at a break point is
/// dropped on both sides. An empty line yields exactly one empty physical line.
pub fn wrap_line(line: &str, width: usize, indent: &str) -> Vec<String> {
    let width = width.max(1);
    if display_width(line) <= width {
        return vec![line.to_string()];
    }

    // Continuation fragments must still fit inside `width` with their indent.
    let continuation_budget = width.saturating_sub(display_width(indent)).max(1);

    let mut fragments = Vec::new();
    let mut remainder: &str = line;
    let mut first = true;

    loop {
        let budget = if first { width } else { continuation_budget };
        if display_width(remainder) <= budget {
            fragments.push(decorate(remainder, indent, first));
            break;
        }

        let break_at = find_break(remainder, budget);
        let (head, tail) = remainder.split_at(break_at);
        fragments.push(decorate(head.trim_end(), indent, first));
        remainder = tail.trim_start();
        first = false;

        if remainder.is_empty() {
            break;
        }
    }

    fragments
}

fn decorate(fragment: &str, indent: &str, first: bool) -> String {
    if first {
        fragment.to_string()
    } else {
        format!("{indent}{fragment}")
    }
}

/// Byte offset at which to break `text` so the head fits in `budget` columns.
/// Prefers the last whitespace gap inside the budget; falls back to a hard
/// split at the column boundary (never before the first character).
fn find_break(text: &str, budget: usize) -> usize {
    let mut columns = 0usize;
    let mut hard_break = 0usize;
    let mut last_space: Option<usize> = None;
    let mut seen_content = false;

    for (offset, ch) in text.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if columns + ch_width > budget {
            break;
        }
        columns += ch_width;
        hard_break = offset + ch.len_utf8();
        if ch.is_whitespace() {
            // Only a gap after real content is a break point; breaking inside
            // leading indentation would orphan it onto an empty fragment.
            if seen_content {
                last_space = Some(offset);
            }
        } else {
            seen_content = true;
        }
    }

    if let Some(offset) = last_space {
        return offset;
    }
    if hard_break == 0 {
        // Not even one glyph fits the budget; take a whole character anyway
        // rather than splitting inside a code point.
        return text.chars().next().map(char::len_utf8).unwrap_or(1);
    }
    hard_break
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(width: usize, indent: &str) -> WrappingConfig {
        WrappingConfig {
            width,
            subsequent_indent: indent.to_string(),
        }
    }

    #[test]
    fn test_unbreakable_token_force_split() {
        let fragments = wrap_line("abcdefghijklmno", 10, "  ");
        assert_eq!(fragments, vec!["abcdefghij", "  klmno"]);
    }

    #[test]
    fn test_short_line_passes_through() {
        let fragments = wrap_line("let a = 1;", 85, "  ");
        assert_eq!(fragments, vec!["let a = 1;"]);
    }

    #[test]
    fn test_empty_line_yields_one_physical_line() {
        let fragments = wrap_line("", 85, "  ");
        assert_eq!(fragments, vec![""]);
    }

    #[test]
    fn test_break_prefers_last_space_gap() {
        let fragments = wrap_line("alpha beta gamma", 11, "  ");
        assert_eq!(fragments, vec!["alpha beta", "  gamma"]);
    }

    #[test]
    fn test_hyphens_are_not_break_points() {
        // A hyphenated token must hard-split, not break at the hyphen.
        let fragments = wrap_line("self-describing-token", 10, "");
        assert_eq!(fragments[0], "self-descr");
        assert_eq!(fragments[1], "ibing-toke");
        assert_eq!(fragments[2], "n");
    }

    #[test]
    fn test_continuation_lines_fit_within_width() {
        let line = "a".repeat(300);
        let fragments = wrap_line(&line, 40, "    ");
        assert!(fragments.len() > 1);
        for fragment in &fragments {
            assert!(display_width(fragment) <= 40, "fragment overflows: {fragment:?}");
        }
        for fragment in &fragments[1..] {
            assert!(fragment.starts_with("    "));
        }
    }

    #[test]
    fn test_wrap_preserves_text_up_to_break_whitespace() {
        let line = "fn main() { println!(\"a long call expression here\"); }";
        let fragments = wrap_line(line, 20, "  ");
        let rejoined = fragments
            .iter()
            .enumerate()
            .map(|(i, f)| if i == 0 { f.as_str() } else { f.trim_start() })
            .collect::<Vec<_>>()
            .join(" ");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&rejoined), normalize(line));
    }

    #[test]
    fn test_wide_glyphs_count_two_columns() {
        // Four CJK chars = 8 columns; width 4 fits two per fragment.
        let fragments = wrap_line("代码整理", 4, "");
        assert_eq!(fragments, vec!["代码", "整理"]);
    }

    #[test]
    fn test_width_narrower_than_glyph_still_advances() {
        // A 2-column glyph under a 1-column budget must still make progress.
        let fragments = wrap_line("代码", 1, "");
        assert_eq!(fragments, vec!["代", "码"]);
    }

    #[test]
    fn test_reflow_count_at_least_logical_count() {
        let logical = vec![
            "short".to_string(),
            String::new(),
            "x".repeat(500),
            "a few words separated by spaces repeated again and again".to_string(),
        ];
        let physical = reflow_lines(&logical, &cfg(30, "  "));
        assert!(physical.len() >= logical.len());
    }

    #[test]
    fn test_reflow_preserves_order() {
        let logical = vec!["first".to_string(), "second".to_string()];
        let physical = reflow_lines(&logical, &cfg(85, "  "));
        assert_eq!(physical, vec!["first", "second"]);
    }
}
