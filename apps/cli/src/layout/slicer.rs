//! Page Slicer — trims the physical-line sequence to the document budget.
//!
//! Below the target the sequence passes through unchanged (under-shoot is a
//! logged warning, not corrected — no padding happens here). At or above the
//! target the output is `head(k) ++ separator ++ tail(k)` with
//! `k = target / 2`; an odd target therefore under-delivers by one line, a
//! carried-over design choice (see DESIGN.md).

use tracing::{info, warn};

use crate::expand::PageBudget;

/// Fixed, human-readable bilingual omission marker inserted between head and
/// tail. The comment syntax keeps it plausible inside a code listing.
pub fn omission_separator() -> Vec<String> {
    let rule = format!("// {}", "=".repeat(70));
    vec![
        String::new(),
        rule.clone(),
        "// --- [ 内容跳跃：此处省略了文档中间部分源代码 ] ---".to_string(),
        "// --- [ Content Omitted: Middle part of the source code is skipped here ] ---".to_string(),
        rule,
        String::new(),
    ]
}

/// Produces the final slice handed to the renderer.
pub fn slice_for_document(physical_lines: Vec<String>, budget: &PageBudget) -> Vec<String> {
    let target = budget.target_physical_line_count();
    let lines_per_part = target / 2;
    let available = physical_lines.len();

    info!(
        "Slicing code for the document: aiming for {} pages by selecting {} physical lines \
        ({} from the start and {} from the end).",
        budget.total_pages, target, lines_per_part, lines_per_part
    );

    if available < target {
        warn!(
            "Available physical lines ({available}) fall short of the {target} needed for a \
            full {}-page document; the artifact will contain everything and may be shorter.",
            budget.total_pages
        );
        return physical_lines;
    }

    let mut sliced = Vec::with_capacity(lines_per_part * 2 + 6);
    sliced.extend_from_slice(&physical_lines[..lines_per_part]);
    sliced.extend(omission_separator());
    sliced.extend_from_slice(&physical_lines[available - lines_per_part..]);

    info!("Sliced document content prepared: {} physical lines.", sliced.len());
    sliced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(total_pages: u32, lines_per_page: u32) -> PageBudget {
        PageBudget {
            total_pages,
            lines_per_page,
        }
    }

    fn numbered(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("L{i}")).collect()
    }

    #[test]
    fn test_scenario_target_six_of_ten() {
        // target 6 → k = 3 → [L1,L2,L3] + separator + [L8,L9,L10]
        let out = slice_for_document(numbered(10), &budget(6, 1));
        let sep = omission_separator();

        assert_eq!(out.len(), 6 + sep.len());
        assert_eq!(&out[..3], &["L1", "L2", "L3"]);
        assert_eq!(&out[3..3 + sep.len()], &sep[..]);
        assert_eq!(&out[3 + sep.len()..], &["L8", "L9", "L10"]);
    }

    #[test]
    fn test_below_target_passes_through_unchanged() {
        let input = numbered(5);
        let out = slice_for_document(input.clone(), &budget(6, 1));
        assert_eq!(out, input);
    }

    #[test]
    fn test_exact_target_still_sliced() {
        // available == target is "enough": head/tail windows meet exactly.
        let out = slice_for_document(numbered(6), &budget(6, 1));
        let sep = omission_separator();
        assert_eq!(&out[..3], &["L1", "L2", "L3"]);
        assert_eq!(&out[3 + sep.len()..], &["L4", "L5", "L6"]);
    }

    #[test]
    fn test_odd_target_under_delivers_by_one() {
        // target 7 → k = 3 on both sides: 6 + separator, one short of nominal.
        let out = slice_for_document(numbered(20), &budget(7, 1));
        let sep = omission_separator();
        assert_eq!(out.len(), 6 + sep.len());
        assert_eq!(&out[..3], &["L1", "L2", "L3"]);
        assert_eq!(&out[3 + sep.len()..], &["L18", "L19", "L20"]);
    }

    #[test]
    fn test_zero_target_is_separator_only() {
        let out = slice_for_document(numbered(4), &budget(0, 57));
        assert_eq!(out, omission_separator());
    }

    #[test]
    fn test_separator_is_bilingual_and_fixed_length() {
        let sep = omission_separator();
        assert_eq!(sep.len(), 6);
        assert!(sep[2].contains("内容跳跃"));
        assert!(sep[3].contains("Content Omitted"));
    }
}
