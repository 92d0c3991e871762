//! Budget Calculator — pure conversions from page targets to line targets.
//!
//! Both calculations are deterministic functions of their configuration. The
//! Expansion Controller and the Page Slicer rely on that determinism for their
//! stopping conditions, so nothing here may read clocks, files, or globals.

use crate::config::{ExpansionConfig, TargetsConfig};

/// Immutable expansion budget: how many logical lines the pipeline should hold
/// before reflow so the rendered document lands near the target page count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionBudget {
    pub target_page_count: u32,
    pub lines_per_page: u32,
    pub logical_to_physical_ratio: f64,
    pub safety_multiplier: f64,
}

impl ExpansionBudget {
    pub fn from_config(cfg: &ExpansionConfig) -> Self {
        Self {
            target_page_count: cfg.target_page_count,
            lines_per_page: cfg.estimated_lines_per_page,
            logical_to_physical_ratio: cfg.logical_to_physical_ratio,
            safety_multiplier: cfg.safety_multiplier,
        }
    }

    /// Derived logical-line target:
    /// `round(pages * lines_per_page / ratio * safety)`, never below 1 for a
    /// positive page target.
    pub fn target_logical_line_count(&self) -> usize {
        let physical = (self.target_page_count * self.lines_per_page) as f64;
        let logical = physical / self.logical_to_physical_ratio * self.safety_multiplier;
        (logical.round() as usize).max(1)
    }
}

/// Document-level page budget consumed by the Page Slicer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBudget {
    pub total_pages: u32,
    pub lines_per_page: u32,
}

impl PageBudget {
    pub fn from_config(cfg: &TargetsConfig) -> Self {
        Self {
            total_pages: cfg.docx_total_pages,
            lines_per_page: cfg.docx_lines_per_page,
        }
    }

    pub fn target_physical_line_count(&self) -> usize {
        (self.total_pages * self.lines_per_page) as usize
    }
}
