//! Physical-line layout: width-based reflow and document slicing.

pub mod reflow;
pub mod slicer;

pub use reflow::reflow_lines;
pub use slicer::slice_for_document;
