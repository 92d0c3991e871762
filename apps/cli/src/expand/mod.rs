//! Expansion Controller — grows the logical-line sequence to its budget.
//!
//! # State machine (per run)
//! - **Disabled**: expansion off, method `none`, or already at/above target →
//!   input returned unchanged.
//! - **Generating**: bounded attempts against the generative collaborator.
//!   Each attempt requests the lines still needed, with a bounded context
//!   sample taken from the *original* sequence so request size never grows.
//!   An empty response or a call failure ends the loop immediately — the
//!   failure is swallowed, never propagated.
//! - **Fallback**: deterministic repetition with interleaved marker lines,
//!   truncated to exactly the target. Also the sole expansion path when no
//!   collaborator is configured.
//! - **Done**: whatever accumulated is returned; under-shoot is logged only.
//!
//! The Generating state is inherently non-deterministic; the Fallback state is
//! fully deterministic given the same input and target. Keep that asymmetry:
//! fallback behavior must stay testable without a live collaborator.

use tracing::{error, info, warn};

use crate::config::{ExpansionConfig, ExpansionMethod};

pub mod budget;
pub mod generator;
pub mod prompts;

pub use budget::{ExpansionBudget, PageBudget};
pub use generator::{CodeGenerator, GeneratorError, LlmGenerator};

/// Upper bound on the context sample sent with each generation attempt.
/// Always taken from the pre-expansion sequence, never the growing one.
pub const CONTEXT_SAMPLE_LINES: usize = 1000;

pub struct ExpansionController<'a> {
    cfg: &'a ExpansionConfig,
    generator: Option<&'a dyn CodeGenerator>,
}

impl<'a> ExpansionController<'a> {
    pub fn new(cfg: &'a ExpansionConfig, generator: Option<&'a dyn CodeGenerator>) -> Self {
        Self { cfg, generator }
    }

    /// Runs the expansion state machine over `original`.
    pub async fn expand(&self, original: Vec<String>) -> Vec<String> {
        if !self.cfg.enabled || self.cfg.method == ExpansionMethod::None {
            return original;
        }

        let target = ExpansionBudget::from_config(self.cfg).target_logical_line_count();
        if original.len() >= target {
            return original;
        }

        info!(
            "Step 2: Expanding code to ~{} pages (target ~{} logical lines)...",
            self.cfg.target_page_count, target
        );

        let generator = match (self.cfg.method, self.generator) {
            (ExpansionMethod::Llm, Some(generator)) => generator,
            _ => {
                // Repetition is the sole path without a collaborator.
                return expand_by_repetition(&original, target, &self.cfg.repeat_marker);
            }
        };

        let context_code = original
            .iter()
            .take(CONTEXT_SAMPLE_LINES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        let mut current = original;
        let mut attempt = 0u32;

        while current.len() < target && attempt < self.cfg.max_attempts {
            attempt += 1;
            let lines_still_needed = target - current.len();
            info!(
                "--- Attempt {attempt}/{}: code still insufficient, requesting {lines_still_needed} more lines ---",
                self.cfg.max_attempts
            );

            match generator.generate(&context_code, lines_still_needed).await {
                Ok(text) if !text.trim().is_empty() => {
                    let generated: Vec<String> = text.lines().map(str::to_string).collect();
                    info!(
                        "Generated {} new lines on attempt {attempt}; total {} / {target}",
                        generated.len(),
                        current.len() + generated.len()
                    );
                    current.extend(generated);
                }
                Ok(_) => {
                    warn!("Generator returned an empty response on attempt {attempt}.");
                    break;
                }
                Err(e) => {
                    error!("Generator call failed on attempt {attempt}: {e}. Stopping expansion.");
                    break;
                }
            }
        }

        if current.len() < target {
            warn!(
                "Generative expansion finished after {attempt} attempts; target of {target} lines not reached (current: {}).",
                current.len()
            );
            if self.cfg.fallback_to_repeat {
                return expand_by_repetition(&current, target, &self.cfg.repeat_marker);
            }
        } else {
            info!("Generative expansion successful; code quantity is sufficient.");
        }

        current
    }
}

/// Deterministic fallback expansion.
///
/// Repeats `original`, interposing a formatted marker line before each
/// repetition, until the accumulated length reaches the target, then truncates
/// to exactly `target` lines. Applying it to an input already at/above the
/// target returns the input unchanged.
pub fn expand_by_repetition(original: &[String], target: usize, marker_template: &str) -> Vec<String> {
    if original.len() >= target {
        return original.to_vec();
    }
    if original.is_empty() {
        return Vec::new();
    }

    info!(
        "Using repeat expansion to reach target of {target} lines (current: {}).",
        original.len()
    );

    let mut expanded = original.to_vec();
    let mut index = 1usize;
    while expanded.len() < target {
        expanded.push(marker_template.replace("{index}", &index.to_string()));
        expanded.extend_from_slice(original);
        index += 1;
    }

    expanded.truncate(target);
    expanded
}
