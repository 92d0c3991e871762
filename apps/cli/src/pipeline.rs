//! Pipeline orchestration — the full collation flow for one run.
//!
//! Flow: collect → expand → reflow → slice → render.
//!
//! One run owns its line buffers exclusively from collection to hand-off; the
//! whole flow is sequential, and the only failures that abort it are an empty
//! collection and a failed artifact write.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::collect::collect_sources;
use crate::config::Config;
use crate::errors::CollateError;
use crate::expand::{CodeGenerator, ExpansionController, PageBudget};
use crate::layout::{reflow_lines, slice_for_document};
use crate::render::{artifact_path, DocxRenderer};

pub struct Collator<'a> {
    config: &'a Config,
    source_dir: PathBuf,
    software_name: String,
    version: String,
    output_dir: PathBuf,
}

impl<'a> Collator<'a> {
    pub fn new(
        config: &'a Config,
        source_dir: PathBuf,
        software_name: String,
        version: String,
        output_dir: PathBuf,
    ) -> Result<Self, CollateError> {
        if !source_dir.is_dir() {
            return Err(CollateError::SourceDirMissing(source_dir));
        }
        std::fs::create_dir_all(&output_dir)?;
        info!("Output will be saved to: {}", output_dir.display());

        Ok(Self {
            config,
            source_dir,
            software_name,
            version,
            output_dir,
        })
    }

    /// Executes the full document generation flow and returns the artifact path.
    pub async fn run(
        &self,
        generator: Option<&dyn CodeGenerator>,
    ) -> Result<PathBuf, CollateError> {
        info!("Starting source code collation process...");

        let collected = collect_sources(&self.source_dir, &self.config.source_processing);
        if collected.lines.is_empty() {
            return Err(CollateError::NoSourceLines(self.source_dir.clone()));
        }
        for record in &collected.files {
            debug!(
                "  {} -> {} logical lines",
                record.relative_path, record.line_count
            );
        }

        let controller = ExpansionController::new(&self.config.expansion, generator);
        let expanded_lines = controller.expand(collected.lines).await;

        // Pre-wrapping every logical line to the page width is what makes the
        // physical-line page estimate trustworthy.
        info!("Preprocessing all code lines to wrap long lines for document generation...");
        let physical_lines = reflow_lines(&expanded_lines, &self.config.wrapping);

        let budget = PageBudget::from_config(&self.config.targets);
        let document_lines = slice_for_document(physical_lines, &budget);

        let output_path = artifact_path(&self.output_dir, &self.software_name, &self.version);
        DocxRenderer::new(&self.config.docx).render(
            &document_lines,
            &self.software_name,
            &self.version,
            &output_path,
        )?;

        info!("Source code collation process completed successfully!");
        Ok(output_path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
