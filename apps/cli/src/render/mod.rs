//! Rendering collaborator — writes the final DOCX artifact.
//!
//! The core pipeline hands over an ordered sequence of physical lines and this
//! module lays them out one paragraph each, driven entirely by `DocxConfig`.
//! How many lines the word processor actually places per page is out of our
//! hands; the page-count target upstream is an estimate, not a guarantee.

use std::path::{Path, PathBuf};

use docx_rs::{
    AlignmentType, Docx, FieldCharType, Footer, Header, InstrText, PageMargin, Paragraph, Run,
    RunFonts,
};
use thiserror::Error;
use tracing::info;

use crate::config::DocxConfig;

/// A4 portrait, in twentieths of a point.
const A4_WIDTH_TWIPS: u32 = 11906;
const A4_HEIGHT_TWIPS: u32 = 16838;

/// Document label appended to the artifact base name.
pub const DOCUMENT_LABEL: &str = "源代码整理文档";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create output file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write document: {0}")]
    Docx(String),
}

/// Config-driven DOCX writer.
pub struct DocxRenderer<'a> {
    cfg: &'a DocxConfig,
}

impl<'a> DocxRenderer<'a> {
    pub fn new(cfg: &'a DocxConfig) -> Self {
        Self { cfg }
    }

    /// Renders `lines` as one code paragraph each and saves the artifact.
    /// A save failure is fatal to the run.
    pub fn render(
        &self,
        lines: &[String],
        software_name: &str,
        version: &str,
        output_path: &Path,
    ) -> Result<(), RenderError> {
        info!("Generating DOCX document -> {}", output_path.display());

        let setup = &self.cfg.page_setup;
        let styles = &self.cfg.styles;
        let code_fonts = RunFonts::new().ascii(&styles.code_font_name);
        // docx sizes are half-points.
        let code_size = (styles.code_font_size_pt * 2) as usize;

        let mut docx = Docx::new()
            .page_size(A4_WIDTH_TWIPS, A4_HEIGHT_TWIPS)
            .page_margin(
                PageMargin::new()
                    .top(cm_to_twips(setup.margin_top_cm))
                    .bottom(cm_to_twips(setup.margin_bottom_cm))
                    .left(cm_to_twips(setup.margin_left_cm))
                    .right(cm_to_twips(setup.margin_right_cm))
                    .header(cm_to_twips(setup.header_from_top_cm))
                    .footer(cm_to_twips(setup.footer_from_bottom_cm)),
            )
            .default_fonts(code_fonts.clone())
            .default_size(code_size)
            .header(self.build_header(software_name, version))
            .footer(self.build_footer());

        for line in lines {
            docx = docx.add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text(line.as_str())
                        .fonts(code_fonts.clone())
                        .size(code_size),
                ),
            );
        }

        let file = std::fs::File::create(output_path)?;
        docx.build()
            .pack(file)
            .map_err(|e| RenderError::Docx(e.to_string()))?;

        info!("DOCX document generated successfully.");
        Ok(())
    }

    fn build_header(&self, software_name: &str, version: &str) -> Header {
        let content = self
            .cfg
            .header_content
            .replace("{software_name}", software_name)
            .replace("{version}", version);
        Header::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(content))
                .align(AlignmentType::Center),
        )
    }

    fn build_footer(&self) -> Footer {
        let run = if self.cfg.footer_content.contains("{page_number}") {
            // Live PAGE field so the word processor numbers pages itself.
            Run::new()
                .add_field_char(FieldCharType::Begin, false)
                .add_instr_text(InstrText::Unsupported("PAGE".to_string()))
                .add_field_char(FieldCharType::End, false)
        } else {
            Run::new().add_text(self.cfg.footer_content.as_str())
        };
        Footer::new().add_paragraph(Paragraph::new().add_run(run).align(AlignmentType::Center))
    }
}

fn cm_to_twips(cm: f64) -> i32 {
    // 1 inch = 2.54 cm = 1440 twips.
    (cm / 2.54 * 1440.0).round() as i32
}

/// Builds the artifact path: `{software_name}_{version}_<label>.docx` under
/// `output_dir`, with filesystem-unsafe characters replaced.
pub fn artifact_path(output_dir: &Path, software_name: &str, version: &str) -> PathBuf {
    let desired = format!("{software_name}_{version}_{DOCUMENT_LABEL}");
    output_dir.join(format!("{}.docx", sanitize_file_name(&desired)))
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_file_name("clean-name 1.0"), "clean-name 1.0");
    }

    #[test]
    fn test_artifact_path_shape() {
        let path = artifact_path(Path::new("/tmp/out"), "MyApp", "v1.2");
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("MyApp_v1.2_"));
        assert!(file_name.ends_with(".docx"));
    }

    #[test]
    fn test_artifact_path_sanitizes_version_slashes() {
        let path = artifact_path(Path::new("."), "App", "1/2");
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(!file_name[..file_name.len() - 5].contains('/'));
    }

    #[test]
    fn test_cm_to_twips_known_values() {
        assert_eq!(cm_to_twips(2.54), 1440);
        assert_eq!(cm_to_twips(2.5), 1417);
    }

    #[test]
    fn test_render_writes_nonempty_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let cfg = DocxConfig::default();

        let lines = vec!["let a = 1;".to_string(), String::new(), "done();".to_string()];
        DocxRenderer::new(&cfg)
            .render(&lines, "MyApp", "1.0", &path)
            .unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_render_fails_on_unwritable_path() {
        let cfg = DocxConfig::default();
        let result = DocxRenderer::new(&cfg).render(
            &["x".to_string()],
            "App",
            "1.0",
            Path::new("/definitely/not/a/dir/out.docx"),
        );
        assert!(matches!(result, Err(RenderError::Io(_))));
    }
}
