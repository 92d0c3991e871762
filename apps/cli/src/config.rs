//! Configuration surface for the whole pipeline.
//!
//! The built-in defaults are constructed once at startup via `Config::default()`
//! and passed down by reference — no component does an ambient lookup. A TOML
//! file can override any section; absent keys fall back to the defaults below.
//!
//! Resolution order for the config file:
//! 1. `--config` CLI argument
//! 2. `SOURCETOME_CONFIG` environment variable
//! 3. `sourcetome.toml` in the working directory
//! 4. built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::CollateError;

/// A file with at most this many raw lines is a candidate for minified-file
/// handling. Heuristic threshold carried over from the original tool; no
/// rationale is documented for the specific value.
pub const DEFAULT_MINIFIED_MAX_LINES: usize = 10;

/// A minified candidate must additionally exceed this many characters.
pub const DEFAULT_MINIFIED_MIN_CHARS: usize = 2000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source_processing: SourceProcessingConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub wrapping: WrappingConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub docx: DocxConfig,
}

impl Config {
    /// Loads the configuration, trying the documented resolution order.
    /// A missing file at every location is not an error — the defaults apply.
    /// A file that exists but fails to parse is a configuration error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, CollateError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
            return Err(CollateError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        if let Ok(env_path) = std::env::var("SOURCETOME_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                info!("Loading configuration from SOURCETOME_CONFIG={}", path.display());
                return Self::from_file(&path);
            }
            warn!(
                "SOURCETOME_CONFIG points at a missing file: {}",
                path.display()
            );
        }

        let default_path = PathBuf::from("sourcetome.toml");
        if default_path.exists() {
            info!("Loading configuration from {}", default_path.display());
            return Self::from_file(&default_path);
        }

        warn!("No configuration file found; using built-in defaults.");
        Ok(Config::default())
    }

    fn from_file(path: &Path) -> Result<Self, CollateError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| CollateError::Config(format!("{}: {e}", path.display())))
    }
}

/// Knobs for the Line Normalizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceProcessingConfig {
    /// Glob patterns matched against file names, e.g. `*.js`.
    pub include_extensions: Vec<String>,
    /// Directory names excluded anywhere below the source root.
    pub exclude_dirs: Vec<String>,
    pub strip_comments: bool,
    pub strip_blank_lines: bool,
    /// Encoding labels tried in order; the first is also the lossy fallback.
    pub encoding_fallbacks: Vec<String>,
    pub minified_max_lines: usize,
    pub minified_min_chars: usize,
}

impl Default for SourceProcessingConfig {
    fn default() -> Self {
        Self {
            include_extensions: vec![
                "*.html".to_string(),
                "*.js".to_string(),
                "*.css".to_string(),
            ],
            exclude_dirs: Vec::new(),
            strip_comments: true,
            strip_blank_lines: true,
            encoding_fallbacks: vec![
                "utf-8".to_string(),
                "utf-8-sig".to_string(),
                "gbk".to_string(),
                "latin1".to_string(),
            ],
            minified_max_lines: DEFAULT_MINIFIED_MAX_LINES,
            minified_min_chars: DEFAULT_MINIFIED_MIN_CHARS,
        }
    }
}

/// How the Expansion Controller obtains synthetic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionMethod {
    /// Generative collaborator first, optional repetition fallback.
    Llm,
    /// Deterministic repetition only.
    Repeat,
    /// No expansion at all.
    None,
}

/// Knobs for the Expansion Controller and its budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub enabled: bool,
    pub method: ExpansionMethod,
    pub max_attempts: u32,
    pub target_page_count: u32,
    pub estimated_lines_per_page: u32,
    pub logical_to_physical_ratio: f64,
    pub safety_multiplier: f64,
    /// Marker line inserted before each repeated block; `{index}` is replaced
    /// with the 1-based repetition counter.
    pub repeat_marker: String,
    pub fallback_to_repeat: bool,
    /// OpenAI-compatible chat-completions endpoint base URL.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            method: ExpansionMethod::Llm,
            max_attempts: 5,
            target_page_count: 100,
            estimated_lines_per_page: 54,
            logical_to_physical_ratio: 1.5,
            safety_multiplier: 1.25,
            repeat_marker: "/* === repeated block {index} === */".to_string(),
            fallback_to_repeat: true,
            api_base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            model: "qwen3-coder-flash".to_string(),
            temperature: 0.75,
        }
    }
}

/// Knobs for the Line Reflow Engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WrappingConfig {
    /// Column width for physical lines. Conservative so the renderer never
    /// force-wraps a second time.
    pub width: usize,
    /// Prefix for continuation fragments of a wrapped logical line.
    pub subsequent_indent: String,
}

impl Default for WrappingConfig {
    fn default() -> Self {
        Self {
            width: 85,
            subsequent_indent: "  ".to_string(),
        }
    }
}

/// Document-level page budget consumed by the Page Slicer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    pub docx_total_pages: u32,
    pub docx_lines_per_page: u32,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            docx_total_pages: 60,
            docx_lines_per_page: 57,
        }
    }
}

/// Rendering-collaborator configuration. The core never interprets these
/// values; they are handed verbatim to the DOCX renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocxConfig {
    pub page_setup: PageSetupConfig,
    pub styles: StylesConfig,
    /// Header text template; `{software_name}` and `{version}` are replaced.
    pub header_content: String,
    /// Footer text template; `{page_number}` becomes a live page field.
    pub footer_content: String,
}

impl Default for DocxConfig {
    fn default() -> Self {
        Self {
            page_setup: PageSetupConfig::default(),
            styles: StylesConfig::default(),
            header_content: "{software_name} {version}".to_string(),
            footer_content: "{page_number}".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageSetupConfig {
    /// Margins in centimetres: top, bottom, left, right.
    pub margin_top_cm: f64,
    pub margin_bottom_cm: f64,
    pub margin_left_cm: f64,
    pub margin_right_cm: f64,
    pub header_from_top_cm: f64,
    pub footer_from_bottom_cm: f64,
}

impl Default for PageSetupConfig {
    fn default() -> Self {
        Self {
            margin_top_cm: 2.5,
            margin_bottom_cm: 2.5,
            margin_left_cm: 2.5,
            margin_right_cm: 2.5,
            header_from_top_cm: 1.5,
            footer_from_bottom_cm: 1.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    pub code_font_name: String,
    pub code_font_size_pt: u32,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            code_font_name: "Courier New".to_string(),
            code_font_size_pt: 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.source_processing.include_extensions.len(), 3);
        assert!(config.source_processing.strip_comments);
        assert_eq!(config.expansion.max_attempts, 5);
        assert_eq!(config.expansion.method, ExpansionMethod::Llm);
        assert_eq!(config.wrapping.width, 85);
        assert_eq!(config.wrapping.subsequent_indent, "  ");
        assert_eq!(config.targets.docx_total_pages, 60);
        assert_eq!(config.targets.docx_lines_per_page, 57);
    }

    #[test]
    fn test_partial_toml_falls_back_per_section() {
        let toml_doc = r#"
            [wrapping]
            width = 60

            [expansion]
            method = "repeat"
        "#;
        let config: Config = toml::from_str(toml_doc).unwrap();
        assert_eq!(config.wrapping.width, 60);
        // Unset key in an overridden section keeps its default.
        assert_eq!(config.wrapping.subsequent_indent, "  ");
        assert_eq!(config.expansion.method, ExpansionMethod::Repeat);
        // Untouched sections are fully default.
        assert_eq!(config.targets.docx_lines_per_page, 57);
    }

    #[test]
    fn test_minified_thresholds_are_overridable() {
        let toml_doc = r#"
            [source_processing]
            minified_max_lines = 3
            minified_min_chars = 500
        "#;
        let config: Config = toml::from_str(toml_doc).unwrap();
        assert_eq!(config.source_processing.minified_max_lines, 3);
        assert_eq!(config.source_processing.minified_min_chars, 500);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let toml_doc = r#"
            [expansion]
            method = "telepathy"
        "#;
        assert!(toml::from_str::<Config>(toml_doc).is_err());
    }
}
