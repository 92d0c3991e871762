use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

/// Run-level error type.
///
/// Only the failures listed here abort a run. Per-file decode/process failures
/// and generative-collaborator failures are handled (and logged) inside their
/// own components and never surface as a `CollateError`.
#[derive(Debug, Error)]
pub enum CollateError {
    #[error("Source directory not found: {0}")]
    SourceDirMissing(PathBuf),

    #[error("No processable source code found in {0}")]
    NoSourceLines(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Document rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
