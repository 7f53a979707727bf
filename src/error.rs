//! Error types for the Radiance exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for scene export operations.
///
/// Only directory conflicts and I/O failures abort a run. Everything that goes
/// wrong with a single object is logged and that object is degraded or skipped.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a scene snapshot or configuration file.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode or re-encode a texture image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The target directory already exists; nothing was written.
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),

    /// The scene snapshot is structurally unusable.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// An object refers to a geometry, material, image or text that the snapshot lacks.
    #[error("Missing {kind} referenced by scene: {name}")]
    MissingReference { kind: &'static str, name: String },
}

impl ExportError {
    pub(crate) fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        Self::MissingReference {
            kind,
            name: name.into(),
        }
    }
}
