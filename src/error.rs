//! Error types for the fallible edges of the crate (files, scene parsing,
//! the viewer window). The lighting pipeline itself never fails.

use std::io;
use thiserror::Error;

/// Errors raised while loading, saving or displaying a scene
#[derive(Error, Debug)]
pub enum LightingError {
    /// IO error when reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed map description
    #[error("Scene parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parameter outside the range the lighting model supports
    #[error("Invalid {entity}: {detail}")]
    InvalidParameter { entity: &'static str, detail: String },

    /// Window creation or update failure
    #[error("Viewer error: {0}")]
    Viewer(String),
}

pub type Result<T> = std::result::Result<T, LightingError>;
