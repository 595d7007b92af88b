//! Error types for extraction, rendering, and skipped uploads.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one upload into a spec.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No candidate encoding could decode the file; carries the last attempt.
    #[error("decode {path} as {encoding}: {message}")]
    Decode {
        path: PathBuf,
        encoding: String,
        message: String,
    },

    #[error("no candidate encodings supplied for {0}")]
    NoEncodings(PathBuf),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template {0}")]
    UnknownTemplate(String),

    #[error("template {template}: missing value for `{key}`")]
    MissingKey { template: String, key: String },

    #[error("template {template}: unknown filter `{filter}`")]
    UnknownFilter { template: String, filter: String },

    #[error("template {template}: unclosed `{{{{` at byte {offset}")]
    Unclosed { template: String, offset: usize },

    #[error("serialize template context: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why an upload did not produce a spec.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unsupported extension {0:?}")]
    UnsupportedKind(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
