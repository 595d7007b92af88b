//! Spec extraction from uploaded files.
//!
//! Extraction reads one file, decodes it with the first candidate encoding
//! that succeeds, and dispatches on the declared kind. Only text kinds are
//! parsed further; code and templates keep their raw content.
pub mod encoding;
pub mod text;

pub use encoding::Encoding;
pub use text::TextSpecParser;

use crate::error::ExtractError;
use crate::spec::{DeclaredKind, Spec, SpecKind};
use std::fs;
use std::path::Path;

/// Extracts specs from uploads, reusing one set of compiled text patterns.
#[derive(Default)]
pub struct SpecExtractor {
    text: TextSpecParser,
}

impl SpecExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(
        &self,
        path: &Path,
        kind: &DeclaredKind,
        encodings: &[Encoding],
    ) -> Result<Spec, ExtractError> {
        let bytes = fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = decode_with(path, &bytes, encodings)?;
        Ok(self.extract_content(content, kind))
    }

    /// Build a spec from already-decoded content.
    pub fn extract_content(&self, content: String, kind: &DeclaredKind) -> Spec {
        match kind.spec_kind() {
            SpecKind::Text => self.text.parse(&content),
            other => Spec::raw_only(other, content, kind.language()),
        }
    }
}

/// Try each encoding in order; the first success wins and the last failure is
/// reported when none succeed.
pub fn decode_with(
    path: &Path,
    bytes: &[u8],
    encodings: &[Encoding],
) -> Result<String, ExtractError> {
    let mut last_error = None;
    for encoding in encodings {
        match encoding.decode(bytes) {
            Ok(text) => return Ok(text),
            Err(message) => {
                tracing::debug!(path = %path.display(), %encoding, %message, "decode attempt failed");
                last_error = Some(ExtractError::Decode {
                    path: path.to_path_buf(),
                    encoding: encoding.name().to_string(),
                    message,
                });
            }
        }
    }
    Err(last_error.unwrap_or_else(|| ExtractError::NoEncodings(path.to_path_buf())))
}
