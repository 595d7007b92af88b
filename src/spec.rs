//! Spec records extracted from uploaded files.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Normalized kind of an extracted spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKind {
    Text,
    Code,
    Template,
    Unknown,
}

/// Kind declared for an upload before extraction, usually derived from the
/// file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredKind {
    Text,
    Markdown,
    Json,
    Python,
    Html,
    Other(String),
}

impl DeclaredKind {
    /// Map a file extension (without the dot) to a declared kind.
    ///
    /// Returns `None` for extensions outside the supported table.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(DeclaredKind::Text),
            "py" => Some(DeclaredKind::Python),
            "html" => Some(DeclaredKind::Html),
            "md" => Some(DeclaredKind::Markdown),
            "json" => Some(DeclaredKind::Json),
            _ => None,
        }
    }

    /// The spec kind this declaration normalizes to.
    pub fn spec_kind(&self) -> SpecKind {
        match self {
            DeclaredKind::Text | DeclaredKind::Markdown | DeclaredKind::Json => SpecKind::Text,
            DeclaredKind::Python => SpecKind::Code,
            DeclaredKind::Html => SpecKind::Template,
            DeclaredKind::Other(_) => SpecKind::Unknown,
        }
    }

    pub fn language(&self) -> Option<&'static str> {
        match self {
            DeclaredKind::Python => Some("python"),
            DeclaredKind::Html => Some("html"),
            _ => None,
        }
    }
}

impl FromStr for DeclaredKind {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "text" => DeclaredKind::Text,
            "markdown" => DeclaredKind::Markdown,
            "json" => DeclaredKind::Json,
            "python" | "code" => DeclaredKind::Python,
            "html" | "template" => DeclaredKind::Html,
            other => DeclaredKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredKind::Text => f.write_str("text"),
            DeclaredKind::Markdown => f.write_str("markdown"),
            DeclaredKind::Json => f.write_str("json"),
            DeclaredKind::Python => f.write_str("python"),
            DeclaredKind::Html => f.write_str("html"),
            DeclaredKind::Other(name) => f.write_str(name),
        }
    }
}

/// A credit assignment parsed from `<user> assigns <bot> with <N> credits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub user: String,
    pub bot: String,
    pub credits: u64,
}

/// Structured result of extracting one uploaded file.
///
/// `pairs` and `intents` are only ever populated for [`SpecKind::Text`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spec {
    pub kind: SpecKind,
    pub module: Option<String>,
    pub pairs: Vec<(String, f64)>,
    pub intents: Vec<Intent>,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Spec {
    /// A spec that carries only its raw content (code, template, unknown).
    pub fn raw_only(kind: SpecKind, raw: String, language: Option<&str>) -> Self {
        Self {
            kind,
            module: None,
            pairs: Vec::new(),
            intents: Vec::new(),
            raw,
            language: language.map(str::to_string),
        }
    }
}
