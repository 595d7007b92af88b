//! Build configuration.
//!
//! Defaults match the directories the builder has always used; a JSON config
//! file and CLI flags override them field by field.
use crate::extract::Encoding;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_OUTPUT_DIR: &str = "generated_app";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub uploads_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Candidate encodings, tried in order for every upload.
    pub encodings: Vec<Encoding>,
    /// Directory of template files overriding or extending the built-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            encodings: vec![Encoding::Utf8],
            templates_dir: None,
        }
    }
}

/// Per-field overrides, usually taken from the command line.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub uploads_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub encodings: Vec<Encoding>,
    pub templates_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<BuildConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: BuildConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse build config JSON {}", path.display()))?;
    Ok(config)
}

/// Load `path` if given (defaults otherwise), apply overrides, and validate.
pub fn resolve_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<BuildConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => BuildConfig::default(),
    };
    if let Some(dir) = overrides.uploads_dir {
        config.uploads_dir = dir;
    }
    if let Some(dir) = overrides.output_dir {
        config.output_dir = dir;
    }
    if !overrides.encodings.is_empty() {
        config.encodings = overrides.encodings;
    }
    if overrides.templates_dir.is_some() {
        config.templates_dir = overrides.templates_dir;
    }
    validate_config(&config)?;
    tracing::debug!(?config, "resolved build config");
    Ok(config)
}

pub fn validate_config(config: &BuildConfig) -> Result<()> {
    if config.encodings.is_empty() {
        return Err(anyhow!("encodings must list at least one encoding"));
    }
    if config.uploads_dir.as_os_str().is_empty() {
        return Err(anyhow!("uploads_dir must be non-empty"));
    }
    if config.output_dir.as_os_str().is_empty() {
        return Err(anyhow!("output_dir must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
