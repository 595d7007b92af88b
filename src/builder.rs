//! Build orchestration: collect uploads, generate the layout, materialize it.
//!
//! A build never fails outright. Per-upload and per-file problems are logged
//! and recorded; only failures in the top-level steps (output root, layout
//! generation) turn the outcome into an error map.
use crate::error::SkipReason;
use crate::extract::{Encoding, SpecExtractor};
use crate::layout::{self, Layout};
use crate::output::{ensure_dir, is_contained, write_json, write_text};
use crate::spec::{DeclaredKind, Spec};
use crate::templates::{TemplateRenderer, FALLBACK_INDEX_HTML, INDEX_TEMPLATE};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const INDEX_REL: &str = "index.html";
pub const LAYOUT_REL: &str = "layout.json";

/// Result of extracting one upload.
#[derive(Debug)]
pub enum UploadOutcome {
    Extracted(Spec),
    Skipped(SkipReason),
}

/// An upload that did not produce a spec, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedUpload {
    pub path: String,
    pub reason: String,
}

/// Report of a completed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub uploads: PathBuf,
    pub output: PathBuf,
    /// Layout paths written, relative to the output root.
    pub files_written: Vec<String>,
    /// Layout folders created, in layout order.
    pub folders_created: Vec<String>,
    pub skipped: Vec<SkippedUpload>,
}

/// What a build hands back to its caller: a summary or an error map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BuildOutcome {
    Summary(Summary),
    Error { error: String },
}

impl BuildOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, BuildOutcome::Error { .. })
    }
}

/// Drives one build from an uploads directory to an output directory.
pub struct Builder<'a> {
    renderer: &'a dyn TemplateRenderer,
    encodings: Vec<Encoding>,
    extractor: SpecExtractor,
}

impl<'a> Builder<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, encodings: Vec<Encoding>) -> Self {
        Self {
            renderer,
            encodings,
            extractor: SpecExtractor::new(),
        }
    }

    /// Run a full build. Always returns an outcome.
    pub fn run(&self, uploads_dir: &Path, output_dir: &Path) -> BuildOutcome {
        match self.try_run(uploads_dir, output_dir) {
            Ok(summary) => {
                info!(
                    files = summary.files_written.len(),
                    folders = summary.folders_created.len(),
                    skipped = summary.skipped.len(),
                    output = %summary.output.display(),
                    "build complete"
                );
                BuildOutcome::Summary(summary)
            }
            Err(err) => {
                error!(error = ?err, "build failed");
                BuildOutcome::Error {
                    error: format!("{err:#}"),
                }
            }
        }
    }

    fn try_run(&self, uploads_dir: &Path, output_dir: &Path) -> Result<Summary> {
        let outcomes = self.collect(uploads_dir)?;
        let mut specs = Vec::new();
        let mut skipped = Vec::new();
        for (path, outcome) in outcomes {
            match outcome {
                UploadOutcome::Extracted(spec) => specs.push(spec),
                UploadOutcome::Skipped(reason) => skipped.push(SkippedUpload {
                    path: path.display().to_string(),
                    reason: reason.to_string(),
                }),
            }
        }

        let layout = if specs.is_empty() {
            info!("no specs found; writing placeholder README");
            Layout::empty_fallback()
        } else {
            layout::generate(&specs, self.renderer).context("generate layout")?
        };

        let (files_written, folders_created) = self.materialize(&layout, output_dir)?;

        Ok(Summary {
            uploads: absolute(uploads_dir)?,
            output: absolute(output_dir)?,
            files_written,
            folders_created,
            skipped,
        })
    }

    /// Extract every upload in `uploads_dir`, sorted by file name.
    ///
    /// A missing directory is created and yields no uploads.
    pub fn collect(&self, uploads_dir: &Path) -> Result<Vec<(PathBuf, UploadOutcome)>> {
        if !uploads_dir.exists() {
            warn!(path = %uploads_dir.display(), "upload directory not found; creating it");
            fs::create_dir_all(uploads_dir)
                .with_context(|| format!("create {}", uploads_dir.display()))?;
            return Ok(Vec::new());
        }

        let mut entries: Vec<_> = fs::read_dir(uploads_dir)
            .with_context(|| format!("read {}", uploads_dir.display()))?
            .collect::<std::io::Result<_>>()
            .with_context(|| format!("list {}", uploads_dir.display()))?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut outcomes = Vec::new();
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                debug!(path = %path.display(), "skipping non-file upload entry");
                continue;
            }
            let outcome = self.extract_upload(&path);
            outcomes.push((path, outcome));
        }
        Ok(outcomes)
    }

    fn extract_upload(&self, path: &Path) -> UploadOutcome {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let Some(kind) = DeclaredKind::from_extension(ext) else {
            info!(path = %path.display(), "skipping unsupported upload");
            return UploadOutcome::Skipped(SkipReason::UnsupportedKind(ext.to_string()));
        };
        match self.extractor.extract(path, &kind, &self.encodings) {
            Ok(spec) => {
                debug!(path = %path.display(), %kind, "extracted spec");
                UploadOutcome::Extracted(spec)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to extract upload");
                UploadOutcome::Skipped(SkipReason::Extract(err))
            }
        }
    }

    /// Write `layout` under `output_dir`, plus the entry page and snapshot.
    ///
    /// Returns the files and folders that were written successfully.
    fn materialize(&self, layout: &Layout, output_dir: &Path) -> Result<(Vec<String>, Vec<String>)> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("create output dir {}", output_dir.display()))?;

        let mut folders_created = Vec::new();
        for folder in &layout.folders {
            if !is_contained(folder) {
                error!(folder = %folder, "refusing folder outside the output dir");
                continue;
            }
            match ensure_dir(output_dir, folder) {
                Ok(_) => folders_created.push(folder.clone()),
                Err(err) => error!(folder = %folder, error = ?err, "failed to create folder"),
            }
        }

        let mut files_written = Vec::new();
        for (rel, content) in &layout.files {
            if !is_contained(rel) {
                error!(path = %rel, "refusing to write outside the output dir");
                continue;
            }
            match write_text(output_dir, rel, content) {
                Ok(_) => files_written.push(rel.clone()),
                Err(err) => error!(path = %rel, error = ?err, "failed to write file"),
            }
        }

        self.write_index(layout, output_dir);

        if let Err(err) = write_json(output_dir, LAYOUT_REL, layout) {
            error!(error = ?err, "failed to write layout snapshot");
        }

        Ok((files_written, folders_created))
    }

    fn write_index(&self, layout: &Layout, output_dir: &Path) {
        if self.renderer.has_template(INDEX_TEMPLATE) {
            let rendered = serde_json::to_value(layout)
                .context("serialize layout for index")
                .and_then(|context| {
                    self.renderer
                        .render(INDEX_TEMPLATE, &context)
                        .context("render index template")
                })
                .and_then(|html| write_text(output_dir, INDEX_REL, &html));
            if let Err(err) = rendered {
                error!(error = ?err, "failed to write custom index page");
            }
        } else if !output_dir.join(INDEX_REL).exists() {
            if let Err(err) = write_text(output_dir, INDEX_REL, FALLBACK_INDEX_HTML) {
                error!(error = ?err, "failed to write fallback index page");
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolve {}", path.display()))
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
