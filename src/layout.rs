//! Layout generation: map extracted specs onto output folders and files.
//!
//! Generation is pure apart from template rendering. Specs are processed in
//! input order and later specs win on path collisions.
use crate::error::RenderError;
use crate::spec::{Spec, SpecKind};
use crate::templates::{TemplateRenderer, CHART_TEMPLATE, STORE_LOGIC_TEMPLATE, STORE_TEMPLATE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

pub const UNKNOWN_MODULE: &str = "UnknownModule";
pub const CHARTS_DIR: &str = "charts";
pub const STORE_DIR: &str = "store";
pub const CUSTOM_HTML_DIR: &str = "custom_html";
pub const SCRIPTS_DIR: &str = "scripts";
/// Single upload slot shared by every template spec in a run.
pub const MANUAL_HTML_REL: &str = "custom_html/manual_upload.html";
/// Single upload slot shared by every code spec in a run.
pub const MANUAL_SCRIPT_REL: &str = "scripts/manual_upload.py";

pub const README_REL: &str = "README.txt";
const EMPTY_README: &str = "No specs found.\nAdd files to uploads/ and re-run.";

/// Folders to ensure and files to write for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// May contain duplicates; one entry per spec that maps into a folder.
    pub folders: Vec<String>,
    pub files: BTreeMap<String, String>,
}

impl Layout {
    /// Layout written when no uploads produced a spec.
    pub fn empty_fallback() -> Self {
        let mut files = BTreeMap::new();
        files.insert(README_REL.to_string(), EMPTY_README.to_string());
        Self {
            folders: Vec::new(),
            files,
        }
    }

    fn put(&mut self, rel: String, content: String) {
        if self.files.insert(rel.clone(), content).is_some() {
            tracing::warn!(path = %rel, "overwriting earlier output at the same path");
        }
    }
}

/// Map specs to a layout, rendering chart and store pages with `renderer`.
pub fn generate(specs: &[Spec], renderer: &dyn TemplateRenderer) -> Result<Layout, RenderError> {
    let mut layout = Layout::default();
    for spec in specs {
        match spec.kind {
            SpecKind::Text => add_text_spec(&mut layout, spec, renderer)?,
            SpecKind::Template => {
                layout.folders.push(CUSTOM_HTML_DIR.to_string());
                layout.put(MANUAL_HTML_REL.to_string(), spec.raw.clone());
            }
            SpecKind::Code => {
                layout.folders.push(SCRIPTS_DIR.to_string());
                layout.put(MANUAL_SCRIPT_REL.to_string(), spec.raw.clone());
            }
            SpecKind::Unknown => {}
        }
    }
    Ok(layout)
}

fn add_text_spec(
    layout: &mut Layout,
    spec: &Spec,
    renderer: &dyn TemplateRenderer,
) -> Result<(), RenderError> {
    let module = spec.module.as_deref().unwrap_or(UNKNOWN_MODULE);

    // A spec with both pairs and intents only produces chart output.
    if !spec.pairs.is_empty() {
        layout.folders.push(CHARTS_DIR.to_string());
        let context = json!({
            "title": format!("{module} Chart"),
            "pairs": spec.pairs,
        });
        let html = renderer.render(CHART_TEMPLATE, &context)?;
        layout.put(format!("{CHARTS_DIR}/{module}_chart.html"), html);
        layout.put(
            format!("{CHARTS_DIR}/{module}_spec.txt"),
            chart_summary(module, &spec.pairs),
        );
    } else if !spec.intents.is_empty() {
        layout.folders.push(STORE_DIR.to_string());
        let context = json!({
            "store_name": module,
            "assignments": spec.intents,
        });
        let html = renderer.render(STORE_TEMPLATE, &context)?;
        let logic = renderer.render(STORE_LOGIC_TEMPLATE, &context)?;
        layout.put(format!("{STORE_DIR}/{module}_store.html"), html);
        layout.put(format!("{STORE_DIR}/{module}_logic.py"), logic);
        layout.put(format!("{STORE_DIR}/{module}_spec.txt"), store_summary(module, spec));
    }
    Ok(())
}

fn chart_summary(module: &str, pairs: &[(String, f64)]) -> String {
    let mut lines = vec![format!("{module} chart data:")];
    lines.extend(
        pairs
            .iter()
            .map(|(label, value)| format!("{label}: {}", format_number(*value))),
    );
    lines.join("\n")
}

fn store_summary(module: &str, spec: &Spec) -> String {
    let mut lines = vec![format!("{module} bot assignments:")];
    lines.extend(
        spec.intents
            .iter()
            .map(|intent| format!("{} → {}: {} credits", intent.user, intent.bot, intent.credits)),
    );
    lines.join("\n")
}

/// Shortest round-trip form; integral values keep a trailing `.0` and very
/// large or small magnitudes use a signed two-digit exponent (`1e+20`).
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        return value.to_string();
    }
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{value:e}");
        if let Some((mantissa, exponent)) = sci.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{mantissa}e{sign}{:02}", exponent.abs());
            }
        }
        return sci;
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
