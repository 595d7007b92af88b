//! Template rendering for generated pages.
//!
//! Templates substitute `{{ path }}` (HTML-escaped text) and
//! `{{ path | json }}` (JSON with `<`, `>` and `&` escaped, safe inside a
//! script block and as a Python literal). Lists are rendered client-side from
//! the embedded JSON.
use crate::error::RenderError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const CHART_TEMPLATE: &str = "chart.html";
pub const STORE_TEMPLATE: &str = "store.html";
pub const STORE_LOGIC_TEMPLATE: &str = "store_logic.py";
/// Optional template rendered with the full layout as `index.html`.
pub const INDEX_TEMPLATE: &str = "index.html";

pub const CHART_HTML: &str = include_str!("../templates/chart.html");
pub const STORE_HTML: &str = include_str!("../templates/store.html");
pub const STORE_LOGIC_PY: &str = include_str!("../templates/store_logic.py");
/// Static entry page that loads `layout.json` in the browser.
pub const FALLBACK_INDEX_HTML: &str = include_str!("../templates/fallback_index.html");

/// Renders named templates against a JSON context.
pub trait TemplateRenderer {
    fn has_template(&self, name: &str) -> bool;

    fn render(&self, name: &str, context: &Value) -> Result<String, RenderError>;
}

/// Named template sources: the built-in set plus any directory overrides.
#[derive(Debug, Clone)]
pub struct Templates {
    sources: BTreeMap<String, String>,
}

impl Templates {
    /// Chart, store, and store-logic templates. No index template.
    pub fn builtin() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(CHART_TEMPLATE.to_string(), CHART_HTML.to_string());
        sources.insert(STORE_TEMPLATE.to_string(), STORE_HTML.to_string());
        sources.insert(STORE_LOGIC_TEMPLATE.to_string(), STORE_LOGIC_PY.to_string());
        Self { sources }
    }

    /// Built-in templates with every file in `dir` added or replacing the
    /// template of the same file name.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut templates = Self::builtin();
        let mut entries: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("read templates dir {}", dir.display()))?
            .collect::<std::io::Result<_>>()
            .with_context(|| format!("list templates dir {}", dir.display()))?;
        entries.sort_by_key(|entry| entry.file_name());
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path)
                .with_context(|| format!("read template {}", path.display()))?;
            tracing::debug!(template = name, path = %path.display(), "loaded template override");
            templates.insert(name, source);
        }
        Ok(templates)
    }

    pub fn insert(&mut self, name: &str, source: String) {
        self.sources.insert(name.to_string(), source);
    }
}

impl TemplateRenderer for Templates {
    fn has_template(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    fn render(&self, name: &str, context: &Value) -> Result<String, RenderError> {
        let source = self
            .sources
            .get(name)
            .ok_or_else(|| RenderError::UnknownTemplate(name.to_string()))?;
        render_source(name, source, context)
    }
}

fn render_source(name: &str, source: &str, context: &Value) -> Result<String, RenderError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut consumed = 0;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| RenderError::Unclosed {
            template: name.to_string(),
            offset: consumed + start,
        })?;
        out.push_str(&render_expression(name, &after[..end], context)?);
        let advance = start + 2 + end + 2;
        consumed += advance;
        rest = &rest[advance..];
    }
    out.push_str(rest);
    Ok(out)
}

fn render_expression(name: &str, expr: &str, context: &Value) -> Result<String, RenderError> {
    let (path, filter) = match expr.split_once('|') {
        Some((path, filter)) => (path.trim(), Some(filter.trim())),
        None => (expr.trim(), None),
    };
    let value = lookup(context, path).ok_or_else(|| RenderError::MissingKey {
        template: name.to_string(),
        key: path.to_string(),
    })?;
    match filter {
        None => Ok(escape_html(&value_text(value)?)),
        Some("json") => Ok(script_safe_json(value)?),
        Some(other) => Err(RenderError::UnknownFilter {
            template: name.to_string(),
            filter: other.to_string(),
        }),
    }
}

fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(context, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

fn value_text(value: &Value) -> Result<String, RenderError> {
    Ok(match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value)?,
    })
}

fn script_safe_json(value: &Value) -> Result<String, RenderError> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
