//! Filesystem helpers for materializing a generated tree.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

fn write_bytes(root: &Path, rel_path: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = root.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn write_text(root: &Path, rel_path: &str, text: &str) -> Result<PathBuf> {
    write_bytes(root, rel_path, text.as_bytes())
}

pub fn write_json<T: serde::Serialize>(root: &Path, rel_path: &str, value: &T) -> Result<PathBuf> {
    let bytes = serde_json::to_vec_pretty(value).context("serialize JSON")?;
    write_bytes(root, rel_path, &bytes)
}

/// Whether `rel_path` stays under its root: no `..`, root, or drive prefix.
pub fn is_contained(rel_path: &str) -> bool {
    Path::new(rel_path)
        .components()
        .all(|part| matches!(part, Component::Normal(_) | Component::CurDir))
}

pub fn ensure_dir(root: &Path, rel_path: &str) -> Result<PathBuf> {
    let path = root.join(rel_path);
    fs::create_dir_all(&path).with_context(|| format!("create {}", path.display()))?;
    Ok(path)
}

/// Every file under `root`, sorted, as `/`-separated paths relative to it.
pub fn list_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    collect_files_recursive(root, root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files_recursive(root: &Path, dir: &Path, files: &mut Vec<String>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(root, &path, files)?;
        } else if path.is_file() {
            let rel = path.strip_prefix(root).context("strip output prefix")?;
            let parts: Vec<_> = rel
                .components()
                .map(|part| part.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }
    Ok(())
}
