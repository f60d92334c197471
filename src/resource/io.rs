use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Read a file as UTF-8 text. Missing, unreadable and empty files are `None`.
pub fn read_text(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.is_empty() => Some(content),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "resource file not readable");
            None
        }
    }
}

/// Read and parse a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("failed to parse {:?}", path))?;
    Ok(value)
}

/// Names of the immediate subdirectories of `dir`, sorted.
pub fn subdirectories(dir: &Path) -> BTreeSet<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return BTreeSet::new(),
    };

    entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect()
}

/// Stems of the `.json` files directly inside `dir`.
pub fn json_stems(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .filter_map(|path| path.file_stem().and_then(|n| n.to_str()).map(str::to_string))
        .collect()
}
