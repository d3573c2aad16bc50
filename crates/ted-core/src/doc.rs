//! Document plumbing around the engine: format detection, load/save, and
//! backup copies. The engine itself never touches disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::EditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Yaml,
    Json,
}

/// Sniff the format from the first non-whitespace character.
pub fn detect_format(text: &str) -> DocFormat {
    match text.chars().find(|c| !c.is_whitespace()) {
        Some('{') | Some('[') => DocFormat::Json,
        _ => DocFormat::Yaml,
    }
}

fn format_for_extension(path: &Path) -> DocFormat {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => DocFormat::Json,
        _ => DocFormat::Yaml,
    }
}

pub fn parse_document(text: &str) -> Result<(Value, DocFormat), EditError> {
    let format = detect_format(text);
    let value = match format {
        DocFormat::Json => {
            serde_json::from_str(text).map_err(|e| EditError::InvalidDocument(e.to_string()))?
        }
        DocFormat::Yaml => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                serde_yaml::from_str(text).map_err(|e| EditError::InvalidDocument(e.to_string()))?
            }
        }
    };
    Ok((value, format))
}

pub fn load_document(path: &Path) -> Result<(Value, DocFormat), EditError> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

/// Load a document, or start from an empty mapping when the file is missing
/// or blank. The returned flag reports whether a backing document existed,
/// which gates first-time materialization.
pub fn load_or_empty(path: &Path) -> Result<(Value, DocFormat, bool), EditError> {
    if !path.exists() {
        return Ok((Value::Object(Map::new()), format_for_extension(path), false));
    }
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok((Value::Object(Map::new()), format_for_extension(path), true));
    }
    let (value, format) = parse_document(&text)?;
    Ok((value, format, true))
}

pub fn render_document(value: &Value, format: DocFormat) -> Result<String, EditError> {
    match format {
        DocFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| EditError::InvalidDocument(e.to_string())),
        DocFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| EditError::InvalidDocument(e.to_string()))
        }
    }
}

/// Write to a sibling tmp file, then rename over the original.
pub fn save_document(path: &Path, value: &Value, format: DocFormat) -> Result<(), EditError> {
    let text = render_document(value, format)?;
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Copy `path` to a timestamped `.orig` sibling and return the copy's path.
pub fn backup_file(path: &Path) -> Result<PathBuf, EditError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{name}.{ts}.orig"));
    fs::copy(path, &dest)?;
    Ok(dest)
}
