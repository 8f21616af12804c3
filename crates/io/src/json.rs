// JSON document load/save

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde_json::Value;

/// Read and parse a review document.
///
/// The root must be an object or an array; anything else is a parse
/// failure surfaced to the user.
pub fn load_document(path: &Path) -> Result<Value, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    let value: Value = serde_json::from_reader(reader).map_err(|e| e.to_string())?;
    if !value.is_object() && !value.is_array() {
        return Err("document root must be an object or an array".to_string());
    }
    Ok(value)
}

/// Write a document as pretty-printed JSON.
pub fn write_document(path: &Path, document: &Value) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, document).map_err(|e| e.to_string())?;
    Ok(())
}

/// Suggested name for an exported document: `validated_<stem>.json`.
pub fn export_file_name(original: &str) -> String {
    let stem = original
        .strip_suffix(".pdf")
        .or_else(|| original.strip_suffix(".json"))
        .unwrap_or(original);
    let stem = if stem.is_empty() { "export" } else { stem };
    format!("validated_{stem}.json")
}
