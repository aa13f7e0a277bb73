//! YAML loading for definition tables

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::LoadError;

use super::Table;

/// Read and parse one definition file into a table
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&text, path)
}

/// Parse YAML text into a table; `path` is only used for error reporting
pub fn parse_table(text: &str, path: &Path) -> Result<Table, LoadError> {
    if text.trim().is_empty() {
        return Ok(Table::new());
    }

    let value: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Null => Ok(Table::new()),
        Value::Mapping(mapping) => Ok(table_from_mapping(mapping, path)),
        other => Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
            found: value_kind(&other),
        }),
    }
}

fn table_from_mapping(mapping: Mapping, path: &Path) -> Table {
    let mut table = Table::with_capacity(mapping.len());
    for (key, value) in mapping {
        match key_text(&key) {
            Some(name) => {
                table.insert(name, value);
            }
            None => warn!(
                path = %path.display(),
                kind = value_kind(&key),
                "skipping definition with a non-scalar key"
            ),
        }
    }
    table
}

/// Textual form of a scalar mapping key
pub(crate) fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short description of a YAML value's shape, for diagnostics
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
