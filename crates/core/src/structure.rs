//! Structural checks over the untyped YAML document.
//!
//! These look at layout the typed model does not preserve: whether optional keys were written
//! at all, and what kind of YAML value sits under each key.

use crate::report::Finding;
use crate::{CoreError, CoreResult};
use dataconfig::is_blank_document;
use dataconfig::template::ENTRY_KEYS;
use serde_yaml::{Mapping, Value};

/// Optional entry-level key accepted next to [`ENTRY_KEYS`].
const SCAN_PARAMETERS_KEY: &str = "scan_parameters";
const SCAN_KEY: &str = "scan";
const CREDS_PATH_KEY: &str = "creds_path";

/// Check that a document has the layout of the data-configuration template.
///
/// # Errors
///
/// Returns [`CoreError::YamlDeserialization`] if the text is not YAML at all. Layout problems
/// are reported as findings.
pub fn check_structure(text: &str) -> CoreResult<Vec<Finding>> {
    let document: Value = if is_blank_document(text) {
        Value::Null
    } else {
        serde_yaml::from_str(text).map_err(CoreError::YamlDeserialization)?
    };

    let items = match document {
        Value::Null => return Ok(vec![Finding::warning(None, "document has no entries")]),
        Value::Sequence(items) => items,
        other => {
            return Ok(vec![Finding::error(
                None,
                format!(
                    "document must be a sequence of entries, found {}",
                    value_kind(&other)
                ),
            )])
        }
    };

    let mut findings = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Mapping(mapping) => check_entry(index, mapping, &mut findings),
            other => findings.push(Finding::error(
                Some(index),
                format!("entry must be a mapping, found {}", value_kind(other)),
            )),
        }
    }

    Ok(findings)
}

fn check_entry(index: usize, mapping: &Mapping, findings: &mut Vec<Finding>) {
    let entry = Some(index);

    for key in ENTRY_KEYS {
        if mapping.contains_key(key) {
            continue;
        }
        if key == CREDS_PATH_KEY {
            findings.push(Finding::warning(entry, "missing key 'creds_path'"));
        } else {
            findings.push(Finding::error(entry, format!("missing key '{key}'")));
        }
    }

    for key in mapping.keys() {
        match key.as_str() {
            Some(k) if ENTRY_KEYS.contains(&k) || k == SCAN_PARAMETERS_KEY => {}
            Some(k) => findings.push(Finding::error(entry, format!("unexpected key '{k}'"))),
            None => findings.push(Finding::error(
                entry,
                format!("keys must be strings, found {}", value_kind(key)),
            )),
        }
    }

    match mapping.get("func") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(func)) => {
            for (label, value) in func {
                let label = label.as_str().unwrap_or("<non-string label>");
                check_func_value(index, label, value, findings);
            }
        }
        Some(other) => findings.push(Finding::error(
            entry,
            format!("'func' must be a mapping, found {}", value_kind(other)),
        )),
    }
}

fn check_func_value(index: usize, label: &str, value: &Value, findings: &mut Vec<Finding>) {
    let entry = Some(index);
    match value {
        Value::String(s) if !s.trim().is_empty() => {}
        Value::String(_) => findings.push(Finding::error(
            entry,
            format!("func.{label} is an empty string"),
        )),
        Value::Mapping(detail) => {
            if !detail.contains_key(SCAN_KEY) {
                findings.push(Finding::error(
                    entry,
                    format!("func.{label} has no '{SCAN_KEY}' location"),
                ));
            }
            for (key, inner) in detail {
                let key = key.as_str().unwrap_or("<non-string key>");
                if key == SCAN_PARAMETERS_KEY && (inner.is_mapping() || inner.is_null()) {
                    continue;
                }
                match inner {
                    Value::String(s) if !s.trim().is_empty() => {}
                    other => findings.push(Finding::error(
                        entry,
                        format!(
                            "func.{label}.{key} must be a non-empty string, found {}",
                            value_kind(other)
                        ),
                    )),
                }
            }
        }
        other => findings.push(Finding::error(
            entry,
            format!(
                "func.{label} must be a non-empty string, found {}",
                value_kind(other)
            ),
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(s) if s.trim().is_empty() => "an empty string",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
