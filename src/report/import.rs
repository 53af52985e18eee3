use crate::report::model::ImportedReport;
use serde_json::{Map, Value};
use std::fmt;

/// One field that failed the report shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// e.g. `readings[2].beforeSamples[0]`; empty for the document root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("file is not a valid report: {}", join_issues(.0))]
    InvalidReport(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

const METADATA_FIELDS: [&str; 6] = [
    "make",
    "model",
    "serialNumber",
    "customerName",
    "serviceDate",
    "createdTimestamp",
];
const LIVE_DATA_MODES: [&str; 1] = ["reveni"];

/// Parse an exported report file. The store is not touched; the caller
/// decides what to do with either error kind.
pub fn parse_report(text: &str) -> Result<ImportedReport, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let issues = validate_report(&value);
    if !issues.is_empty() {
        tracing::warn!("parse_report: {} shape issue(s)", issues.len());
        return Err(ImportError::InvalidReport(issues));
    }
    serde_json::from_value(value).map_err(|e| {
        ImportError::InvalidReport(vec![ValidationIssue {
            path: String::new(),
            message: e.to_string(),
        }])
    })
}

/// Every shape problem in a parsed report document; empty when it is valid.
pub fn validate_report(value: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(root) = value.as_object() else {
        push(&mut issues, "", "expected object");
        return issues;
    };

    match root.get("metadata") {
        Some(Value::Object(metadata)) => check_metadata(metadata, &mut issues),
        Some(_) => push(&mut issues, "metadata", "expected object"),
        None => push(&mut issues, "metadata", "required"),
    }

    match root.get("readings") {
        Some(Value::Array(readings)) => {
            for (index, reading) in readings.iter().enumerate() {
                check_reading(reading, &format!("readings[{}]", index), &mut issues);
            }
        }
        Some(_) => push(&mut issues, "readings", "expected array"),
        None => push(&mut issues, "readings", "required"),
    }

    if let Some(actions) = root.get("actions") {
        match actions {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        push(&mut issues, &format!("actions[{}]", index), "expected string");
                    }
                }
            }
            _ => push(&mut issues, "actions", "expected array"),
        }
    }
    optional(root, "notes", "", Value::is_string, "expected string", &mut issues);
    optional(root, "showBeforeColumn", "", Value::is_boolean, "expected boolean", &mut issues);
    optional(
        root,
        "showMultipleMeasurements",
        "",
        Value::is_boolean,
        "expected boolean",
        &mut issues,
    );
    optional(root, "exportedAt", "", Value::is_string, "expected string", &mut issues);
    issues
}

fn check_metadata(metadata: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    for field in METADATA_FIELDS {
        let path = format!("metadata.{}", field);
        match metadata.get(field) {
            Some(Value::String(_)) => {}
            Some(_) => push(issues, &path, "expected string"),
            None => push(issues, &path, "required"),
        }
    }
    if let Some(mode) = metadata.get("liveDataMode") {
        let known = mode.as_str().is_some_and(|m| LIVE_DATA_MODES.contains(&m));
        if !known {
            push(issues, "metadata.liveDataMode", "unknown live data mode");
        }
    }
}

fn check_reading(reading: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = reading.as_object() else {
        push(issues, path, "expected object");
        return;
    };
    for field in ["id", "expectedTime"] {
        let field_path = format!("{}.{}", path, field);
        match obj.get(field) {
            Some(Value::String(_)) => {}
            Some(_) => push(issues, &field_path, "expected string"),
            None => push(issues, &field_path, "required"),
        }
    }
    for field in ["beforeMs", "measuredMs"] {
        optional(
            obj,
            field,
            path,
            |v| v.is_number() || v.is_null(),
            "expected number or null",
            issues,
        );
    }
    for field in ["beforeSamples", "measurementSamples"] {
        let field_path = format!("{}.{}", path, field);
        match obj.get(field) {
            None => {}
            Some(Value::Array(samples)) => {
                for (index, sample) in samples.iter().enumerate() {
                    if !sample.is_number() {
                        push(issues, &format!("{}[{}]", field_path, index), "expected number");
                    }
                }
            }
            Some(_) => push(issues, &field_path, "expected array"),
        }
    }
}

fn optional(
    obj: &Map<String, Value>,
    field: &str,
    parent: &str,
    accepts: impl Fn(&Value) -> bool,
    message: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(value) = obj.get(field) {
        if !accepts(value) {
            let path = if parent.is_empty() {
                field.to_string()
            } else {
                format!("{}.{}", parent, field)
            };
            push(issues, &path, message);
        }
    }
}

fn push(issues: &mut Vec<ValidationIssue>, path: &str, message: &str) {
    issues.push(ValidationIssue {
        path: path.to_string(),
        message: message.to_string(),
    });
}
