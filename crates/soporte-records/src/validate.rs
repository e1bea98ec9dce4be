//! Schema-driven record validation.
//!
//! Validates a record's field values against its collection definition:
//! unknown field names are rejected, required fields must be non-empty,
//! and each value must satisfy its field kind's constraints. All failures
//! for a record are collected into one [`ValidationError`] with per-field
//! entries.

use std::collections::HashMap;

use serde_json::{Map, Value};
use soporte_core::{SoporteError, SoporteResult, ValidationError};
use soporte_schema::{CollectionDef, FieldDef, FieldKind};

use crate::record::parse_datetime;

/// Validates `data` against `collection`'s schema.
///
/// The `id` key and autodate fields are the store's responsibility and
/// must already have been stripped from `data`.
///
/// # Errors
///
/// Returns [`SoporteError::Validation`] carrying per-field errors if any
/// value is rejected.
pub fn validate(collection: &CollectionDef, data: &Map<String, Value>) -> SoporteResult<()> {
    let mut field_errors: HashMap<String, Vec<ValidationError>> = HashMap::new();

    for (key, value) in data {
        match collection.field_by_name(key) {
            None => {
                field_errors.entry(key.clone()).or_default().push(
                    ValidationError::new(
                        format!("Collection '{}' has no field '{key}'", collection.name),
                        "unknown_field",
                    ),
                );
            }
            Some(field) => {
                if let Err(err) = check_value(field, value) {
                    field_errors.entry(key.clone()).or_default().push(err);
                }
            }
        }
    }

    for field in &collection.fields {
        if field.required && !field.system && !field.kind.is_autodate() {
            let value = data.get(&field.name);
            if value.map_or(true, is_empty) {
                field_errors
                    .entry(field.name.clone())
                    .or_default()
                    .push(ValidationError::new("This field is required.", "required"));
            }
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(SoporteError::Validation(ValidationError::with_field_errors(
            field_errors,
        )))
    }
}

/// Returns whether a value counts as unset for required-field purposes.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Checks one value against its field's constraints.
fn check_value(field: &FieldDef, value: &Value) -> Result<(), ValidationError> {
    // Unset optional values pass; the required check runs separately.
    if is_empty(value) {
        return Ok(());
    }

    match &field.kind {
        FieldKind::Text {
            min, max, pattern, ..
        } => {
            let Some(s) = value.as_str() else {
                return Err(ValidationError::new("Expected a string.", "invalid_type"));
            };
            let len = s.chars().count();
            if let Some(min) = min {
                if len < *min {
                    return Err(ValidationError::new(
                        format!("Must be at least {min} characters."),
                        "min_length",
                    ));
                }
            }
            if let Some(max) = max {
                if len > *max {
                    return Err(ValidationError::new(
                        format!("Must be at most {max} characters."),
                        "max_length",
                    ));
                }
            }
            if let Some(pattern) = pattern {
                let re = regex::Regex::new(pattern)
                    .map_err(|e| ValidationError::new(format!("Invalid pattern: {e}"), "pattern"))?;
                if !re.is_match(s) {
                    return Err(ValidationError::new(
                        format!("Does not match pattern {pattern}."),
                        "pattern",
                    ));
                }
            }
            Ok(())
        }
        FieldKind::Bool => value
            .as_bool()
            .map(|_| ())
            .ok_or_else(|| ValidationError::new("Expected a boolean.", "invalid_type")),
        FieldKind::Number { min, max, only_int } => {
            let Some(n) = value.as_f64() else {
                return Err(ValidationError::new("Expected a number.", "invalid_type"));
            };
            if *only_int && n.fract() != 0.0 {
                return Err(ValidationError::new("Expected an integer.", "not_integer"));
            }
            if let Some(min) = min {
                if n < *min {
                    return Err(ValidationError::new(
                        format!("Must be at least {min}."),
                        "min",
                    ));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(ValidationError::new(
                        format!("Must be at most {max}."),
                        "max",
                    ));
                }
            }
            Ok(())
        }
        FieldKind::Editor { max_size, .. } => {
            let Some(s) = value.as_str() else {
                return Err(ValidationError::new("Expected a string.", "invalid_type"));
            };
            if *max_size > 0 && s.len() > *max_size {
                return Err(ValidationError::new(
                    format!("Content exceeds {max_size} bytes."),
                    "max_size",
                ));
            }
            Ok(())
        }
        FieldKind::Date { min, max } => {
            let Some(s) = value.as_str() else {
                return Err(ValidationError::new("Expected a date string.", "invalid_type"));
            };
            let Some(parsed) = parse_datetime(s) else {
                return Err(ValidationError::new("Not a valid date.", "invalid_date"));
            };
            if let Some(min) = min.as_deref().and_then(parse_datetime) {
                if parsed < min {
                    return Err(ValidationError::new("Date is before the minimum.", "min"));
                }
            }
            if let Some(max) = max.as_deref().and_then(parse_datetime) {
                if parsed > max {
                    return Err(ValidationError::new("Date is after the maximum.", "max"));
                }
            }
            Ok(())
        }
        FieldKind::Select { max_select, values } => {
            let selected = selection_list(value)?;
            if selected.len() > *max_select {
                return Err(ValidationError::new(
                    format!("At most {max_select} option(s) allowed."),
                    "max_select",
                ));
            }
            for choice in &selected {
                if !values.iter().any(|v| v == choice) {
                    return Err(ValidationError::new(
                        format!("'{choice}' is not an allowed value."),
                        "invalid_choice",
                    ));
                }
            }
            Ok(())
        }
        FieldKind::Relation {
            min_select,
            max_select,
            ..
        } => {
            let ids = selection_list(value)?;
            if ids.len() > *max_select {
                return Err(ValidationError::new(
                    format!("At most {max_select} reference(s) allowed."),
                    "max_select",
                ));
            }
            if field.required && ids.len() < *min_select {
                return Err(ValidationError::new(
                    format!("At least {min_select} reference(s) required."),
                    "min_select",
                ));
            }
            Ok(())
        }
        FieldKind::Autodate { .. } => Err(ValidationError::new(
            "This field is maintained by the store.",
            "read_only",
        )),
    }
}

/// Normalizes a select/relation value to a list of strings.
fn selection_list(value: &Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(ToString::to_string)
                    .ok_or_else(|| ValidationError::new("Expected a string item.", "invalid_type"))
            })
            .collect(),
        _ => Err(ValidationError::new(
            "Expected a string or list of strings.",
            "invalid_type",
        )),
    }
}
