//! The record type.
//!
//! A [`Record`] is one row of a collection: a stable id, the owning
//! collection's id, and a flat JSON object of field values keyed by field
//! *name*. Relation expansion attaches the referenced records under a
//! separate `expand` object so the flat values stay untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record id.
    pub id: String,
    /// The owning collection's id.
    #[serde(rename = "collectionId")]
    pub collection_id: String,
    /// Field values keyed by field name.
    #[serde(flatten)]
    pub data: Map<String, Value>,
    /// Expanded relation targets, keyed by relation field name.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub expand: Map<String, Value>,
}

impl Record {
    /// Creates a record with the given id and data.
    pub fn new(id: impl Into<String>, collection_id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            collection_id: collection_id.into(),
            data,
            expand: Map::new(),
        }
    }

    /// Returns the value of a field, if set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Returns a field's value as a string slice, if it is one.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Returns a field's value as a list of id strings.
    ///
    /// Single-relation values (a plain string) come back as a one-element
    /// list; empty strings and nulls as an empty list.
    pub fn get_id_list(&self, field: &str) -> Vec<String> {
        match self.data.get(field) {
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Sets a field value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.data.insert(field.into(), value);
    }
}

/// Parses a stored date value.
///
/// Accepts RFC 3339, the platform's `YYYY-MM-DD HH:MM:SS[.fff]Z` form, and
/// a bare `YYYY-MM-DD` date (taken as midnight UTC).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.fZ") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Formats a timestamp the way autodate fields store it.
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        let mut data = Map::new();
        data.insert("status".into(), json!(true));
        data.insert("asunto".into(), json!("soporte técnico"));
        data.insert("tecnicos_asociados".into(), json!(["abc", "def"]));
        Record::new("rec1", "pbc_1119805642", data)
    }

    #[test]
    fn test_get_helpers() {
        let r = sample();
        assert_eq!(r.get_str("asunto"), Some("soporte técnico"));
        assert_eq!(r.get("status"), Some(&json!(true)));
        assert_eq!(r.get_id_list("tecnicos_asociados"), vec!["abc", "def"]);
        assert!(r.get_id_list("missing").is_empty());
    }

    #[test]
    fn test_get_id_list_single_string() {
        let mut r = sample();
        r.set("departamento", json!("dep1"));
        assert_eq!(r.get_id_list("departamento"), vec!["dep1"]);
        r.set("departamento", json!(""));
        assert!(r.get_id_list("departamento").is_empty());
    }

    #[test]
    fn test_serde_flattens_data() {
        let r = sample();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["id"], "rec1");
        assert_eq!(json["collectionId"], "pbc_1119805642");
        assert_eq!(json["asunto"], "soporte técnico");
        assert!(json.get("expand").is_none());

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2026-01-15T10:30:00Z").is_some());
        assert!(parse_datetime("2026-01-15 10:30:00.123Z").is_some());
        assert!(parse_datetime("2026-01-15").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_format_parse_round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(now)).unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }
}
