//! The record store.
//!
//! CRUD over records of the live schema. Every write validates against
//! the owning collection's current definition; list supports the client's
//! sort syntax (comma-separated field names, `-` prefix for descending)
//! and relation expansion (comma-separated relation field names).
//!
//! Records live in memory, grouped by collection id in insertion order.
//! The schema store is passed into each call so the record store always
//! sees the schema as migrations last left it.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};
use soporte_core::{SoporteError, SoporteResult, ValidationError};
use soporte_schema::{CollectionDef, FieldKind, SchemaStore};

use crate::record::{format_datetime, Record};
use crate::validate;

/// Options for [`RecordStore::list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Sort spec: comma-separated field names, `-` prefix for descending
    /// (e.g. `"-created"`).
    pub sort: Option<String>,
    /// Expand spec: comma-separated relation field names
    /// (e.g. `"departamento,tecnicos_asociados"`).
    pub expand: Option<String>,
}

impl ListOptions {
    /// Creates empty options (insertion order, no expansion).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort spec.
    #[must_use]
    pub fn sort(mut self, spec: impl Into<String>) -> Self {
        self.sort = Some(spec.into());
        self
    }

    /// Sets the expand spec.
    #[must_use]
    pub fn expand(mut self, spec: impl Into<String>) -> Self {
        self.expand = Some(spec.into());
        self
    }
}

/// In-memory record storage for all collections.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    /// Records grouped by collection id, in insertion order.
    records: HashMap<String, Vec<Record>>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Returns the number of records in a collection (by id).
    pub fn count(&self, collection_id: &str) -> usize {
        self.records.get(collection_id).map_or(0, Vec::len)
    }

    /// Creates a record in `collection` (id or name) from `data`.
    ///
    /// The `id` key may be supplied; otherwise one is generated from the
    /// id field's autogenerate pattern. Autodate keys in `data` are
    /// ignored — the store stamps them itself.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::Validation`] if the data violates the
    /// schema or references missing relation targets.
    pub fn create(
        &mut self,
        schema: &dyn SchemaStore,
        collection: &str,
        mut data: Map<String, Value>,
    ) -> SoporteResult<Record> {
        let def = schema.collection(collection)?;

        let supplied_id = data
            .remove("id")
            .and_then(|v| v.as_str().map(ToString::to_string))
            .filter(|s| !s.is_empty());
        strip_autodates(&def, &mut data);
        validate::validate(&def, &data)?;
        self.check_relation_targets(&def, &data)?;

        let id = supplied_id.unwrap_or_else(|| autogenerate_id(&def));
        if self.find(&def.id, &id).is_some() {
            return Err(SoporteError::Validation(ValidationError::new(
                format!("A record with id '{id}' already exists."),
                "id_exists",
            )));
        }

        let now = format_datetime(Utc::now());
        for field in &def.fields {
            if let FieldKind::Autodate { on_create: true, .. } = field.kind {
                data.insert(field.name.clone(), Value::String(now.clone()));
            }
        }

        let record = Record::new(id, &def.id, data);
        tracing::debug!(collection = %def.name, id = %record.id, "record created");
        self.records
            .entry(def.id.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    /// Returns the record with `id` from `collection` (id or name).
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::RecordNotFound`] if no record matches.
    pub fn get(
        &self,
        schema: &dyn SchemaStore,
        collection: &str,
        id: &str,
    ) -> SoporteResult<Record> {
        let def = schema.collection(collection)?;
        self.find(&def.id, id)
            .cloned()
            .ok_or_else(|| SoporteError::RecordNotFound(id.to_string()))
    }

    /// Merges `patch` into the record with `id` and revalidates.
    ///
    /// The record id is immutable: an `id` key in the patch is ignored,
    /// as are autodate keys (`updated`-style fields restamp themselves).
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::RecordNotFound`] if no record matches, or
    /// [`SoporteError::Validation`] if the merged data is invalid.
    pub fn update(
        &mut self,
        schema: &dyn SchemaStore,
        collection: &str,
        id: &str,
        mut patch: Map<String, Value>,
    ) -> SoporteResult<Record> {
        let def = schema.collection(collection)?;
        let position = self
            .position(&def.id, id)
            .ok_or_else(|| SoporteError::RecordNotFound(id.to_string()))?;

        patch.remove("id");
        strip_autodates(&def, &mut patch);

        let mut merged = self.records[&def.id][position].data.clone();
        for (key, value) in patch {
            merged.insert(key, value);
        }

        let mut validation_view = merged.clone();
        strip_autodates(&def, &mut validation_view);
        validate::validate(&def, &validation_view)?;
        self.check_relation_targets(&def, &validation_view)?;

        let now = format_datetime(Utc::now());
        for field in &def.fields {
            if let FieldKind::Autodate { on_update: true, .. } = field.kind {
                merged.insert(field.name.clone(), Value::String(now.clone()));
            }
        }

        let Some(records) = self.records.get_mut(&def.id) else {
            return Err(SoporteError::RecordNotFound(id.to_string()));
        };
        records[position].data = merged;
        Ok(records[position].clone())
    }

    /// Deletes the record with `id` from `collection` (id or name).
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::RecordNotFound`] if no record matches.
    pub fn delete(
        &mut self,
        schema: &dyn SchemaStore,
        collection: &str,
        id: &str,
    ) -> SoporteResult<()> {
        let def = schema.collection(collection)?;
        let position = self
            .position(&def.id, id)
            .ok_or_else(|| SoporteError::RecordNotFound(id.to_string()))?;
        if let Some(records) = self.records.get_mut(&def.id) {
            records.remove(position);
        }
        Ok(())
    }

    /// Returns all records of `collection` (id or name), sorted and
    /// expanded per `options`.
    pub fn list(
        &self,
        schema: &dyn SchemaStore,
        collection: &str,
        options: &ListOptions,
    ) -> SoporteResult<Vec<Record>> {
        let def = schema.collection(collection)?;
        let mut records = self.records.get(&def.id).cloned().unwrap_or_default();

        if let Some(spec) = options.sort.as_deref() {
            let keys = parse_sort(spec);
            records.sort_by(|a, b| {
                for (field, descending) in &keys {
                    let ordering = compare_field(a, b, field);
                    let ordering = if *descending { ordering.reverse() } else { ordering };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(spec) = options.expand.as_deref() {
            for record in &mut records {
                self.expand_record(&def, record, spec);
            }
        }

        Ok(records)
    }

    fn find(&self, collection_id: &str, id: &str) -> Option<&Record> {
        self.records
            .get(collection_id)
            .and_then(|records| records.iter().find(|r| r.id == id))
    }

    fn position(&self, collection_id: &str, id: &str) -> Option<usize> {
        self.records
            .get(collection_id)
            .and_then(|records| records.iter().position(|r| r.id == id))
    }

    /// Verifies every relation value references an existing record.
    fn check_relation_targets(
        &self,
        def: &CollectionDef,
        data: &Map<String, Value>,
    ) -> SoporteResult<()> {
        for field in &def.fields {
            let FieldKind::Relation { collection_id, .. } = &field.kind else {
                continue;
            };
            let Some(value) = data.get(&field.name) else {
                continue;
            };
            let ids = match value {
                Value::String(s) if !s.is_empty() => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            for id in ids {
                if self.find(collection_id, &id).is_none() {
                    return Err(SoporteError::Validation(ValidationError::new(
                        format!("Field '{}' references missing record '{id}'.", field.name),
                        "missing_relation",
                    )));
                }
            }
        }
        Ok(())
    }

    /// Attaches expanded relation targets to `record`.
    ///
    /// Unknown or non-relation names in the spec are skipped, as are
    /// dangling target ids.
    fn expand_record(&self, def: &CollectionDef, record: &mut Record, spec: &str) {
        for name in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some(field) = def.field_by_name(name) else {
                continue;
            };
            let FieldKind::Relation {
                collection_id,
                max_select,
                ..
            } = &field.kind
            else {
                continue;
            };

            let targets: Vec<Value> = record
                .get_id_list(name)
                .iter()
                .filter_map(|id| self.find(collection_id, id))
                .filter_map(|target| serde_json::to_value(target).ok())
                .collect();

            let expanded = if *max_select == 1 {
                match targets.into_iter().next() {
                    Some(first) => first,
                    None => continue,
                }
            } else if targets.is_empty() {
                continue;
            } else {
                Value::Array(targets)
            };
            record.expand.insert(name.to_string(), expanded);
        }
    }
}

/// Removes autodate field keys from `data`.
fn strip_autodates(def: &CollectionDef, data: &mut Map<String, Value>) {
    for field in &def.fields {
        if field.kind.is_autodate() {
            data.remove(&field.name);
        }
    }
}

/// Generates a record id from the collection's id-field pattern.
fn autogenerate_id(def: &CollectionDef) -> String {
    let pattern = def.field_by_name("id").and_then(|f| match &f.kind {
        FieldKind::Text {
            autogenerate_pattern,
            ..
        } => autogenerate_pattern.clone(),
        _ => None,
    });
    generate_from_pattern(pattern.as_deref().unwrap_or("[a-z0-9]{15}"))
}

/// Generates a random string from a `[class]{n}` pattern.
///
/// Only the single-class-with-count shape is supported; anything else
/// falls back to 15 lowercase alphanumerics.
fn generate_from_pattern(pattern: &str) -> String {
    const FALLBACK: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

    let parsed = pattern
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .and_then(|(class, count)| {
            let count: usize = count
                .strip_prefix('{')?
                .strip_suffix('}')?
                .parse()
                .ok()?;
            Some((expand_class(class), count))
        });

    let (alphabet, count) = match parsed {
        Some((alphabet, count)) if !alphabet.is_empty() => (alphabet, count),
        _ => (FALLBACK.chars().collect(), 15),
    };

    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Expands a character class body (`a-z0-9`) into its members.
fn expand_class(class: &str) -> Vec<char> {
    let chars: Vec<char> = class.chars().collect();
    let mut result = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            let (start, end) = (chars[i], chars[i + 2]);
            if start <= end {
                result.extend((start..=end).filter(char::is_ascii_alphanumeric));
            }
            i += 3;
        } else {
            result.push(chars[i]);
            i += 1;
        }
    }
    result
}

/// Parses a sort spec into `(field, descending)` pairs.
fn parse_sort(spec: &str) -> Vec<(String, bool)> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|key| match key.strip_prefix('-') {
            Some(field) => (field.to_string(), true),
            None => (key.to_string(), false),
        })
        .collect()
}

/// Compares two records on one field, missing values first.
fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    if field == "id" {
        return a.id.cmp(&b.id);
    }
    compare_values(a.get(field), b.get(field))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
