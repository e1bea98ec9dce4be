//! Collection definitions and field-list mutation primitives.
//!
//! A [`CollectionDef`] is a named schema entity: a stable `id`, a mutable
//! human `name`, an ordered field list, API rule strings, and index
//! expressions. Migrations mutate the field list exclusively through
//! [`CollectionDef::add_field_at`], [`CollectionDef::remove_field`], and
//! [`CollectionDef::replace_field_at`], which carry the exact ordering and
//! failure semantics the migration engine's reversibility contract relies
//! on.

use serde::{Deserialize, Serialize};
use soporte_core::{SoporteError, SoporteResult};

use crate::field::FieldDef;

/// The structural kind of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// A regular record collection.
    #[default]
    Base,
    /// A read-only collection backed by a query.
    View,
}

/// Per-operation API rule strings.
///
/// `None` means the operation is restricted to administrators. Rule
/// *evaluation* belongs to the API layer; the schema only carries the
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRules {
    /// Rule for listing records.
    pub list_rule: Option<String>,
    /// Rule for viewing a single record.
    pub view_rule: Option<String>,
    /// Rule for creating records.
    pub create_rule: Option<String>,
    /// Rule for updating records.
    pub update_rule: Option<String>,
    /// Rule for deleting records.
    pub delete_rule: Option<String>,
}

/// A named schema entity with an ordered list of typed fields.
///
/// The `id` is immutable once the collection is created; `name` may change
/// without affecting identity. Field order is meaningful: a field's
/// position is its index in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDef {
    /// Stable identifier (e.g. `pbc_1119805642`). Immutable once created.
    pub id: String,
    /// Human name, unique across the schema at any point in time.
    pub name: String,
    /// The structural kind.
    #[serde(rename = "type", default)]
    pub kind: CollectionKind,
    /// System collections cannot be deleted by ordinary migrations.
    #[serde(default)]
    pub system: bool,
    /// The ordered field list.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Raw index expressions.
    #[serde(default)]
    pub indexes: Vec<String>,
    /// API rule strings.
    #[serde(flatten)]
    pub rules: CollectionRules,
}

impl CollectionDef {
    /// Creates a new empty base collection.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CollectionKind::Base,
            system: false,
            fields: Vec::new(),
            indexes: Vec::new(),
            rules: CollectionRules::default(),
        }
    }

    /// Appends a field. Intended for initial collection construction;
    /// use [`Self::add_field_at`] inside migrations.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the field with the given id, if present.
    pub fn field(&self, field_id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Returns the field with the given name, if present.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the ordinal position of the field with the given id.
    pub fn field_position(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == field_id)
    }

    /// Inserts `field` at the given ordinal position, shifting subsequent
    /// fields right. Positions past the end append.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::DuplicateFieldId`] if a field with the same
    /// id already exists.
    pub fn add_field_at(&mut self, position: usize, field: FieldDef) -> SoporteResult<()> {
        if self.field(&field.id).is_some() {
            return Err(SoporteError::DuplicateFieldId {
                collection: self.name.clone(),
                field_id: field.id,
            });
        }
        let position = position.min(self.fields.len());
        self.fields.insert(position, field);
        Ok(())
    }

    /// Deletes the field with the given id, closing the position gap.
    /// Returns the removed definition.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::FieldNotFound`] if no field has that id.
    pub fn remove_field(&mut self, field_id: &str) -> SoporteResult<FieldDef> {
        match self.field_position(field_id) {
            Some(position) => Ok(self.fields.remove(position)),
            None => Err(SoporteError::FieldNotFound {
                collection: self.name.clone(),
                field_id: field_id.to_string(),
            }),
        }
    }

    /// Replaces the field sharing `field`'s id with the complete new
    /// definition, inserted at the given position.
    ///
    /// This is the full-replace semantic used by "update field" migrations:
    /// any existing field with the same id is removed first (sibling
    /// positions close up), then the new definition is inserted. When no
    /// field with that id exists, this degenerates to an insert.
    pub fn replace_field_at(&mut self, position: usize, field: FieldDef) {
        if let Some(existing) = self.field_position(&field.id) {
            self.fields.remove(existing);
        }
        let position = position.min(self.fields.len());
        self.fields.insert(position, field);
    }

    /// Returns the names of all fields, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
