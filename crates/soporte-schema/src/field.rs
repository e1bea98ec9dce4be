//! Field definitions for collections.
//!
//! A [`FieldDef`] is one typed attribute of a collection. The stable `id`
//! survives renames and constraint changes; the `name` is what records use
//! for data access. The type-specific constraints live in [`FieldKind`],
//! a tagged variant with one case per field type, so invalid constraint
//! combinations (a `values` list on a date field, say) cannot be expressed.
//!
//! The serde shape mirrors the platform's field JSON: a lowercase `type`
//! tag with camelCase constraint keys.

use serde::{Deserialize, Serialize};

/// The type of a field together with its type-specific constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Plain text with optional length bounds and patterns.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Minimum length in characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        /// Maximum length in characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
        /// Regex the stored value must match.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        /// Pattern used to autogenerate a value when none is supplied
        /// (e.g. `[a-z0-9]{15}` for record ids).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        autogenerate_pattern: Option<String>,
        /// Whether this field is the collection's primary key.
        #[serde(default)]
        primary_key: bool,
    },
    /// True/false flag.
    Bool,
    /// Numeric value with optional bounds.
    #[serde(rename_all = "camelCase")]
    Number {
        /// Minimum allowed value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Maximum allowed value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Whether fractional values are rejected.
        #[serde(default)]
        only_int: bool,
    },
    /// Rich text (HTML).
    #[serde(rename_all = "camelCase")]
    Editor {
        /// Whether pasted URLs are converted to anchors.
        #[serde(default, rename = "convertURLs")]
        convert_urls: bool,
        /// Maximum content size in bytes (0 = unlimited).
        #[serde(default)]
        max_size: usize,
    },
    /// Reference(s) to records of another collection.
    #[serde(rename_all = "camelCase")]
    Relation {
        /// The id of the target collection.
        collection_id: String,
        /// Minimum number of referenced records.
        #[serde(default)]
        min_select: usize,
        /// Maximum number of referenced records (1 = single relation).
        max_select: usize,
        /// Whether deleting the target cascades to the referencing record.
        #[serde(default)]
        cascade_delete: bool,
    },
    /// Calendar date, stored as an RFC 3339 string.
    Date {
        /// Earliest allowed value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        /// Latest allowed value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },
    /// One or more values from a fixed option list.
    #[serde(rename_all = "camelCase")]
    Select {
        /// Maximum number of selected options (1 = single select).
        max_select: usize,
        /// The allowed option values.
        values: Vec<String>,
    },
    /// Timestamp maintained by the record store, never set by callers.
    #[serde(rename_all = "camelCase")]
    Autodate {
        /// Stamp the field when the record is created.
        on_create: bool,
        /// Restamp the field on every update.
        on_update: bool,
    },
}

impl FieldKind {
    /// Returns the lowercase type tag for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Bool => "bool",
            Self::Number { .. } => "number",
            Self::Editor { .. } => "editor",
            Self::Relation { .. } => "relation",
            Self::Date { .. } => "date",
            Self::Select { .. } => "select",
            Self::Autodate { .. } => "autodate",
        }
    }

    /// Returns `true` if this is a relation field.
    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }

    /// Returns `true` if this field's value is maintained by the store.
    pub fn is_autodate(&self) -> bool {
        matches!(self, Self::Autodate { .. })
    }
}

/// One typed attribute of a collection.
///
/// The `id` is stable for the lifetime of the field; `name` may be changed
/// by migrations without affecting identity. Within a collection, field
/// ids are unique and field names are unique at any point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Stable identifier, unique within the collection.
    pub id: String,
    /// The name records use for data access; mutable.
    pub name: String,
    /// System fields cannot be removed by ordinary migrations.
    #[serde(default)]
    pub system: bool,
    /// Hidden fields are omitted from default API output.
    #[serde(default)]
    pub hidden: bool,
    /// Whether a non-empty value is required.
    #[serde(default)]
    pub required: bool,
    /// Whether the field is used as the record's display value.
    #[serde(default)]
    pub presentable: bool,
    /// The field type and its constraints.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDef {
    /// Creates a new field definition with all flags off.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            system: false,
            hidden: false,
            required: false,
            presentable: false,
            kind,
        }
    }

    /// Marks this field as a system field.
    #[must_use]
    pub fn system(mut self) -> Self {
        self.system = true;
        self
    }

    /// Hides this field from default output.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Requires a non-empty value.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Uses this field as the record's display value.
    #[must_use]
    pub fn presentable(mut self) -> Self {
        self.presentable = true;
        self
    }
}
