//! Core error types for the soporte workspace.
//!
//! This module provides the workspace-wide error enum [`SoporteError`]. The
//! migration engine, schema store, record store, and CLI all propagate this
//! type; nothing is swallowed or retried below the caller.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A record validation failure with optional per-field errors.
///
/// Validation errors are either simple (a single message and code) or
/// compound (per-field error lists collected while validating a whole
/// record against its collection schema).
///
/// # Examples
///
/// ```
/// use soporte_core::error::ValidationError;
///
/// let err = ValidationError::new("Value is not in the allowed list.", "invalid_choice");
/// assert_eq!(err.code, "invalid_choice");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "required", "pattern").
    pub code: String,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            field_errors,
        }
    }

    /// Returns whether any field has an error recorded.
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the soporte workspace.
///
/// The first group of variants is the migration engine's taxonomy; the rest
/// cover record validation, persistence, and configuration. Every variant is
/// surfaced to the caller of the operation that produced it.
#[derive(Error, Debug)]
pub enum SoporteError {
    // ── Migration engine ─────────────────────────────────────────────

    /// A migration with this version token is already registered.
    #[error("Migration version {0} is already registered")]
    DuplicateVersion(i64),

    /// A field with this id already exists in the collection.
    #[error("Collection '{collection}' already has a field with id '{field_id}'")]
    DuplicateFieldId {
        /// The collection name or id.
        collection: String,
        /// The offending field id.
        field_id: String,
    },

    /// No field with this id exists in the collection.
    #[error("Collection '{collection}' has no field with id '{field_id}'")]
    FieldNotFound {
        /// The collection name or id.
        collection: String,
        /// The missing field id.
        field_id: String,
    },

    /// No collection matches the given id or name.
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// The ledger records a version for which no migration is registered.
    ///
    /// Reverting past this version is impossible until the original
    /// migration definition is registered again.
    #[error("Ledger records version {0} but no such migration is registered")]
    UnknownMigration(i64),

    /// A migration's `up` or `down` body failed.
    #[error("Migration {version} failed: {source}")]
    MigrationExecution {
        /// The version token of the failing migration.
        version: i64,
        /// The underlying failure.
        #[source]
        source: Box<SoporteError>,
    },

    // ── Records ──────────────────────────────────────────────────────

    /// A record failed validation against its collection schema.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// The requested record does not exist.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // ── Persistence / configuration ──────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SoporteError {
    /// Wraps an error as a migration execution failure for `version`.
    pub fn in_migration(version: i64, source: Self) -> Self {
        Self::MigrationExecution {
            version,
            source: Box::new(source),
        }
    }
}

/// A convenience type alias for `Result<T, SoporteError>`.
pub type SoporteResult<T> = Result<T, SoporteError>;
