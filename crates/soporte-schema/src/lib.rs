//! # soporte-schema
//!
//! Collection and field definitions for the soporte platform, plus the
//! schema store seam the migration engine mutates through.
//!
//! ## Architecture
//!
//! - [`FieldDef`] / [`FieldKind`] - one typed attribute of a collection;
//!   constraints are per-type tagged variants.
//! - [`CollectionDef`] - a named schema entity with an ordered field list
//!   and the mutation primitives migrations use (`add_field_at`,
//!   `remove_field`, `replace_field_at`).
//! - [`SchemaStore`] - lookup-by-id-or-name, save, delete;
//!   [`MemorySchemaStore`] for pure snapshots, [`JsonSchemaStore`] for
//!   file persistence.

#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

pub mod collection;
pub mod field;
pub mod store;

// Re-export key types at the crate root.
pub use collection::{CollectionDef, CollectionKind, CollectionRules};
pub use field::{FieldDef, FieldKind};
pub use store::{JsonSchemaStore, MemorySchemaStore, SchemaStore};
