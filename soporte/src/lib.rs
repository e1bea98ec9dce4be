//! # soporte
//!
//! Backend core of an internal IT-support tracker: a declarative
//! collection schema, a versioned reversible migration engine that
//! evolves it, a record store with the client-facing CRUD surface, and
//! statistics aggregation.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. Depend on `soporte` for the whole platform, or on individual
//! crates for finer-grained control.

/// Foundation types: errors, settings, logging.
pub use soporte_core as core;

/// Collection and field definitions plus the schema store.
pub use soporte_schema as schema;

/// The migration engine, ledger, and the tracker's schema history.
pub use soporte_migrations as migrations;

/// Record CRUD with sort, relation expansion, and validation.
#[cfg(feature = "records")]
pub use soporte_records as records;

/// Statistics aggregation over support records.
#[cfg(feature = "stats")]
pub use soporte_stats as stats;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use soporte_cli as cli;
