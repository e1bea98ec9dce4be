//! # soporte-records
//!
//! The record store for soporte: CRUD over records of the live schema,
//! with the client-facing list surface (sort and relation expansion) and
//! schema-driven validation.
//!
//! ## Module Overview
//!
//! - [`record`] - `Record` plus date parsing/formatting helpers
//! - [`validate`] - per-field-kind constraint validation
//! - [`store`] - `RecordStore`, `ListOptions`

#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

pub mod record;
pub mod store;
pub mod validate;

// Re-export key types at the crate root.
pub use record::{format_datetime, parse_datetime, Record};
pub use store::{ListOptions, RecordStore};
