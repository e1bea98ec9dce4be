//! # soporte-core
//!
//! Foundation types for the soporte workspace: the workspace-wide error
//! enum, runtime settings with file/env loading, and logging setup.
//!
//! ## Module Overview
//!
//! - [`error`] - `SoporteError`, `ValidationError`, `SoporteResult`
//! - [`settings`] - `Settings` and the global instance
//! - [`settings_loader`] - TOML file loading and `SOPORTE_*` env overrides
//! - [`logging`] - tracing subscriber setup and migration spans

#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export key types at the crate root.
pub use error::{SoporteError, SoporteResult, ValidationError};
pub use settings::Settings;
