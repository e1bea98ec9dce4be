//! # soporte-cli
//!
//! Management commands for the soporte platform: applying and reverting
//! schema migrations against the configured data directory, showing
//! migration status, and seeding demo data.
//!
//! ## Quick Start
//!
//! ```rust
//! use soporte_cli::command::CommandRegistry;
//! use soporte_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"migrate"));
//! assert!(names.contains(&"showmigrations"));
//! ```

#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod commands;

// Re-export primary types at the crate root for convenience.
pub use command::{run, CommandRegistry, ManagementCommand};
pub use commands::register_builtin_commands;
