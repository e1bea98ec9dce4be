//! The `soporte` management binary.
//!
//! Loads settings from `Soporte.toml` (when present) plus `SOPORTE_*`
//! environment overrides, sets up logging, and dispatches to the
//! requested management command.

use std::path::Path;

use soporte_cli::command::{run, CommandRegistry};
use soporte_cli::commands::register_builtin_commands;
use soporte_core::{logging, settings_loader};

const SETTINGS_FILE: &str = "Soporte.toml";

fn main() {
    let settings = if Path::new(SETTINGS_FILE).exists() {
        match settings_loader::from_toml_file_with_env(SETTINGS_FILE) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("soporte: {err}");
                std::process::exit(2);
            }
        }
    } else {
        settings_loader::from_env()
    };
    logging::setup_logging(&settings);

    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);

    if let Err(err) = run(&registry, &settings, std::env::args_os()) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
