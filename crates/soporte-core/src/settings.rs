//! Settings for the soporte platform.
//!
//! This module provides the [`Settings`] struct holding all runtime
//! configuration, and a globally-accessible, lazily-initialized instance.
//! Values come from `Soporte.toml` and `SOPORTE_*` environment variables
//! (see [`crate::settings_loader`]).

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of platform settings.
///
/// # Examples
///
/// ```
/// use soporte_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.schema_file, "collections.json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The tracing filter directive (e.g. "info", "soporte=debug").
    pub log_level: String,

    // ── Storage ──────────────────────────────────────────────────────

    /// Directory holding the persisted schema and ledger files.
    pub data_dir: PathBuf,
    /// File name of the persisted collection definitions, under `data_dir`.
    pub schema_file: String,
    /// File name of the applied-migration ledger, under `data_dir`.
    pub ledger_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            data_dir: PathBuf::from("sp_data"),
            schema_file: "collections.json".to_string(),
            ledger_file: "migrations.json".to_string(),
        }
    }
}

impl Settings {
    /// Returns the full path of the persisted schema file.
    pub fn schema_path(&self) -> PathBuf {
        self.data_dir.join(&self.schema_file)
    }

    /// Returns the full path of the applied-migration ledger file.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Installs the global settings instance.
///
/// Returns an error with the rejected settings if the global instance was
/// already configured; the first configuration wins.
pub fn configure(settings: Settings) -> Result<(), Settings> {
    SETTINGS.set(settings)
}

/// Returns the global settings, falling back to defaults if
/// [`configure`] was never called.
pub fn current() -> &'static Settings {
    SETTINGS.get_or_init(Settings::default)
}
