//! Logging integration for the soporte platform.
//!
//! Provides a helper for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-migration
//! spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log filter is read from `settings.log_level`. In debug mode a
/// pretty, human-readable format is used; otherwise a structured JSON
/// format is used. A second call is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one migration unit.
///
/// Attach this span while a unit's `up` or `down` runs so all log entries
/// emitted inside carry the version token.
///
/// # Examples
///
/// ```
/// use soporte_core::logging::migration_span;
///
/// let span = migration_span(1_762_788_936, "up");
/// let _guard = span.enter();
/// tracing::info!("applying");
/// ```
pub fn migration_span(version: i64, direction: &str) -> tracing::Span {
    tracing::info_span!("migration", version, direction)
}
