//! The `migrate` management command.
//!
//! Applies pending schema migrations to the configured data directory:
//! opens the file-backed schema store and ledger, registers the catalog,
//! and applies forward up to the requested version (or all the way).

use soporte_core::{Settings, SoporteError};
use soporte_migrations::{catalog, JsonLedger, MigrationRunner};
use soporte_schema::JsonSchemaStore;

use crate::command::ManagementCommand;

/// Applies pending schema migrations.
///
/// Supports `--to VERSION` to stop at (and include) a specific version
/// token; without it, every pending migration is applied.
pub struct MigrateCommand;

impl ManagementCommand for MigrateCommand {
    fn name(&self) -> &str {
        "migrate"
    }

    fn help(&self) -> &str {
        "Apply pending schema migrations"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("to")
                .long("to")
                .value_parser(clap::value_parser!(i64))
                .help("Version token to migrate up to (inclusive)"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SoporteError> {
        let to = matches.get_one::<i64>("to").copied();

        let ledger = JsonLedger::open(settings.ledger_path())?;
        let mut runner = MigrationRunner::with_ledger(Box::new(ledger));
        catalog::register_all(&mut runner)?;
        let mut store = JsonSchemaStore::open(settings.schema_path())?;

        let applied = runner.apply_forward(&mut store, to)?;
        if applied.is_empty() {
            tracing::info!("No pending migrations");
        } else {
            tracing::info!("Applied {} migration(s)", applied.len());
        }
        Ok(())
    }
}
