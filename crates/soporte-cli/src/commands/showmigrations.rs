//! The `showmigrations` management command.
//!
//! Displays every known migration with its applied status, in version
//! order.

use soporte_core::{Settings, SoporteError};
use soporte_migrations::{catalog, JsonLedger, MigrationRunner};

use crate::command::ManagementCommand;

/// Lists all migrations and their applied/unapplied status.
pub struct ShowmigrationsCommand;

impl ManagementCommand for ShowmigrationsCommand {
    fn name(&self) -> &str {
        "showmigrations"
    }

    fn help(&self) -> &str {
        "Show migration status"
    }

    fn handle(&self, _matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SoporteError> {
        let ledger = JsonLedger::open(settings.ledger_path())?;
        let mut runner = MigrationRunner::with_ledger(Box::new(ledger));
        catalog::register_all(&mut runner)?;

        for status in runner.status() {
            let marker = if status.applied { "[X]" } else { "[ ]" };
            println!("{marker} {} {}", status.version, status.name);
        }
        Ok(())
    }
}
