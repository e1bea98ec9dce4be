//! The `migratedown` management command.
//!
//! Reverts applied schema migrations back to a target version. Reverting
//! requires the original migration definitions to still be registered;
//! a ledger entry without one aborts the run before anything changes.

use soporte_core::{Settings, SoporteError};
use soporte_migrations::{catalog, JsonLedger, MigrationRunner};
use soporte_schema::JsonSchemaStore;

use crate::command::ManagementCommand;

/// Reverts schema migrations down to a target version.
///
/// `--to VERSION` names the last version that stays applied; `--to 0`
/// reverts everything.
pub struct MigratedownCommand;

impl ManagementCommand for MigratedownCommand {
    fn name(&self) -> &str {
        "migratedown"
    }

    fn help(&self) -> &str {
        "Revert schema migrations down to a version"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("to")
                .long("to")
                .required(true)
                .value_parser(clap::value_parser!(i64))
                .help("Version token that remains applied (0 reverts everything)"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SoporteError> {
        let to = *matches.get_one::<i64>("to").expect("required argument");

        let ledger = JsonLedger::open(settings.ledger_path())?;
        let mut runner = MigrationRunner::with_ledger(Box::new(ledger));
        catalog::register_all(&mut runner)?;
        let mut store = JsonSchemaStore::open(settings.schema_path())?;

        let reverted = runner.apply_backward(&mut store, to)?;
        if reverted.is_empty() {
            tracing::info!("Nothing to revert");
        } else {
            tracing::info!("Reverted {} migration(s)", reverted.len());
        }
        Ok(())
    }
}
