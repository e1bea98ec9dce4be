//! Integration tests for the management commands.
//!
//! These tests run the real commands against a temporary data directory,
//! verifying that migrate/migratedown maintain the persisted schema and
//! ledger files across invocations.

use soporte_cli::command::{run, CommandRegistry};
use soporte_cli::commands::register_builtin_commands;
use soporte_core::Settings;
use soporte_migrations::{JsonLedger, Ledger};
use soporte_schema::{JsonSchemaStore, SchemaStore};

fn test_settings(dir: &tempfile::TempDir) -> Settings {
    Settings {
        data_dir: dir.path().to_path_buf(),
        ..Settings::default()
    }
}

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    registry
}

// ── 1. migrate applies the catalog and persists both files ──────────────

#[test]
fn test_migrate_creates_schema_and_ledger_files() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);

    run(&registry(), &settings, ["soporte", "migrate"]).unwrap();

    let store = JsonSchemaStore::open(settings.schema_path()).unwrap();
    assert_eq!(store.collections().len(), 3);
    assert!(store.collection("historial").is_ok());

    let ledger = JsonLedger::open(settings.ledger_path()).unwrap();
    assert_eq!(ledger.list_applied().len(), 7);
}

// ── 2. migrate --to stops mid-history; a second migrate finishes ────────

#[test]
fn test_migrate_to_version_then_resume() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);

    run(
        &registry(),
        &settings,
        ["soporte", "migrate", "--to", "1762788936"],
    )
    .unwrap();
    let ledger = JsonLedger::open(settings.ledger_path()).unwrap();
    assert_eq!(ledger.list_applied().len(), 3);

    run(&registry(), &settings, ["soporte", "migrate"]).unwrap();
    let ledger = JsonLedger::open(settings.ledger_path()).unwrap();
    assert_eq!(ledger.list_applied().len(), 7);
}

// ── 3. migratedown reverts to the target ────────────────────────────────

#[test]
fn test_migratedown_reverts_everything() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);

    run(&registry(), &settings, ["soporte", "migrate"]).unwrap();
    run(
        &registry(),
        &settings,
        ["soporte", "migratedown", "--to", "0"],
    )
    .unwrap();

    let store = JsonSchemaStore::open(settings.schema_path()).unwrap();
    assert!(store.collections().is_empty());
    let ledger = JsonLedger::open(settings.ledger_path()).unwrap();
    assert!(ledger.list_applied().is_empty());
}

// ── 4. showmigrations and seed run cleanly ──────────────────────────────

#[test]
fn test_showmigrations_and_seed_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);

    run(&registry(), &settings, ["soporte", "showmigrations"]).unwrap();
    run(&registry(), &settings, ["soporte", "seed"]).unwrap();
}

// ── 5. migratedown without --to is a parse error ────────────────────────

#[test]
fn test_migratedown_requires_target() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    assert!(run(&registry(), &settings, ["soporte", "migratedown"]).is_err());
}
