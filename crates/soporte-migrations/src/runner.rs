//! The migration runner.
//!
//! [`MigrationRunner`] brings a schema store from its current applied
//! state to a target state by running the minimal ordered sequence of
//! registered migration units, forward or backward, while maintaining the
//! ledger.
//!
//! Failure model: the run stops at the first failing unit and surfaces a
//! [`SoporteError::MigrationExecution`] carrying its version. Units that
//! completed earlier in the same run stay applied — corrective action is
//! an explicit re-run or revert, never automatic.

use std::collections::BTreeMap;

use soporte_core::logging::migration_span;
use soporte_core::{SoporteError, SoporteResult};
use soporte_schema::SchemaStore;

use crate::ledger::{Ledger, MemoryLedger};
use crate::migration::Migration;

/// One row of [`MigrationRunner::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// The migration's version token.
    pub version: i64,
    /// The migration's description.
    pub name: String,
    /// Whether the ledger records this version as applied.
    pub applied: bool,
}

/// Applies and reverts registered migration units against a schema store.
///
/// Units are ordered strictly by version token; registration order is
/// never consulted. The runner owns the ledger; the schema store is passed
/// into each call so migrations stay testable against a snapshot.
pub struct MigrationRunner {
    registered: BTreeMap<i64, Migration>,
    ledger: Box<dyn Ledger>,
}

impl MigrationRunner {
    /// Creates a runner with an empty in-memory ledger.
    pub fn new() -> Self {
        Self::with_ledger(Box::new(MemoryLedger::new()))
    }

    /// Creates a runner backed by the given ledger.
    pub fn with_ledger(ledger: Box<dyn Ledger>) -> Self {
        Self {
            registered: BTreeMap::new(),
            ledger,
        }
    }

    /// Adds a migration unit to the known set.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::DuplicateVersion`] if a unit with the same
    /// version token is already registered, regardless of its body.
    pub fn register(&mut self, migration: Migration) -> SoporteResult<()> {
        let version = migration.version();
        if self.registered.contains_key(&version) {
            return Err(SoporteError::DuplicateVersion(version));
        }
        self.registered.insert(version, migration);
        Ok(())
    }

    /// Returns the ledger.
    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Returns the number of registered units.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Returns whether no units are registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Applies all registered units newer than the ledger head, up to and
    /// including `to` (all of them when `to` is `None`), ascending by
    /// version. Returns the versions applied by this call.
    ///
    /// Each unit's effect is persisted and its version appended to the
    /// ledger before the next unit runs. On failure the run stops; earlier
    /// units in the run are NOT rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::MigrationExecution`] wrapping the failing
    /// unit's error and carrying its version.
    pub fn apply_forward(
        &mut self,
        store: &mut dyn SchemaStore,
        to: Option<i64>,
    ) -> SoporteResult<Vec<i64>> {
        let last = self.ledger.last_applied().unwrap_or(0);
        let target = to.unwrap_or(i64::MAX);
        let pending: Vec<i64> = self
            .registered
            .keys()
            .copied()
            .filter(|v| *v > last && *v <= target)
            .collect();

        let mut applied = Vec::new();
        for version in pending {
            let migration = &self.registered[&version];
            let span = migration_span(version, "up");
            let _guard = span.enter();
            tracing::info!(name = migration.name(), "applying migration");

            migration
                .run_up(store)
                .map_err(|e| SoporteError::in_migration(version, e))?;
            self.ledger.record_applied(version, migration.name())?;
            applied.push(version);
        }

        if applied.is_empty() {
            tracing::debug!("no pending migrations");
        }
        Ok(applied)
    }

    /// Reverts all ledger-recorded versions newer than `to`, in exact
    /// reverse application order. Returns the versions reverted.
    ///
    /// The whole selection is checked against the registered set before
    /// any `down` runs, so a missing unit never leaves a partial revert:
    /// on [`SoporteError::UnknownMigration`] the ledger is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::UnknownMigration`] if a selected ledger
    /// entry has no registered unit, or
    /// [`SoporteError::MigrationExecution`] if a `down` body fails.
    pub fn apply_backward(
        &mut self,
        store: &mut dyn SchemaStore,
        to: i64,
    ) -> SoporteResult<Vec<i64>> {
        // Ledger order is application order; walking it backwards gives
        // the exact reverse.
        let selection: Vec<i64> = self
            .ledger
            .list_applied()
            .into_iter()
            .filter(|v| *v > to)
            .rev()
            .collect();

        for version in &selection {
            if !self.registered.contains_key(version) {
                return Err(SoporteError::UnknownMigration(*version));
            }
        }

        let mut reverted = Vec::new();
        for version in selection {
            let migration = &self.registered[&version];
            let span = migration_span(version, "down");
            let _guard = span.enter();
            tracing::info!(name = migration.name(), "reverting migration");

            migration
                .run_down(store)
                .map_err(|e| SoporteError::in_migration(version, e))?;
            self.ledger.record_reverted(version)?;
            reverted.push(version);
        }
        Ok(reverted)
    }

    /// Returns every registered migration with its applied flag, in
    /// version order.
    pub fn status(&self) -> Vec<MigrationStatus> {
        self.registered
            .values()
            .map(|m| MigrationStatus {
                version: m.version(),
                name: m.name().to_string(),
                applied: self.ledger.is_applied(m.version()),
            })
            .collect()
    }
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soporte_schema::{CollectionDef, FieldDef, FieldKind, MemorySchemaStore};

    fn create_collection(version: i64, id: &'static str, name: &'static str) -> Migration {
        Migration::new(
            version,
            format!("created_{name}"),
            move |store| store.save_collection(CollectionDef::new(id, name)),
            move |store| store.delete_collection(id),
        )
    }

    fn failing(version: i64) -> Migration {
        Migration::new(
            version,
            "broken",
            |store| {
                // Looks up a collection no migration created.
                store.collection("missing").map(|_| ())
            },
            |_| Ok(()),
        )
    }

    #[test]
    fn test_register_duplicate_version_fails() {
        let mut runner = MigrationRunner::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        // Different body, same token: still rejected.
        let err = runner.register(failing(1)).unwrap_err();
        assert!(matches!(err, SoporteError::DuplicateVersion(1)));
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn test_apply_forward_orders_by_version_not_registration() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        // Registered newest-first on purpose.
        runner.register(create_collection(3, "pbc_c", "gamma")).unwrap();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner.register(create_collection(2, "pbc_b", "beta")).unwrap();

        let applied = runner.apply_forward(&mut store, None).unwrap();
        assert_eq!(applied, vec![1, 2, 3]);
        assert_eq!(runner.ledger().list_applied(), vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_forward_to_target_stops_there() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner.register(create_collection(2, "pbc_b", "beta")).unwrap();
        runner.register(create_collection(3, "pbc_c", "gamma")).unwrap();

        let applied = runner.apply_forward(&mut store, Some(2)).unwrap();
        assert_eq!(applied, vec![1, 2]);
        assert!(store.collection("gamma").is_err());
    }

    #[test]
    fn test_apply_forward_twice_is_noop() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();

        assert_eq!(runner.apply_forward(&mut store, None).unwrap(), vec![1]);
        assert!(runner.apply_forward(&mut store, None).unwrap().is_empty());
        assert_eq!(runner.ledger().list_applied(), vec![1]);
    }

    #[test]
    fn test_apply_forward_stops_at_first_failure_keeping_progress() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner.register(failing(2)).unwrap();
        runner.register(create_collection(3, "pbc_c", "gamma")).unwrap();

        let err = runner.apply_forward(&mut store, None).unwrap_err();
        match err {
            SoporteError::MigrationExecution { version, .. } => assert_eq!(version, 2),
            other => panic!("unexpected error: {other}"),
        }
        // v1 stays applied; v3 never ran.
        assert_eq!(runner.ledger().list_applied(), vec![1]);
        assert!(store.collection("alfa").is_ok());
        assert!(store.collection("gamma").is_err());
    }

    #[test]
    fn test_apply_backward_exact_reverse_order() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        // v2 adds a field to the collection v1 created; reverting v1 first
        // would fail, so order matters.
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner
            .register(Migration::new(
                2,
                "updated_alfa",
                |store| {
                    let mut c = store.collection("pbc_a")?;
                    c.add_field_at(0, FieldDef::new("f1", "status", FieldKind::Bool))?;
                    store.save_collection(c)
                },
                |store| {
                    let mut c = store.collection("pbc_a")?;
                    c.remove_field("f1")?;
                    store.save_collection(c)
                },
            ))
            .unwrap();

        runner.apply_forward(&mut store, None).unwrap();
        let reverted = runner.apply_backward(&mut store, 0).unwrap();
        assert_eq!(reverted, vec![2, 1]);
        assert!(runner.ledger().list_applied().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_backward_partial_target() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner.register(create_collection(2, "pbc_b", "beta")).unwrap();
        runner.apply_forward(&mut store, None).unwrap();

        let reverted = runner.apply_backward(&mut store, 1).unwrap();
        assert_eq!(reverted, vec![2]);
        assert_eq!(runner.ledger().list_applied(), vec![1]);
        assert!(store.collection("alfa").is_ok());
    }

    #[test]
    fn test_apply_backward_unknown_migration_leaves_ledger() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner.register(create_collection(2, "pbc_b", "beta")).unwrap();
        runner.apply_forward(&mut store, None).unwrap();

        // Simulate a deregistered unit: fresh runner sharing the ledger
        // state but missing v2's definition.
        let mut sparse = MigrationRunner::with_ledger(Box::new(MemoryLedger::new()));
        sparse.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        sparse.ledger_record_for_tests(1, "created_alfa");
        sparse.ledger_record_for_tests(2, "created_beta");

        let err = sparse.apply_backward(&mut store, 0).unwrap_err();
        assert!(matches!(err, SoporteError::UnknownMigration(2)));
        assert_eq!(sparse.ledger().list_applied(), vec![1, 2]);
    }

    #[test]
    fn test_status_reflects_ledger() {
        let mut runner = MigrationRunner::new();
        let mut store = MemorySchemaStore::new();
        runner.register(create_collection(1, "pbc_a", "alfa")).unwrap();
        runner.register(create_collection(2, "pbc_b", "beta")).unwrap();
        runner.apply_forward(&mut store, Some(1)).unwrap();

        let status = runner.status();
        assert_eq!(status.len(), 2);
        assert!(status[0].applied);
        assert_eq!(status[0].version, 1);
        assert!(!status[1].applied);
    }

    impl MigrationRunner {
        /// Test-only ledger seeding.
        fn ledger_record_for_tests(&mut self, version: i64, name: &str) {
            self.ledger.record_applied(version, name).unwrap();
        }
    }
}
