//! The migration unit.
//!
//! A [`Migration`] is a versioned, reversible schema transformation: a
//! numeric version token (timestamp-derived at authoring time), a
//! description, and two pure functions `up` and `down` over a schema
//! store. Units are immutable after construction; the engine orders them
//! strictly by version, never by registration order.

use std::fmt;

use soporte_core::SoporteResult;
use soporte_schema::SchemaStore;

/// A migration direction body: a pure transformation of the schema store.
pub type MigrationFn = Box<dyn Fn(&mut dyn SchemaStore) -> SoporteResult<()> + Send + Sync>;

/// A single versioned, reversible schema transformation.
///
/// The reversibility contract: for everything the unit touches,
/// `down(up(schema)) == schema` must hold exactly — field ids, ordinal
/// positions, and constraint values included.
///
/// # Examples
///
/// ```
/// use soporte_migrations::Migration;
/// use soporte_schema::{CollectionDef, SchemaStore};
///
/// let m = Migration::new(
///     1_762_788_936,
///     "created_historial",
///     |store| store.save_collection(CollectionDef::new("pbc_1119805642", "historial")),
///     |store| store.delete_collection("pbc_1119805642"),
/// );
/// assert_eq!(m.version(), 1_762_788_936);
/// ```
pub struct Migration {
    version: i64,
    name: String,
    up: MigrationFn,
    down: MigrationFn,
}

impl Migration {
    /// Creates a new migration unit.
    pub fn new<U, D>(version: i64, name: impl Into<String>, up: U, down: D) -> Self
    where
        U: Fn(&mut dyn SchemaStore) -> SoporteResult<()> + Send + Sync + 'static,
        D: Fn(&mut dyn SchemaStore) -> SoporteResult<()> + Send + Sync + 'static,
    {
        Self {
            version,
            name: name.into(),
            up: Box::new(up),
            down: Box::new(down),
        }
    }

    /// Returns the version token.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the forward transformation against `store`.
    pub fn run_up(&self, store: &mut dyn SchemaStore) -> SoporteResult<()> {
        (self.up)(store)
    }

    /// Runs the backward transformation against `store`.
    pub fn run_down(&self, store: &mut dyn SchemaStore) -> SoporteResult<()> {
        (self.down)(store)
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
