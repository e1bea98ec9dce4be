//! Schema stores: the persistence seam for collection definitions.
//!
//! The migration engine and the record store both consume the
//! [`SchemaStore`] trait. [`MemorySchemaStore`] is the canonical pure
//! snapshot used in tests and inside migration bodies;
//! [`JsonSchemaStore`] persists the collection set to a single JSON file
//! and is what the CLI drives.
//!
//! Lookup accepts either a collection id or its *current* name — never a
//! historical name.

use std::path::{Path, PathBuf};

use soporte_core::{SoporteError, SoporteResult};

use crate::collection::CollectionDef;

/// Storage of collection definitions.
///
/// `save_collection` is an upsert keyed by the collection's immutable id:
/// saving an id already present replaces that definition (this is how
/// migrations persist field-list changes and renames); saving a new id
/// creates the collection. Creation order is preserved.
pub trait SchemaStore {
    /// Returns a copy of the collection matching the id or current name.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::NotFound`] if nothing matches.
    fn collection(&self, id_or_name: &str) -> SoporteResult<CollectionDef>;

    /// Returns copies of all collections in creation order.
    fn collections(&self) -> Vec<CollectionDef>;

    /// Creates or replaces a collection definition.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::Validation`] if the definition's name
    /// collides with a different collection's current name.
    fn save_collection(&mut self, def: CollectionDef) -> SoporteResult<()>;

    /// Deletes the collection matching the id or current name.
    ///
    /// # Errors
    ///
    /// Returns [`SoporteError::NotFound`] if nothing matches.
    fn delete_collection(&mut self, id_or_name: &str) -> SoporteResult<()>;
}

/// An in-memory schema store.
///
/// Collections are kept in creation order so that schema snapshots compare
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySchemaStore {
    collections: Vec<CollectionDef>,
}

impl MemorySchemaStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            collections: Vec::new(),
        }
    }

    /// Returns the number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Returns whether the store holds no collections.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    fn position(&self, id_or_name: &str) -> Option<usize> {
        // Id takes precedence over name so an id-shaped name cannot
        // shadow another collection.
        self.collections
            .iter()
            .position(|c| c.id == id_or_name)
            .or_else(|| self.collections.iter().position(|c| c.name == id_or_name))
    }
}

impl SchemaStore for MemorySchemaStore {
    fn collection(&self, id_or_name: &str) -> SoporteResult<CollectionDef> {
        self.position(id_or_name)
            .map(|i| self.collections[i].clone())
            .ok_or_else(|| SoporteError::NotFound(id_or_name.to_string()))
    }

    fn collections(&self) -> Vec<CollectionDef> {
        self.collections.clone()
    }

    fn save_collection(&mut self, def: CollectionDef) -> SoporteResult<()> {
        if self
            .collections
            .iter()
            .any(|c| c.name == def.name && c.id != def.id)
        {
            return Err(SoporteError::Validation(soporte_core::ValidationError::new(
                format!("A different collection is already named '{}'", def.name),
                "name_taken",
            )));
        }
        match self.collections.iter().position(|c| c.id == def.id) {
            Some(i) => self.collections[i] = def,
            None => self.collections.push(def),
        }
        Ok(())
    }

    fn delete_collection(&mut self, id_or_name: &str) -> SoporteResult<()> {
        match self.position(id_or_name) {
            Some(i) => {
                self.collections.remove(i);
                Ok(())
            }
            None => Err(SoporteError::NotFound(id_or_name.to_string())),
        }
    }
}

/// A schema store persisted to a single JSON file.
///
/// The file holds a JSON array of collection definitions. Every mutation
/// rewrites the file; reads are served from memory.
#[derive(Debug)]
pub struct JsonSchemaStore {
    path: PathBuf,
    inner: MemorySchemaStore,
}

impl JsonSchemaStore {
    /// Opens the store at `path`, loading existing collections if the file
    /// exists. Parent directories are created on first save.
    pub fn open(path: impl AsRef<Path>) -> SoporteResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let collections: Vec<CollectionDef> = serde_json::from_str(&content)
                .map_err(|e| SoporteError::Serialization(format!("{}: {e}", path.display())))?;
            MemorySchemaStore { collections }
        } else {
            MemorySchemaStore::new()
        };
        Ok(Self { path, inner })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> SoporteResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.inner.collections)
            .map_err(|e| SoporteError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "schema persisted");
        Ok(())
    }
}

impl SchemaStore for JsonSchemaStore {
    fn collection(&self, id_or_name: &str) -> SoporteResult<CollectionDef> {
        self.inner.collection(id_or_name)
    }

    fn collections(&self) -> Vec<CollectionDef> {
        self.inner.collections()
    }

    fn save_collection(&mut self, def: CollectionDef) -> SoporteResult<()> {
        self.inner.save_collection(def)?;
        self.persist()
    }

    fn delete_collection(&mut self, id_or_name: &str) -> SoporteResult<()> {
        self.inner.delete_collection(id_or_name)?;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDef, FieldKind};

    fn historial() -> CollectionDef {
        CollectionDef::new("pbc_1119805642", "historial")
            .with_field(FieldDef::new("bool2063623452", "status", FieldKind::Bool))
    }

    // ── MemorySchemaStore ───────────────────────────────────────────

    #[test]
    fn test_memory_save_and_lookup_by_id() {
        let mut store = MemorySchemaStore::new();
        store.save_collection(historial()).unwrap();
        assert_eq!(store.collection("pbc_1119805642").unwrap().name, "historial");
    }

    #[test]
    fn test_memory_lookup_by_name() {
        let mut store = MemorySchemaStore::new();
        store.save_collection(historial()).unwrap();
        assert_eq!(store.collection("historial").unwrap().id, "pbc_1119805642");
    }

    #[test]
    fn test_memory_lookup_missing() {
        let store = MemorySchemaStore::new();
        assert!(matches!(
            store.collection("nope"),
            Err(SoporteError::NotFound(_))
        ));
    }

    #[test]
    fn test_memory_save_is_upsert_by_id() {
        let mut store = MemorySchemaStore::new();
        store.save_collection(historial()).unwrap();

        let mut renamed = historial();
        renamed.name = "historial_v2".to_string();
        store.save_collection(renamed).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.collection("pbc_1119805642").unwrap().name, "historial_v2");
        // The old name no longer resolves.
        assert!(store.collection("historial").is_err());
    }

    #[test]
    fn test_memory_name_collision_rejected() {
        let mut store = MemorySchemaStore::new();
        store.save_collection(historial()).unwrap();
        let clash = CollectionDef::new("pbc_other", "historial");
        assert!(matches!(
            store.save_collection(clash),
            Err(SoporteError::Validation(_))
        ));
    }

    #[test]
    fn test_memory_delete_by_name() {
        let mut store = MemorySchemaStore::new();
        store.save_collection(historial()).unwrap();
        store.delete_collection("historial").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_delete_missing() {
        let mut store = MemorySchemaStore::new();
        assert!(matches!(
            store.delete_collection("nope"),
            Err(SoporteError::NotFound(_))
        ));
    }

    #[test]
    fn test_memory_preserves_creation_order() {
        let mut store = MemorySchemaStore::new();
        store
            .save_collection(CollectionDef::new("pbc_b", "beta"))
            .unwrap();
        store
            .save_collection(CollectionDef::new("pbc_a", "alfa"))
            .unwrap();
        let names: Vec<String> = store.collections().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["beta", "alfa"]);
    }

    // ── JsonSchemaStore ─────────────────────────────────────────────

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collections.json");

        {
            let mut store = JsonSchemaStore::open(&path).unwrap();
            store.save_collection(historial()).unwrap();
        }

        let reopened = JsonSchemaStore::open(&path).unwrap();
        let c = reopened.collection("historial").unwrap();
        assert_eq!(c.id, "pbc_1119805642");
        assert_eq!(c.fields.len(), 1);
    }

    #[test]
    fn test_json_store_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collections.json");

        let mut store = JsonSchemaStore::open(&path).unwrap();
        store.save_collection(historial()).unwrap();
        store.delete_collection("pbc_1119805642").unwrap();
        drop(store);

        let reopened = JsonSchemaStore::open(&path).unwrap();
        assert!(reopened.collections().is_empty());
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSchemaStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_json_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collections.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonSchemaStore::open(&path),
            Err(SoporteError::Serialization(_))
        ));
    }
}
