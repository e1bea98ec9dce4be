//! The applied-migration ledger.
//!
//! The ledger is the exclusive owner of "has this version been applied"
//! state. Entries are kept in application order; since the engine only
//! ever appends versions greater than the current head, the sequence is
//! strictly increasing (sparse — version tokens are timestamps, not
//! sequence numbers) and duplicate-free.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soporte_core::{SoporteError, SoporteResult};

/// One applied-migration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The migration's version token.
    pub version: i64,
    /// The migration's description at apply time.
    pub name: String,
    /// When the migration was applied.
    pub applied: DateTime<Utc>,
}

/// Persistent record of which migration versions have been applied.
pub trait Ledger {
    /// Returns the applied versions in application order.
    fn list_applied(&self) -> Vec<i64>;

    /// Returns whether the given version has been applied.
    fn is_applied(&self, version: i64) -> bool {
        self.list_applied().contains(&version)
    }

    /// Returns the most recently applied version, if any.
    fn last_applied(&self) -> Option<i64> {
        self.list_applied().last().copied()
    }

    /// Appends a version to the ledger. Recording an already-present
    /// version is a no-op.
    fn record_applied(&mut self, version: i64, name: &str) -> SoporteResult<()>;

    /// Removes a version from the ledger. Removing an absent version is a
    /// no-op.
    fn record_reverted(&mut self, version: i64) -> SoporteResult<()>;
}

/// An in-memory ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    entries: Vec<LedgerEntry>,
}

impl MemoryLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the full entries, in application order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}

impl Ledger for MemoryLedger {
    fn list_applied(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.version).collect()
    }

    fn record_applied(&mut self, version: i64, name: &str) -> SoporteResult<()> {
        if !self.is_applied(version) {
            self.entries.push(LedgerEntry {
                version,
                name: name.to_string(),
                applied: Utc::now(),
            });
        }
        Ok(())
    }

    fn record_reverted(&mut self, version: i64) -> SoporteResult<()> {
        self.entries.retain(|e| e.version != version);
        Ok(())
    }
}

/// A ledger persisted to a JSON file.
///
/// The file holds a JSON array of [`LedgerEntry`] in application order.
/// Every mutation rewrites the file; reads are served from memory.
#[derive(Debug)]
pub struct JsonLedger {
    path: PathBuf,
    inner: MemoryLedger,
}

impl JsonLedger {
    /// Opens the ledger at `path`, loading existing entries if the file
    /// exists. Parent directories are created on first write.
    pub fn open(path: impl AsRef<Path>) -> SoporteResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let entries: Vec<LedgerEntry> = serde_json::from_str(&content)
                .map_err(|e| SoporteError::Serialization(format!("{}: {e}", path.display())))?;
            MemoryLedger { entries }
        } else {
            MemoryLedger::new()
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
        let json = serde_json::to_string_pretty(&self.inner.entries)
            .map_err(|e| SoporteError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl Ledger for JsonLedger {
    fn list_applied(&self) -> Vec<i64> {
        self.inner.list_applied()
    }

    fn record_applied(&mut self, version: i64, name: &str) -> SoporteResult<()> {
        self.inner.record_applied(version, name)?;
        self.persist()
    }

    fn record_reverted(&mut self, version: i64) -> SoporteResult<()> {
        self.inner.record_reverted(version)?;
        self.persist()
    }
}
