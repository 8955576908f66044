//! Durable key-value storage for user-customized content.
//!
//! The title catalog only ever needs three operations on a single key, so
//! backends implement the small [`PersistenceStore`] trait:
//!
//! - [`SqliteStore`]: durable storage in a `SQLite` file.
//! - [`MemoryStore`]: a process-local map, used by tests and `backend = "memory"`.
//! - [`NullStore`]: a host with no durable storage at all; nothing is ever
//!   stored and every write is silently dropped.

pub mod migrations;
pub mod schema;
mod sqlite;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;

pub use sqlite::SqliteStore;

/// Get/set/clear of raw string values by key.
///
/// `save` overwrites unconditionally and `clear` makes the next `load`
/// return `None`. Implementations must not interpret the values.
pub trait PersistenceStore {
    /// Return the stored value, or `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&mut self, key: &str) -> Result<()>;
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        (**self).clear(key)
    }
}

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// `SQLite` database file.
    #[default]
    Sqlite,
    /// In-process map; lost on exit.
    Memory,
    /// No storage; defaults are always used.
    None,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
            Self::None => write!(f, "none"),
        }
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single pre-set value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self { values }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        trace!(key, "memory store save");
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store for hosts without durable storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl PersistenceStore for NullStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&mut self, key: &str, _value: &str) -> Result<()> {
        trace!(key, "no durable store, dropping save");
        Ok(())
    }

    fn clear(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }
}
