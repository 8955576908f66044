//! The list of titles the display rotates through.
//!
//! Titles are persisted as a JSON array of strings under a single key. The
//! read path is forgiving: a missing value, unreadable storage, invalid JSON,
//! a non-array, or an empty array all mean "use the defaults". Writes are
//! whole-list replacements and are not validated; a bad list simply falls
//! back to the defaults on the next read.

use tracing::{debug, warn};

use crate::error::Result;
use crate::store::PersistenceStore;

/// Storage key for the customized title list.
pub const TITLES_KEY: &str = "scottd3v-titles";

/// Built-in titles, in display order.
pub const DEFAULT_TITLES: [&str; 7] = [
    "Product Engineer",
    "Full Stack Creator",
    "Zero-to-One Builder",
    "Software Futurist",
    "Pizza Chef",
    "Dad",
    "Software Seuss",
];

/// A fresh, independently owned copy of [`DEFAULT_TITLES`].
#[must_use]
pub fn default_titles() -> Vec<String> {
    DEFAULT_TITLES.iter().map(ToString::to_string).collect()
}

/// Title catalog backed by a [`PersistenceStore`].
#[derive(Debug)]
pub struct TitleCatalog<S> {
    store: S,
    key: String,
}

impl<S: PersistenceStore> TitleCatalog<S> {
    /// Catalog using the standard [`TITLES_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, TITLES_KEY)
    }

    /// Catalog reading and writing a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active title list. Never empty.
    #[must_use]
    pub fn get_titles(&self) -> Vec<String> {
        self.stored_titles().unwrap_or_else(default_titles)
    }

    /// A fresh copy of the built-in list.
    #[must_use]
    pub fn get_default_titles(&self) -> Vec<String> {
        default_titles()
    }

    /// Replace the stored list. No validation happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save_titles(&mut self, titles: &[String]) -> Result<()> {
        let encoded = serde_json::to_string(titles)?;
        self.store.save(&self.key, &encoded)?;
        debug!(count = titles.len(), "saved titles");
        Ok(())
    }

    /// Forget the stored list so reads return the defaults again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn reset_titles(&mut self) -> Result<()> {
        self.store.clear(&self.key)?;
        debug!("reset titles to defaults");
        Ok(())
    }

    /// True when a valid custom list is stored.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        self.stored_titles().is_some()
    }

    /// The stored list if present and well-formed.
    fn stored_titles(&self) -> Option<Vec<String>> {
        let raw = match self.store.load(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "could not read stored titles, using defaults");
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(titles) if !titles.is_empty() => Some(titles),
            Ok(_) => {
                warn!("stored title list is empty, using defaults");
                None
            }
            Err(err) => {
                warn!(error = %err, "stored titles are malformed, using defaults");
                None
            }
        }
    }
}
