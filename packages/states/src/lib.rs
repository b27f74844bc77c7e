#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static state-name catalog.
//!
//! The catalog is a JSON object mapping an internal state key to its display
//! label, e.g. `{"NY": "New York", "CA": "California"}`. It is read once at
//! startup and never changes afterwards. Entries keep the order they have in
//! the file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

/// Errors that can occur while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum StateCatalogError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a JSON object of string labels.
    #[error("Malformed state mapping: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Immutable list of state keys, in the order the mapping file declares
/// them. Labels are validated on load but not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateCatalog {
    keys: Vec<String>,
}

impl StateCatalog {
    /// Reads and parses the catalog at `path`.
    ///
    /// # Errors
    ///
    /// * [`StateCatalogError::Io`] if the file is missing or unreadable
    /// * [`StateCatalogError::Malformed`] if it is not a JSON object whose
    ///   values are strings
    pub fn load(path: &Path) -> Result<Self, StateCatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StateCatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&contents)?;
        log::info!(
            "Loaded {} states from {}",
            catalog.len(),
            path.display()
        );

        Ok(catalog)
    }

    /// Parses a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// * If `json` is not an object of string values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// State keys in stored order.
    #[must_use]
    pub fn list_states(&self) -> Vec<&str> {
        self.keys.iter().map(String::as_str).collect()
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'de> Deserialize<'de> for StateCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = StateCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping state keys to labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut keys: Vec<String> = Vec::with_capacity(map.size_hint().unwrap_or(0));

                while let Some((key, _label)) = map.next_entry::<String, String>()? {
                    // A repeated key keeps its first position.
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }

                Ok(StateCatalog { keys })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
