//! INI store adapter
//!
//! Holds at most one parsed INI document and exposes the load, query,
//! mutate and save operations the keyword layer publishes. Parsing and
//! serialization are delegated to `configparser`; this module only adds the
//! loaded/unloaded gate, the remembered source path and error reporting.

mod interpolation;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::{debug, info};
use thiserror::Error;

use crate::utils::{file_exists, file_get, resolve_path};

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No INI document loaded, load one first")]
    NotLoaded,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Section \"{0}\" not found in the INI document")]
    SectionNotFound(String),

    #[error("Key \"{key}\" not found in section \"{section}\"")]
    KeyNotFound { section: String, key: String },

    #[error("Section \"{0}\" has no entries")]
    EmptySection(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A parsed INI document together with the path it was loaded from.
struct Document {
    ini: Ini,
    source: PathBuf,
}

impl Document {
    /// The engine's default profile folds section and key names to
    /// lowercase; every query must fold the same way before lookup.
    fn fold(name: &str) -> String {
        name.to_lowercase()
    }

    fn has_section(&self, section: &str) -> bool {
        self.ini.get_map_ref().contains_key(&Self::fold(section))
    }
}

/// INI store adapter holding at most one loaded document.
///
/// The store is a plain owned value: construct it once, pass it by
/// reference to every operation, drop it at end of run. Every operation
/// except [`load`](IniStore::load) fails with [`StoreError::NotLoaded`]
/// until a document is present.
pub struct IniStore {
    doc: Option<Document>,
}

impl Default for IniStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IniStore {
    /// Create a store with no document loaded
    pub fn new() -> Self {
        IniStore { doc: None }
    }

    /// Whether a document is currently loaded
    pub fn is_loaded(&self) -> bool {
        self.doc.is_some()
    }

    /// Path the current document was loaded from
    pub fn source_path(&self) -> Option<&Path> {
        self.doc.as_ref().map(|doc| doc.source.as_path())
    }

    fn doc(&self) -> Result<&Document, StoreError> {
        self.doc.as_ref().ok_or(StoreError::NotLoaded)
    }

    fn doc_mut(&mut self) -> Result<&mut Document, StoreError> {
        self.doc.as_mut().ok_or(StoreError::NotLoaded)
    }

    /// Load an INI file, replacing any previously loaded document.
    ///
    /// The path is resolved against the process working directory. With
    /// `interpolate` set, `%(key)s` references are expanded against the
    /// other values of the same section once the file is parsed.
    ///
    /// On failure the previously loaded document, if any, stays loaded
    /// untouched; the document is only replaced once the new file has been
    /// found and parsed.
    pub fn load(&mut self, path: &str, interpolate: bool) -> Result<(), StoreError> {
        let full_path = resolve_path(path)?;
        if !file_exists(&full_path) {
            return Err(StoreError::FileNotFound(full_path));
        }

        let content = file_get(&full_path)?;
        let mut ini = Ini::new();
        ini.read(content).map_err(StoreError::Parse)?;
        if interpolate {
            interpolation::interpolate_document(&mut ini);
        }

        info!(
            "Loaded INI document from {} ({} section(s))",
            full_path.display(),
            ini.sections().len()
        );
        self.doc = Some(Document {
            ini,
            source: full_path,
        });
        Ok(())
    }

    /// Get the value stored for `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Result<String, StoreError> {
        let doc = self.doc()?;
        let map = doc.ini.get_map_ref();
        let entries = map
            .get(&Document::fold(section))
            .ok_or_else(|| StoreError::SectionNotFound(section.to_string()))?;
        let value = entries
            .get(&Document::fold(key))
            .ok_or_else(|| StoreError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })?;
        debug!("Read key \"{}\" from section \"{}\"", key, section);
        Ok(value.clone().unwrap_or_default())
    }

    /// Insert or overwrite `key` in `section`, creating the section first
    /// if it is absent. The value is stored verbatim.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let doc = self.doc_mut()?;
        doc.ini.set(section, key, Some(value.to_string()));
        info!("Set key \"{}\" in section \"{}\"", key, section);
        Ok(())
    }

    /// Write the document out, to `path` when given, otherwise back to the
    /// path recorded at load time. The destination is overwritten
    /// unconditionally; the recorded path is not changed.
    pub fn save(&self, path: Option<&str>) -> Result<(), StoreError> {
        let doc = self.doc()?;
        let target = match path {
            Some(path) => resolve_path(path)?,
            None => doc.source.clone(),
        };
        fs::write(&target, doc.ini.writes())?;
        info!("Saved INI document to {}", target.display());
        Ok(())
    }

    /// Remove `section` and every entry in it.
    pub fn remove_section(&mut self, section: &str) -> Result<(), StoreError> {
        let doc = self.doc_mut()?;
        doc.ini
            .remove_section(section)
            .ok_or_else(|| StoreError::SectionNotFound(section.to_string()))?;
        info!("Removed section \"{}\"", section);
        Ok(())
    }

    /// Remove a single key from `section`. The section itself persists
    /// even when this empties it.
    pub fn remove_key(&mut self, section: &str, key: &str) -> Result<(), StoreError> {
        let doc = self.doc_mut()?;
        if !doc.has_section(section) {
            return Err(StoreError::SectionNotFound(section.to_string()));
        }
        doc.ini
            .remove_key(section, key)
            .ok_or_else(|| StoreError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })?;
        info!("Removed key \"{}\" from section \"{}\"", key, section);
        Ok(())
    }

    /// All entries of `section` as a plain key to value map.
    pub fn section_map(&self, section: &str) -> Result<HashMap<String, String>, StoreError> {
        let doc = self.doc()?;
        let map = doc.ini.get_map_ref();
        let entries = map
            .get(&Document::fold(section))
            .ok_or_else(|| StoreError::SectionNotFound(section.to_string()))?;
        let items: HashMap<String, String> = entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().unwrap_or_default()))
            .collect();
        debug!(
            "Collected {} item(s) from section \"{}\"",
            items.len(),
            section
        );
        Ok(items)
    }

    /// Values of every entry in `section` whose key equals `key`, in
    /// section order. The section is scanned entry by entry rather than
    /// indexed; an empty list means no entry matched.
    ///
    /// Fails with [`StoreError::EmptySection`] when the section holds no
    /// entries at all.
    pub fn values_for_key(&self, section: &str, key: &str) -> Result<Vec<String>, StoreError> {
        let doc = self.doc()?;
        let map = doc.ini.get_map_ref();
        let entries = map
            .get(&Document::fold(section))
            .ok_or_else(|| StoreError::SectionNotFound(section.to_string()))?;
        if entries.is_empty() {
            return Err(StoreError::EmptySection(section.to_string()));
        }

        let wanted = Document::fold(key);
        let mut values = Vec::new();
        for (entry_key, value) in entries {
            if *entry_key == wanted {
                values.push(value.clone().unwrap_or_default());
            }
        }
        debug!(
            "Collected {} value(s) for key \"{}\" in section \"{}\"",
            values.len(),
            key,
            section
        );
        Ok(values)
    }

    /// Whether `section` exists in the loaded document.
    pub fn section_exists(&self, section: &str) -> Result<bool, StoreError> {
        let doc = self.doc()?;
        let exists = doc.has_section(section);
        debug!("Section \"{}\" exists: {}", section, exists);
        Ok(exists)
    }

    /// Whether `key` exists in `section`.
    pub fn key_exists(&self, section: &str, key: &str) -> Result<bool, StoreError> {
        let doc = self.doc()?;
        let map = doc.ini.get_map_ref();
        let entries = map
            .get(&Document::fold(section))
            .ok_or_else(|| StoreError::SectionNotFound(section.to_string()))?;
        let exists = entries.contains_key(&Document::fold(key));
        debug!(
            "Key \"{}\" exists in section \"{}\": {}",
            key, section, exists
        );
        Ok(exists)
    }

    /// Names of all sections, in document order.
    pub fn sections(&self) -> Result<Vec<String>, StoreError> {
        let doc = self.doc()?;
        Ok(doc.ini.sections())
    }
}
