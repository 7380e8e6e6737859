//! JSON file-based settings backend.
//!
//! Settings are kept in memory and written as a whole on every change, using
//! an atomic write (write-to-temp + rename) so a crash never leaves a
//! truncated file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": 1718000000,
//!   "values": {
//!     "selected_book": { "code": "Gen", "name": "Genesis" },
//!     "selected_tags": null,
//!     "tag_list_width": 320
//!   }
//! }
//! ```

use crate::domain::{BrowserError, Result};
use crate::storage::backend::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsData {
    /// Version of the file format for future migrations.
    version: u32,

    /// Unix timestamp of the last save.
    #[serde(default)]
    saved_at: Option<i64>,

    #[serde(default)]
    values: Map<String, Value>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: None,
            values: Map::new(),
        }
    }
}

/// JSON file settings backend.
///
/// `Send` but not `Sync`; owned by the single coordinator.
#[derive(Debug)]
pub struct JsonSettings {
    file_path: PathBuf,
    data: SettingsData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonSettings {
    /// Creates or opens a settings file.
    ///
    /// Existing files are loaded, otherwise the store starts empty. Parent
    /// directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON settings");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty settings");
            SettingsData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<SettingsData> {
        let contents = std::fs::read_to_string(path)?;
        let data: SettingsData = serde_json::from_str(&contents)
            .map_err(|e| BrowserError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, "unknown settings format version");
        }
        tracing::debug!(
            version = data.version,
            keys = data.values.len(),
            "loaded settings"
        );

        Ok(data)
    }

    /// Writes the settings to disk if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written
    /// or renamed into place.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        self.data.saved_at = Some(chrono::Utc::now().timestamp());
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| BrowserError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.file_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "settings saved");
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, path: &str) -> Result<Option<Value>> {
        Ok(lookup(&self.data.values, path).cloned())
    }

    fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let _span = tracing::debug_span!("settings_set", path = %path).entered();

        if value.is_null() {
            remove(&mut self.data.values, path);
        } else {
            insert(&mut self.data.values, path, value);
        }

        self.dirty = true;
        self.save()
    }
}

impl Drop for JsonSettings {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty settings on drop");
            if let Err(e) = self.save() {
                tracing::error!(error = %e, "failed to save settings on drop");
            }
        }
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Walks to the parent object of `path`, creating objects along the way.
/// Non-object values in the way are replaced.
fn parent_mut<'a>(root: &'a mut Map<String, Value>, parents: &[&str]) -> Option<&'a mut Map<String, Value>> {
    let mut current = root;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry.as_object_mut()?;
    }
    Some(current)
}

fn insert(root: &mut Map<String, Value>, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    if let Some((leaf, parents)) = segments.split_last() {
        if let Some(parent) = parent_mut(root, parents) {
            parent.insert((*leaf).to_string(), value);
        }
    }
}

fn remove(root: &mut Map<String, Value>, path: &str) {
    match path.rsplit_once('.') {
        Some((parent, leaf)) => {
            let parents: Vec<&str> = parent.split('.').collect();
            if lookup(root, parent).is_some_and(Value::is_object) {
                if let Some(map) = parent_mut(root, &parents) {
                    map.remove(leaf);
                }
            }
        }
        None => {
            root.remove(path);
        }
    }
}
