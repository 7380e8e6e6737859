//! Settings backend abstraction.
//!
//! The browser persists a handful of user choices (selected book, selected
//! tags, panel widths) under dotted paths such as `selected_book.code`. The
//! [`SettingsStore`] trait keeps the coordinator independent of where those
//! values end up.

use crate::domain::Result;
use serde_json::Value;

/// Key/value store addressed by dotted paths.
///
/// Setting a path to [`Value::Null`] removes it.
///
/// # Implementations
///
/// - [`crate::storage::JsonSettings`]: JSON file with atomic writes (default)
///
/// # Examples
///
/// ```no_run
/// use versenav::storage::{JsonSettings, SettingsStore};
/// use serde_json::json;
///
/// let mut settings = JsonSettings::new("/tmp/versenav/settings.json".into())?;
/// settings.set("selected_book", json!({"code": "Gen", "name": "Genesis"}))?;
/// assert_eq!(settings.get("selected_book.code")?, Some(json!("Gen")));
/// # Ok::<(), versenav::BrowserError>(())
/// ```
pub trait SettingsStore: Send {
    /// Value stored at `path`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Stores `value` at `path`, creating intermediate objects as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, path: &str, value: Value) -> Result<()>;

    /// Whether a non-null value is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn has(&self, path: &str) -> Result<bool> {
        Ok(self.get(path)?.is_some_and(|value| !value.is_null()))
    }
}
