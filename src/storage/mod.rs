//! Storage layer for persisted user settings.
//!
//! # Modules
//!
//! - `backend`: Settings store trait over dotted paths
//! - `json`: JSON file-based implementation
//! - `models`: Typed records of the persisted values

pub mod backend;
pub mod json;
pub mod models;

pub use backend::SettingsStore;
pub use json::JsonSettings;
pub use models::{SelectedBookSetting, SelectedTagsSetting};
