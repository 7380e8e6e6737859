//! Versenav: presentation-state coordination for a multi-tab Bible browser.
//!
//! Versenav keeps the view state of a Bible reading application consistent:
//! - Each tab shows either one book or the verses carrying a set of tags
//! - A navigation index of chapters or books with hover and search highlights
//! - A global tag menu with a coalesced title filter
//! - Placement of the tag reference box and the menu popovers
//! - Export of tagged verses into a document grouped by book

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (runtime::Coordinator or the UI shell)        │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - Request generations                              │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Navigation    │   │ Tags / Export │   │ Worker Layer  │
//! │ (navigation/) │   │ (tags/,       │   │ (worker/)     │
//! │ - Index build │   │  export/)     │   │ - Catalogs    │
//! │ - Highlights  │   │ - Selection   │   │ - Text loader │
//! │               │   │ - Segmenting  │   │ - JSON IPC    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Storage & Infrastructure                   │
//! │  - Books, verses, tags, errors (domain/)            │
//! │  - JSON settings store (storage/)                   │
//! │  - Data directory resolution (infrastructure/)      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - JSON log file with size-based rotation           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Books, verses, tags and the error type
//! - [`navigation`]: Navigation index building and highlighting
//! - [`tags`]: Tag selection and the tag menu
//! - [`overlay`]: Popup and popover placement
//! - [`export`]: Verse block segmentation and document export
//! - [`worker`]: Collaborator services behind a message protocol
//! - [`storage`]: Persisted settings
//! - [`runtime`]: Reference host wiring it all together
//! - [`infrastructure`]: Data directory resolution
//! - [`observability`]: Log file setup
//!
//! # Configuration
//!
//! ```toml
//! data_dir = "~/.local/share/versenav"
//! trace_level = "debug"
//! reference_separator = ":"
//! tag_filter_debounce_ms = 300
//! export_file = "tagged_verses.txt"
//! ```
//!
//! # Example
//!
//! ```rust
//! use versenav::app::{handle_event, Action, AppState, Event};
//! use versenav::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! handle_event(&mut state, &Event::TabAdded { id: "tab-1".into(), translation_id: "KJV".into() })?;
//!
//! let (_, actions) = handle_event(
//!     &mut state,
//!     &Event::BookSelected { code: "Gen".into(), title: "Genesis".into() },
//! )?;
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! # Ok::<(), versenav::BrowserError>(())
//! ```

pub mod app;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod navigation;
pub mod observability;
pub mod overlay;
pub mod runtime;
pub mod storage;
pub mod tags;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, ViewMode};
pub use domain::{BrowserError, Result};
pub use runtime::{Coordinator, ViewHost};

use crate::overlay::OverlayPositioner;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Idle window of the tag menu filter.
pub const DEFAULT_TAG_FILTER_DEBOUNCE_MS: u64 = 300;

/// Separator between chapter and verse in references.
pub const DEFAULT_REFERENCE_SEPARATOR: char = ':';

/// File name of the export target inside the data directory.
pub const DEFAULT_EXPORT_FILE: &str = "tagged_verses.txt";

/// File name of the settings store inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Coordinator configuration.
///
/// Loaded from a TOML file or from the host's flat key/value configuration.
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for settings, logs and exports. See
    /// [`infrastructure::paths`] for the fallback order.
    pub data_dir: Option<String>,

    /// Log filter directive. Options: `trace`, `debug`, `info`, `warn`,
    /// `error`. Default: `"info"`
    pub trace_level: Option<String>,

    pub reference_separator: char,

    pub tag_filter_debounce_ms: u64,

    pub popup_height: f64,
    pub popup_width: f64,
    pub popup_right_margin: f64,
    /// Vertical gap between a verse box and the popup below it.
    pub popup_gap: f64,
    /// Distance between a menu button and its popover.
    pub menu_offset: f64,

    /// Export file, relative to the data directory unless absolute.
    pub export_file: String,
}

impl Default for Config {
    fn default() -> Self {
        let positioner = OverlayPositioner::default();
        Self {
            data_dir: None,
            trace_level: None,
            reference_separator: DEFAULT_REFERENCE_SEPARATOR,
            tag_filter_debounce_ms: DEFAULT_TAG_FILTER_DEBOUNCE_MS,
            popup_height: positioner.popup_height,
            popup_width: positioner.popup_width,
            popup_right_margin: positioner.right_margin,
            popup_gap: positioner.gap,
            menu_offset: positioner.menu_offset,
            export_file: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Io`] if the file cannot be read and
    /// [`BrowserError::Config`] if it is not valid TOML for this structure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&contents).map_err(|e| {
            BrowserError::Config(format!("{}: {e}", path.as_ref().display()))
        })
    }

    /// Parses configuration from the host's string map.
    ///
    /// # Parsing Rules
    ///
    /// - Numbers that fail to parse fall back to their defaults
    /// - `reference_separator` uses the first character of the value
    /// - Empty strings count as unset
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use versenav::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("tag_filter_debounce_ms".to_string(), "150".to_string());
    /// map.insert("popup_width".to_string(), "wide".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.tag_filter_debounce_ms, 150);
    /// assert_eq!(config.popup_width, 620.0);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let number = |key: &str, default: f64| {
            text(key)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|n| n.is_finite())
                .unwrap_or(default)
        };

        Self {
            data_dir: text("data_dir"),
            trace_level: text("trace_level"),
            reference_separator: text("reference_separator")
                .and_then(|s| s.chars().next())
                .unwrap_or(defaults.reference_separator),
            tag_filter_debounce_ms: text("tag_filter_debounce_ms")
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(defaults.tag_filter_debounce_ms),
            popup_height: number("popup_height", defaults.popup_height),
            popup_width: number("popup_width", defaults.popup_width),
            popup_right_margin: number("popup_right_margin", defaults.popup_right_margin),
            popup_gap: number("popup_gap", defaults.popup_gap),
            menu_offset: number("menu_offset", defaults.menu_offset),
            export_file: text("export_file").unwrap_or(defaults.export_file),
        }
    }

    #[must_use]
    pub fn positioner(&self) -> OverlayPositioner {
        OverlayPositioner {
            popup_height: self.popup_height,
            popup_width: self.popup_width,
            right_margin: self.popup_right_margin,
            gap: self.popup_gap,
            menu_offset: self.menu_offset,
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        infrastructure::get_data_dir(self.data_dir.as_deref())
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir().join(SETTINGS_FILE)
    }

    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.data_dir().join(&self.export_file)
    }
}

/// Initializes logging and returns a fresh application state.
///
/// # Example
///
/// ```rust
/// use versenav::{initialize, Config};
///
/// let config = Config {
///     data_dir: Some(std::env::temp_dir().join("versenav-init").to_string_lossy().into_owned()),
///     ..Default::default()
/// };
/// let state = initialize(&config);
/// assert!(state.tabs.is_empty());
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    observability::init_tracing(config);
    tracing::debug!(data_dir = ?config.data_dir(), "initializing versenav");
    AppState::new(config)
}
