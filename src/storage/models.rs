//! Typed shapes of the persisted settings.
//!
//! The store itself is untyped; these records give the coordinator a checked
//! view of the values it writes and restores.

use serde::{Deserialize, Serialize};

/// Settings path of the selected book.
pub const SELECTED_BOOK: &str = "selected_book";

/// Settings path of the selected tags.
pub const SELECTED_TAGS: &str = "selected_tags";

/// Settings path of the tag list panel width.
pub const TAG_LIST_WIDTH: &str = "tag_list_width";

/// Persisted book selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedBookSetting {
    pub code: String,
    pub name: String,
}

/// Persisted tag selection as two parallel arrays.
///
/// The arrays are stored as they were written; a length mismatch is detected
/// when the selection is applied to a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTagsSetting {
    #[serde(default)]
    pub id_list: Vec<i64>,
    #[serde(default)]
    pub title_list: Vec<String>,
}

impl SelectedTagsSetting {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_list.is_empty() && self.title_list.is_empty()
    }
}
