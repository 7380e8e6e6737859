//! Tag types shared by the selection synchronizer and the tag catalog.

use serde::{Deserialize, Serialize};

/// A tag as it appears in a checkbox row or in a verse's tag list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagEntry {
    /// Stable identifier, independent of the title text.
    pub id: i64,
    pub title: String,
}

impl TagEntry {
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// One row of `TagCatalog::list_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub id: i64,
    pub title: String,
    /// Set for book-local tags, `None` for global tags.
    pub bible_book_id: Option<i64>,
    pub global_assignment_count: u32,
}
