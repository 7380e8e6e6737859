//! Bible book model and the stable, id-keyed book registry.
//!
//! Book ordinal positions and titles are always resolved through
//! [`BookRegistry`], never inferred from rendered header text.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A book of the Bible as known to the active translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleBook {
    /// Stable storage identifier.
    pub id: i64,
    /// Short code, e.g. `"Gen"`.
    pub short_title: String,
    /// Display title, e.g. `"Genesis"`.
    pub long_title: String,
    /// Canonical order position (1-based).
    pub position: u32,
}

impl BibleBook {
    #[must_use]
    pub fn new(
        id: i64,
        short_title: impl Into<String>,
        long_title: impl Into<String>,
        position: u32,
    ) -> Self {
        Self {
            id,
            short_title: short_title.into(),
            long_title: long_title.into(),
            position,
        }
    }
}

/// The book currently shown by a tab in book-reading mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedBook {
    /// Short book code, as used by the verse-count table and catalog.
    pub code: String,
    /// Title shown in the book selection button.
    pub title: String,
}

impl SelectedBook {
    #[must_use]
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }
}

/// Registry of all known books, keyed by id.
///
/// # Examples
///
/// ```
/// use versenav::domain::{BibleBook, BookRegistry};
///
/// let registry = BookRegistry::new(vec![
///     BibleBook::new(1, "Gen", "Genesis", 1),
///     BibleBook::new(2, "Exo", "Exodus", 2),
/// ]);
///
/// assert_eq!(registry.get(2).map(|b| b.short_title.as_str()), Some("Exo"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookRegistry {
    books: HashMap<i64, BibleBook>,
}

impl BookRegistry {
    #[must_use]
    pub fn new(books: Vec<BibleBook>) -> Self {
        Self {
            books: books.into_iter().map(|b| (b.id, b)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&BibleBook> {
        self.books.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
