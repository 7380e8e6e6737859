//! Navigation index construction.
//!
//! [`build`] is a pure function of the tab's [`ViewMode`] and a
//! [`NavigationContext`]: identical inputs always yield the identical ordered
//! list of [`NavigationItem`]s.
//!
//! - **Book mode**: one item per chapter, read from the verse-count table of the
//!   selected book until the [`TERMINATOR_KEY`] entry.
//! - **Tag collection mode**: one item per distinct book, in the order the
//!   rendered verse collection presents them.
//! - **Empty mode**: no items.

use crate::app::ViewMode;
use crate::domain::BookRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Key that ends a book's chapter list in the verse-count table.
pub const TERMINATOR_KEY: &str = "nil";

/// Scroll target of a navigation item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationAnchor {
    /// Chapter number within the selected book.
    Chapter(u32),
    /// Book section inside a tagged verse collection.
    Book {
        /// Short book code.
        code: String,
        /// Sequential position of the book section, starting at 1.
        position: usize,
    },
}

/// One clickable entry of the side navigation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// 1-based position in the index.
    pub index: usize,
    pub label: String,
    pub anchor: NavigationAnchor,
    pub nav_highlighted: bool,
    pub search_hit: bool,
}

impl NavigationItem {
    fn new(index: usize, label: String, anchor: NavigationAnchor) -> Self {
        Self {
            index,
            label,
            anchor,
            nav_highlighted: false,
            search_hit: false,
        }
    }
}

/// One `(key, verse count)` pair of a book's chapter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseCountEntry {
    pub key: String,
    pub verse_count: u32,
}

/// Per-book chapter verse counts, keyed by book code.
///
/// Entries are kept in table order; a chapter list ends at the entry whose key
/// is [`TERMINATOR_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseCountTable {
    books: HashMap<String, Vec<VerseCountEntry>>,
}

impl VerseCountTable {
    /// Builds a table holding a single book whose chapters have the given
    /// verse counts, followed by the terminator entry.
    #[must_use]
    pub fn from_chapters(code: &str, verse_counts: &[u32]) -> Self {
        let mut table = Self::default();
        table.insert_chapters(code, verse_counts);
        table
    }

    /// Adds or replaces a book using chapter numbers `1..=n` as keys.
    pub fn insert_chapters(&mut self, code: &str, verse_counts: &[u32]) {
        let mut entries: Vec<VerseCountEntry> = verse_counts
            .iter()
            .enumerate()
            .map(|(i, &verse_count)| VerseCountEntry {
                key: (i + 1).to_string(),
                verse_count,
            })
            .collect();
        entries.push(VerseCountEntry {
            key: TERMINATOR_KEY.to_string(),
            verse_count: 0,
        });
        self.books.insert(code.to_string(), entries);
    }

    /// Adds or replaces a book with raw entries, terminator included.
    pub fn insert(&mut self, code: &str, entries: Vec<VerseCountEntry>) {
        self.books.insert(code.to_string(), entries);
    }

    /// Number of chapters of `code` before the terminator, `None` for an unknown book.
    #[must_use]
    pub fn chapter_count(&self, code: &str) -> Option<usize> {
        self.books.get(code).map(|entries| {
            entries
                .iter()
                .take_while(|entry| entry.key != TERMINATOR_KEY)
                .count()
        })
    }
}

/// Inputs the index builder reads besides the tab's mode.
#[derive(Debug, Clone, Copy)]
pub struct NavigationContext<'a> {
    pub verse_counts: &'a VerseCountTable,
    pub registry: &'a BookRegistry,
    /// Book ids of the rendered verse collection, in presentation order.
    pub rendered_book_ids: &'a [i64],
}

impl<'a> NavigationContext<'a> {
    #[must_use]
    pub const fn new(
        verse_counts: &'a VerseCountTable,
        registry: &'a BookRegistry,
        rendered_book_ids: &'a [i64],
    ) -> Self {
        Self {
            verse_counts,
            registry,
            rendered_book_ids,
        }
    }
}

/// Builds the navigation index for a tab.
#[must_use]
pub fn build(view: &ViewMode, context: &NavigationContext<'_>) -> Vec<NavigationItem> {
    let items = match view {
        ViewMode::Empty => vec![],
        ViewMode::Book(book) => build_chapter_items(&book.code, context.verse_counts),
        ViewMode::TagCollection(_) => {
            build_book_items(context.rendered_book_ids, context.registry)
        }
    };

    tracing::debug!(item_count = items.len(), mode = view.name(), "navigation index built");
    items
}

fn build_chapter_items(code: &str, verse_counts: &VerseCountTable) -> Vec<NavigationItem> {
    let chapter_count = verse_counts.chapter_count(code).unwrap_or_else(|| {
        tracing::debug!(book = %code, "no verse counts for book");
        0
    });

    (1..=chapter_count)
        .map(|index| {
            #[allow(clippy::cast_possible_truncation)]
            let chapter = index as u32;
            NavigationItem::new(index, chapter.to_string(), NavigationAnchor::Chapter(chapter))
        })
        .collect()
}

fn build_book_items(rendered_book_ids: &[i64], registry: &BookRegistry) -> Vec<NavigationItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for &book_id in rendered_book_ids {
        if !seen.insert(book_id) {
            continue;
        }

        let Some(book) = registry.get(book_id) else {
            tracing::debug!(book_id, "rendered book missing from registry, skipping");
            continue;
        };

        let position = items.len() + 1;
        items.push(NavigationItem::new(
            position,
            book.long_title.clone(),
            NavigationAnchor::Book {
                code: book.short_title.clone(),
                position,
            },
        ));
    }

    items
}
