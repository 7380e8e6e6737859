//! Current-item and search-hit tracking for the navigation index.

use super::index::NavigationItem;

/// The rendered navigation index of one tab plus its highlight state.
///
/// At most one item carries `nav_highlighted` at any time. Any number of items
/// may carry `search_hit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPane {
    items: Vec<NavigationItem>,
    /// 0-based index of the last requested highlight, `None` before any request.
    last_highlighted: Option<usize>,
}

impl NavigationPane {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the item set.
    ///
    /// The previous highlight index referred to the old item set and is dropped.
    pub fn rebuild(&mut self, items: Vec<NavigationItem>) {
        self.items = items;
        self.last_highlighted = None;
    }

    /// Marks the item at the 1-based `index` as current.
    ///
    /// When either the requested index or the previously recorded one is out of
    /// bounds for the current items, nothing changes visually but the request is
    /// still recorded. Returns whether the items changed.
    pub fn highlight(&mut self, index: usize) -> bool {
        let requested = index.checked_sub(1);
        let previous = self.last_highlighted;
        self.last_highlighted = requested;

        let len = self.items.len();
        let Some(requested) = requested.filter(|&i| i < len) else {
            tracing::debug!(index, item_count = len, "highlight out of bounds, ignored");
            return false;
        };
        if previous.is_some_and(|p| p >= len) {
            tracing::debug!(index, item_count = len, "stale previous highlight, ignored");
            return false;
        }

        for item in self.items.iter_mut().filter(|item| item.nav_highlighted) {
            item.nav_highlighted = false;
        }
        self.items[requested].nav_highlighted = true;
        true
    }

    /// Flags the item at the 1-based `index` as a search hit. Out-of-range
    /// indices are ignored.
    pub fn highlight_search_result(&mut self, index: usize) -> bool {
        match index.checked_sub(1).and_then(|i| self.items.get_mut(i)) {
            Some(item) => {
                item.search_hit = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_search_results(&mut self) {
        for item in &mut self.items {
            item.search_hit = false;
        }
    }

    /// The currently highlighted item, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<&NavigationItem> {
        self.items.iter().find(|item| item.nav_highlighted)
    }

    /// 0-based index of the last highlight request.
    #[must_use]
    pub const fn last_highlighted(&self) -> Option<usize> {
        self.last_highlighted
    }

    #[must_use]
    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    /// Finds the 1-based index of the book item whose anchor code is `code`.
    #[must_use]
    pub fn book_position(&self, code: &str) -> Option<usize> {
        self.items.iter().find_map(|item| match &item.anchor {
            super::NavigationAnchor::Book { code: c, position } if c == code => Some(*position),
            _ => None,
        })
    }
}
