//! The global tag selection menu.

use super::filter::{title_matches, CoalescingTimer};
use super::selection::TagSelection;
use crate::domain::TagInfo;

/// One checkbox row of the tag menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMenuEntry {
    pub tag: TagInfo,
    pub checked: bool,
    /// Cleared when the row does not match the current filter query.
    pub visible: bool,
}

/// Rows of the tag menu, their filter state and whether they were ever loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMenu {
    entries: Vec<TagMenuEntry>,
    populated: bool,
    query: String,
    filter_timer: CoalescingTimer<String>,
}

impl TagMenu {
    #[must_use]
    pub const fn new(filter_window_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            populated: false,
            query: String::new(),
            filter_timer: CoalescingTimer::new(filter_window_ms),
        }
    }

    /// Marks the menu as populated. Returns `true` only on the first call, when
    /// the caller must request the tag list.
    pub fn begin_population(&mut self) -> bool {
        !std::mem::replace(&mut self.populated, true)
    }

    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// Replaces all rows. A row is checked iff its title is part of `selection`.
    pub fn load(&mut self, tags: &[TagInfo], selection: Option<&TagSelection>) {
        self.entries = tags
            .iter()
            .map(|tag| TagMenuEntry {
                checked: selection.is_some_and(|s| s.is_selected(&tag.title)),
                visible: title_matches(&tag.title, &self.query),
                tag: tag.clone(),
            })
            .collect();

        tracing::debug!(tag_count = self.entries.len(), "tag menu loaded");
    }

    /// Re-derives the checked state of every row, e.g. after a tab switch.
    pub fn sync_checked(&mut self, selection: Option<&TagSelection>) {
        for entry in &mut self.entries {
            entry.checked = selection.is_some_and(|s| s.is_selected(&entry.tag.title));
        }
    }

    /// Schedules a filter pass for `query`, superseding any pending one.
    pub fn schedule_filter(&mut self, query: &str, now_ms: u64) {
        self.filter_timer.schedule(query.to_string(), now_ms);
    }

    /// Runs the pending filter pass if its idle window has elapsed.
    ///
    /// Returns whether a filter pass ran.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(query) = self.filter_timer.take_ready(now_ms) else {
            return false;
        };
        self.apply_filter(&query);
        true
    }

    fn apply_filter(&mut self, query: &str) {
        for entry in &mut self.entries {
            entry.visible = title_matches(&entry.tag.title, query);
        }
        self.query = query.to_string();

        tracing::debug!(
            query = %self.query,
            visible = self.entries.iter().filter(|e| e.visible).count(),
            "tag menu filtered"
        );
    }

    /// Updates the assignment count of the first row titled `title`.
    pub fn update_assignment_count(&mut self, title: &str, count: u32) -> bool {
        match self.entries.iter_mut().find(|entry| entry.tag.title == title) {
            Some(entry) => {
                entry.tag.global_assignment_count = count;
                true
            }
            None => false,
        }
    }

    /// Renames the first row titled `old_title`.
    pub fn rename(&mut self, old_title: &str, new_title: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.tag.title == old_title) {
            entry.tag.title = new_title.to_string();
            entry.visible = title_matches(new_title, &self.query);
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[TagMenuEntry] {
        &self.entries
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &TagMenuEntry> {
        self.entries.iter().filter(|entry| entry.visible)
    }

    #[must_use]
    pub const fn has_pending_filter(&self) -> bool {
        self.filter_timer.is_pending()
    }
}

impl Default for TagMenu {
    fn default() -> Self {
        Self::new(crate::DEFAULT_TAG_FILTER_DEBOUNCE_MS)
    }
}
