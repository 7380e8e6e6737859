//! Ordered tag selection derived from the checked tag checkboxes.
//!
//! The selection is a single list of `{id, title}` entries, so ids and titles
//! can never drift out of alignment and titles containing `", "` need no
//! escaping. [`TagSelection::id_list`] and [`TagSelection::title_list`] expose
//! the two parallel lists the collaborators and the settings store expect.

use crate::domain::{BrowserError, Result, TagEntry};
use serde::{Deserialize, Serialize};

/// Separator used when titles are joined for display.
pub const DISPLAY_SEPARATOR: &str = ", ";

/// The tags a tab shows in tag-collection mode, in rendering order.
///
/// # Examples
///
/// ```
/// use versenav::domain::TagEntry;
/// use versenav::tags::TagSelection;
///
/// let mut selection = TagSelection::from_checked(&[
///     TagEntry::new(4, "grace"),
///     TagEntry::new(9, "faith"),
/// ]);
/// selection.rename_tag("faith", "trust");
///
/// assert!(selection.is_selected("trust"));
/// assert!(!selection.is_selected("faith"));
/// assert_eq!(selection.id_list(), vec![4, 9]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSelection {
    entries: Vec<TagEntry>,
}

impl TagSelection {
    /// Builds the selection from the checked entries, keeping their order.
    #[must_use]
    pub fn from_checked(checked: &[TagEntry]) -> Self {
        Self {
            entries: checked.to_vec(),
        }
    }

    #[must_use]
    pub fn from_entries(entries: Vec<TagEntry>) -> Self {
        Self { entries }
    }

    /// Zips parallel id and title lists, as restored from settings.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::InconsistentSelection`] when the lists differ in length.
    pub fn from_lists(ids: &[i64], titles: &[String]) -> Result<Self> {
        if ids.len() != titles.len() {
            return Err(BrowserError::InconsistentSelection {
                ids: ids.len(),
                titles: titles.len(),
            });
        }

        Ok(Self {
            entries: ids
                .iter()
                .zip(titles)
                .map(|(&id, title)| TagEntry::new(id, title.clone()))
                .collect(),
        })
    }

    /// Whether a tag with exactly this title is part of the selection.
    #[must_use]
    pub fn is_selected(&self, title: &str) -> bool {
        self.entries.iter().any(|entry| entry.title == title)
    }

    /// Renames the first entry titled `old_title`, keeping its id and position.
    ///
    /// Returns whether an entry was renamed.
    pub fn rename_tag(&mut self, old_title: &str, new_title: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.title == old_title) {
            Some(entry) => {
                entry.title = new_title.to_string();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn id_list(&self) -> Vec<i64> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    #[must_use]
    pub fn title_list(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.title.clone()).collect()
    }

    /// Titles joined for the tag selection button and the export title line.
    #[must_use]
    pub fn display_titles(&self) -> String {
        self.title_list().join(DISPLAY_SEPARATOR)
    }

    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
