//! View mode and popover state types.
//!
//! # State Machine
//!
//! Every tab displays exactly one content source:
//! - **Empty**: Nothing selected yet
//! - **Book**: A single book, navigated by chapter
//! - **`TagCollection`**: All verses carrying the selected tags, navigated by book
//!
//! The mode's data lives inside the variant, so a tab can never hold a
//! selected book and a tag selection at the same time.
//!
//! At most one popover is open application-wide; see [`ActivePopover`].
//!
//! # Example
//!
//! ```rust
//! use versenav::app::{ActivePopover, PopoverKind, ViewMode};
//! use versenav::domain::SelectedBook;
//! use versenav::overlay::OverlayPosition;
//!
//! let view = ViewMode::Book(SelectedBook::new("Gen", "Genesis"));
//! assert!(view.selected_book().is_some());
//!
//! let mut popover = ActivePopover::default();
//! popover.toggle(PopoverKind::BookMenu, OverlayPosition::default());
//! popover.toggle(PopoverKind::TagMenu, OverlayPosition::default());
//! assert!(popover.is_open(PopoverKind::TagMenu));
//! assert!(!popover.is_open(PopoverKind::BookMenu));
//! ```

use crate::domain::SelectedBook;
use crate::overlay::OverlayPosition;
use crate::tags::TagSelection;

/// Content source of a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Empty,
    Book(SelectedBook),
    TagCollection(TagSelection),
}

impl ViewMode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Book(_) => "book",
            Self::TagCollection(_) => "tag_collection",
        }
    }

    #[must_use]
    pub const fn selected_book(&self) -> Option<&SelectedBook> {
        match self {
            Self::Book(book) => Some(book),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag_selection(&self) -> Option<&TagSelection> {
        match self {
            Self::TagCollection(selection) => Some(selection),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// The popovers sharing the single open slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoverKind {
    BookMenu,
    TagMenu,
    DisplayMenu,
}

/// The single open-popover slot.
///
/// Opening a popover replaces whichever one was open; toggling the open one
/// closes it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivePopover {
    open: Option<(PopoverKind, OverlayPosition)>,
}

impl ActivePopover {
    /// Toggles `kind`. Returns `true` when `kind` is open afterwards.
    pub fn toggle(&mut self, kind: PopoverKind, position: OverlayPosition) -> bool {
        if self.is_open(kind) {
            self.open = None;
            false
        } else {
            self.open = Some((kind, position));
            true
        }
    }

    /// Closes whatever is open. Returns whether anything was open.
    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    #[must_use]
    pub fn is_open(&self, kind: PopoverKind) -> bool {
        self.open.is_some_and(|(open, _)| open == kind)
    }

    #[must_use]
    pub fn current(&self) -> Option<(PopoverKind, OverlayPosition)> {
        self.open
    }
}
