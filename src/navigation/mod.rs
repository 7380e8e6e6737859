//! Side navigation index: construction and highlighting.
//!
//! # Modules
//!
//! - [`index`]: Builds the ordered navigation entries for a tab's mode
//! - [`highlight`]: Tracks the current entry and search-hit entries
//!
//! # Example
//!
//! ```rust
//! use versenav::app::ViewMode;
//! use versenav::domain::{BookRegistry, SelectedBook};
//! use versenav::navigation::{build, NavigationContext, NavigationPane, VerseCountTable};
//!
//! let counts = VerseCountTable::from_chapters("Gen", &[31, 25]);
//! let registry = BookRegistry::default();
//! let context = NavigationContext::new(&counts, &registry, &[]);
//! let view = ViewMode::Book(SelectedBook::new("Gen", "Genesis"));
//!
//! let mut pane = NavigationPane::default();
//! pane.rebuild(build(&view, &context));
//! pane.highlight(2);
//! assert_eq!(pane.highlighted().map(|item| item.index), Some(2));
//! ```

pub mod highlight;
pub mod index;

pub use highlight::NavigationPane;
pub use index::{
    build, NavigationAnchor, NavigationContext, NavigationItem, VerseCountEntry,
    VerseCountTable, TERMINATOR_KEY,
};
