//! Tag selection, the tag menu and its coalesced search filter.
//!
//! # Modules
//!
//! - [`selection`]: Ordered `{id, title}` selection of a tag-collection tab
//! - [`filter`]: Coalescing timer and title matching for the tag search field
//! - [`menu`]: Rows of the global tag menu

pub mod filter;
pub mod menu;
pub mod selection;

pub use filter::{title_matches, CoalescingTimer};
pub use menu::{TagMenu, TagMenuEntry};
pub use selection::TagSelection;
