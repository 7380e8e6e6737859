//! Domain layer for the verse navigation coordinator.
//!
//! This module contains the core domain types, independent of any rendering
//! toolkit or collaborator implementation.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Bible books and the id-keyed book registry
//! - [`verse`]: Verse records, locations and reference parsing
//! - [`tag`]: Tag entries and catalog listings

pub mod book;
pub mod error;
pub mod tag;
pub mod verse;

pub use book::{BibleBook, BookRegistry, SelectedBook};
pub use error::{BrowserError, Result};
pub use tag::{TagEntry, TagInfo};
pub use verse::{parse_reference, VerseLocation, VerseRecord};
