//! Interfaces of the services the worker calls into.
//!
//! Text retrieval, translation management and the tag database live outside
//! this crate. The host implements these traits and hands them to
//! [`BrowserWorker`](super::BrowserWorker).

use crate::domain::{BibleBook, Result, TagInfo, VerseRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which books a translation contains.
pub trait BookCatalog: Send {
    /// Short codes of all books of `translation_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read.
    fn book_list(&self, translation_id: &str) -> Result<HashSet<String>>;
}

/// The tag database.
pub trait TagCatalog: Send {
    /// # Errors
    ///
    /// Returns an error when the tag store cannot be read.
    fn tag_count(&self) -> Result<u32>;

    /// All tags, in menu order.
    ///
    /// # Errors
    ///
    /// Returns an error when the tag store cannot be read.
    fn list_tags(&self) -> Result<Vec<TagInfo>>;
}

/// Replaces the verse content rendered in a tab.
pub trait TextLoader: Send {
    /// Renders either `book` or the verses tagged with `tag_ids` into the tab.
    ///
    /// Returns the book ids of the rendered verses in presentation order.
    ///
    /// # Errors
    ///
    /// Returns an error when the text cannot be loaded.
    fn request_text_update(
        &mut self,
        tab_id: &str,
        book: Option<&str>,
        tag_ids: Option<&[i64]>,
        reset_view: bool,
    ) -> Result<Vec<i64>>;
}

/// Output format of [`CommunicationController::request_verses_for_selected_tags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderFormat {
    Html,
    DocExport,
}

/// Result of a tagged-verse request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerseDataset {
    /// Rendered markup, for [`RenderFormat::Html`].
    Markup(String),
    /// Books in canonical order plus verses sorted by absolute verse number,
    /// for [`RenderFormat::DocExport`].
    Structured {
        books: Vec<BibleBook>,
        verses: Vec<VerseRecord>,
    },
}

/// Fetches verses for a set of tags.
pub trait CommunicationController: Send {
    /// # Errors
    ///
    /// Returns an error when the verses cannot be fetched.
    fn request_verses_for_selected_tags(
        &mut self,
        tab_id: Option<&str>,
        tag_ids: &[i64],
        format: RenderFormat,
        include_meta_info: bool,
    ) -> Result<VerseDataset>;
}
