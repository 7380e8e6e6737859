//! Request and response protocol between the coordinator and the worker.
//!
//! Every message is serde-serialisable so it can cross a thread or IPC
//! boundary as JSON. Tab-scoped requests carry a [`RequestOrigin`]; the
//! matching response echoes it back so the coordinator can drop responses
//! that were superseded in the meantime.

use crate::domain::{BibleBook, SelectedBook, TagInfo, VerseRecord};
use serde::{Deserialize, Serialize};

/// The tab and tab generation a request was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestOrigin {
    pub tab_id: String,
    pub generation: u64,
}

impl RequestOrigin {
    #[must_use]
    pub fn new(tab_id: impl Into<String>, generation: u64) -> Self {
        Self {
            tab_id: tab_id.into(),
            generation,
        }
    }
}

/// Generates convenience constructors for `WorkerMessage` variants.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant { $($field,)* }
                }
            )*
        }
    };
}

worker_message_builders! {
    check_book(CheckBook { origin: RequestOrigin, translation_id: String, book: SelectedBook }),
    load_text(LoadText {
        origin: RequestOrigin,
        book: Option<String>,
        tag_ids: Option<Vec<i64>>,
        reset_view: bool,
    }),
    count_tags(CountTags { origin: RequestOrigin }),
    list_tags_for_menu(ListTagsForMenu {}),
    load_tag_reference_verses(LoadTagReferenceVerses { tab_id: String, tag_id: i64 }),
    load_export_data(LoadExportData { origin: RequestOrigin, tag_ids: Vec<i64> }),
}

/// Requests sent from the coordinator to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Check that a book exists in a translation before selecting it.
    CheckBook {
        origin: RequestOrigin,
        translation_id: String,
        book: SelectedBook,
    },

    /// Refresh the rendered verse content of a tab.
    ///
    /// Exactly one of `book` and `tag_ids` is set.
    LoadText {
        origin: RequestOrigin,
        book: Option<String>,
        tag_ids: Option<Vec<i64>>,
        /// Scroll back to the top once loaded.
        reset_view: bool,
    },

    /// Count all tags, for the book tag statistics button.
    CountTags { origin: RequestOrigin },

    /// List all tags for the global tag menu.
    ListTagsForMenu {},

    /// Render the verses of one tag as markup for the reference box.
    LoadTagReferenceVerses { tab_id: String, tag_id: i64 },

    /// Fetch the structured dataset of the selected tags for export.
    LoadExportData {
        origin: RequestOrigin,
        tag_ids: Vec<i64>,
    },
}

impl WorkerMessage {
    /// Origin of tab-scoped requests, `None` for global ones.
    #[must_use]
    pub const fn origin(&self) -> Option<&RequestOrigin> {
        match self {
            Self::CheckBook { origin, .. }
            | Self::LoadText { origin, .. }
            | Self::CountTags { origin }
            | Self::LoadExportData { origin, .. } => Some(origin),
            Self::ListTagsForMenu {} | Self::LoadTagReferenceVerses { .. } => None,
        }
    }
}

/// Responses sent from the worker back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    BookChecked {
        origin: RequestOrigin,
        book: SelectedBook,
        /// Whether the translation contains the book.
        available: bool,
    },

    /// The tab's verse content was replaced.
    TextLoaded {
        origin: RequestOrigin,
        /// Book ids of the rendered verses, in presentation order.
        rendered_book_ids: Vec<i64>,
        reset_view: bool,
    },

    TagCount { origin: RequestOrigin, count: u32 },

    TagsForMenuLoaded { tags: Vec<TagInfo> },

    TagReferenceVersesLoaded { markup: String },

    ExportDataLoaded {
        origin: RequestOrigin,
        books: Vec<BibleBook>,
        verses: Vec<VerseRecord>,
    },

    /// A collaborator failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    /// Origin echoed from a tab-scoped request.
    #[must_use]
    pub const fn origin(&self) -> Option<&RequestOrigin> {
        match self {
            Self::BookChecked { origin, .. }
            | Self::TextLoaded { origin, .. }
            | Self::TagCount { origin, .. }
            | Self::ExportDataLoaded { origin, .. } => Some(origin),
            Self::TagsForMenuLoaded { .. }
            | Self::TagReferenceVersesLoaded { .. }
            | Self::Error { .. } => None,
        }
    }
}
