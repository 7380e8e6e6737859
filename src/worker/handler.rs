//! Worker side of the coordinator protocol.
//!
//! [`BrowserWorker`] services [`WorkerMessage`]s by calling the collaborator
//! services and turns every outcome, failures included, into a
//! [`WorkerResponse`]. Collaborator errors never escape as `Err`; they become
//! [`WorkerResponse::Error`] so the coordinator can log them without changing
//! state.

use crate::domain::{BrowserError, Result, SelectedBook};
use crate::worker::collaborators::{
    BookCatalog, CommunicationController, RenderFormat, TagCatalog, TextLoader, VerseDataset,
};
use crate::worker::{RequestOrigin, WorkerMessage, WorkerResponse};

/// Dispatches worker messages to the collaborator services.
pub struct BrowserWorker {
    books: Box<dyn BookCatalog>,
    tags: Box<dyn TagCatalog>,
    text: Box<dyn TextLoader>,
    verses: Box<dyn CommunicationController>,
}

impl BrowserWorker {
    #[must_use]
    pub fn new(
        books: Box<dyn BookCatalog>,
        tags: Box<dyn TagCatalog>,
        text: Box<dyn TextLoader>,
        verses: Box<dyn CommunicationController>,
    ) -> Self {
        Self {
            books,
            tags,
            text,
            verses,
        }
    }

    /// Standardizes failure reporting and success logging across all
    /// collaborator calls.
    fn handle_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "collaborator call successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "collaborator call failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_check_book(
        &self,
        origin: RequestOrigin,
        translation_id: &str,
        book: SelectedBook,
    ) -> WorkerResponse {
        Self::handle_result("check book", self.books.book_list(translation_id), |codes| {
            let available = codes.contains(&book.code);
            tracing::debug!(book = %book.code, translation_id, available, "book checked");
            WorkerResponse::BookChecked {
                origin,
                book,
                available,
            }
        })
    }

    fn handle_load_text(
        &mut self,
        origin: RequestOrigin,
        book: Option<&str>,
        tag_ids: Option<&[i64]>,
        reset_view: bool,
    ) -> WorkerResponse {
        let result = self
            .text
            .request_text_update(&origin.tab_id, book, tag_ids, reset_view);

        Self::handle_result("load text", result, |rendered_book_ids| {
            tracing::debug!(
                tab_id = %origin.tab_id,
                book_count = rendered_book_ids.len(),
                "text loaded"
            );
            WorkerResponse::TextLoaded {
                origin,
                rendered_book_ids,
                reset_view,
            }
        })
    }

    fn handle_count_tags(&self, origin: RequestOrigin) -> WorkerResponse {
        Self::handle_result("count tags", self.tags.tag_count(), |count| {
            WorkerResponse::TagCount { origin, count }
        })
    }

    fn handle_list_tags(&self) -> WorkerResponse {
        Self::handle_result("list tags", self.tags.list_tags(), |tags| {
            tracing::debug!(tag_count = tags.len(), "tags listed for menu");
            WorkerResponse::TagsForMenuLoaded { tags }
        })
    }

    fn handle_tag_reference_verses(&mut self, tab_id: &str, tag_id: i64) -> WorkerResponse {
        let result = self
            .verses
            .request_verses_for_selected_tags(Some(tab_id), &[tag_id], RenderFormat::Html, false)
            .and_then(|dataset| match dataset {
                VerseDataset::Markup(markup) => Ok(markup),
                VerseDataset::Structured { .. } => Err(BrowserError::Worker(
                    "expected markup for tag reference verses".to_string(),
                )),
            });

        Self::handle_result("load tag reference verses", result, |markup| {
            WorkerResponse::TagReferenceVersesLoaded { markup }
        })
    }

    fn handle_export_data(&mut self, origin: RequestOrigin, tag_ids: &[i64]) -> WorkerResponse {
        let result = self
            .verses
            .request_verses_for_selected_tags(None, tag_ids, RenderFormat::DocExport, false)
            .and_then(|dataset| match dataset {
                VerseDataset::Structured { books, verses } => Ok((books, verses)),
                VerseDataset::Markup(_) => Err(BrowserError::Worker(
                    "expected structured verses for export".to_string(),
                )),
            });

        Self::handle_result("load export data", result, |(books, verses)| {
            tracing::debug!(
                book_count = books.len(),
                verse_count = verses.len(),
                "export data loaded"
            );
            WorkerResponse::ExportDataLoaded {
                origin,
                books,
                verses,
            }
        })
    }

    /// Processes a worker message and returns the response for it.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::CheckBook {
                origin,
                translation_id,
                book,
            } => self.handle_check_book(origin, &translation_id, book),

            WorkerMessage::LoadText {
                origin,
                book,
                tag_ids,
                reset_view,
            } => self.handle_load_text(origin, book.as_deref(), tag_ids.as_deref(), reset_view),

            WorkerMessage::CountTags { origin } => self.handle_count_tags(origin),

            WorkerMessage::ListTagsForMenu {} => self.handle_list_tags(),

            WorkerMessage::LoadTagReferenceVerses { tab_id, tag_id } => {
                self.handle_tag_reference_verses(&tab_id, tag_id)
            }

            WorkerMessage::LoadExportData { origin, tag_ids } => {
                self.handle_export_data(origin, &tag_ids)
            }
        }
    }

    /// JSON entry point: decodes a [`WorkerMessage`] payload and encodes the
    /// response.
    ///
    /// Returns `None` when the payload cannot be decoded or the response cannot
    /// be encoded.
    pub fn on_message(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        match serde_json::to_string(&response) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker response");
                None
            }
        }
    }
}

impl std::fmt::Debug for BrowserWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserWorker").finish_non_exhaustive()
    }
}
