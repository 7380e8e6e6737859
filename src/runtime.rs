//! Reference host driving the coordinator.
//!
//! [`Coordinator`] owns the application state and everything the returned
//! [`Action`]s talk to: the worker, the settings store, the view and the
//! export sink. Worker messages are queued as JSON payloads and only serviced
//! on [`Coordinator::pump`], so every response is applied in a later turn than
//! the event that requested it.
//!
//! ```text
//! dispatch(Event) → handle_event → Actions ─┬→ ViewHost / SettingsStore / DocumentSink
//!                                           └→ queue ─ pump() → BrowserWorker
//!                                                          └→ dispatch(Event::WorkerResponse)
//! ```

use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::{BrowserError, Result};
use crate::export::{DocumentExporter, DocumentSink};
use crate::overlay::OverlayPosition;
use crate::storage::models::{SELECTED_BOOK, SELECTED_TAGS, TAG_LIST_WIDTH};
use crate::storage::{SelectedBookSetting, SelectedTagsSetting, SettingsStore};
use crate::worker::{BrowserWorker, WorkerMessage, WorkerResponse};
use crate::Config;
use std::collections::VecDeque;

/// The view side of the host.
pub trait ViewHost {
    fn scroll_to(&mut self, anchor: &str);

    fn scroll_to_top(&mut self, tab_id: &str);

    fn open_tag_reference_box(&mut self, title: &str, position: OverlayPosition);

    fn show_tag_reference_verses(&mut self, markup: &str);

    fn set_book_statistics_button(&mut self, enabled: bool);

    /// Called after an event that changed what is on screen.
    fn render(&mut self, _state: &AppState) {}
}

/// Single-threaded coordinator loop.
pub struct Coordinator {
    state: AppState,
    worker: BrowserWorker,
    settings: Box<dyn SettingsStore>,
    view: Box<dyn ViewHost>,
    export_sink: Box<dyn DocumentSink>,
    exporter: DocumentExporter,

    /// Serialized worker messages awaiting [`Coordinator::pump`].
    pending: VecDeque<String>,
}

impl Coordinator {
    #[must_use]
    pub fn new(
        config: &Config,
        worker: BrowserWorker,
        settings: Box<dyn SettingsStore>,
        view: Box<dyn ViewHost>,
        export_sink: Box<dyn DocumentSink>,
    ) -> Self {
        Self {
            state: AppState::new(config),
            worker,
            settings,
            view,
            export_sink,
            exporter: DocumentExporter::new(config.reference_separator),
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of worker messages not yet serviced.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Handles `event` and executes the resulting actions.
    ///
    /// Returns whether the view was re-rendered.
    ///
    /// # Errors
    ///
    /// Returns the handler's error with state unchanged, or the first error
    /// raised while executing actions. Remaining actions still run.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (should_render, actions) = handle_event(&mut self.state, event)?;
        tracing::debug!(
            action_count = actions.len(),
            should_render = should_render,
            "event handled successfully"
        );

        let mut first_error = None;
        for action in actions {
            if let Err(e) = self.execute_action(action) {
                tracing::error!(error = %e, "action failed");
                first_error.get_or_insert(e);
            }
        }

        if should_render {
            self.view.render(&self.state);
        }

        first_error.map_or(Ok(should_render), Err)
    }

    /// Services queued worker messages, including those queued while
    /// servicing, until the queue is empty.
    ///
    /// # Errors
    ///
    /// Stops at the first failing response and returns its error; messages
    /// still queued are kept for the next call.
    pub fn pump(&mut self) -> Result<bool> {
        let mut rendered = false;
        while self.pending.front().is_some() {
            rendered |= self.pump_one()?;
        }
        Ok(rendered)
    }

    /// Services the oldest queued worker message, if any.
    ///
    /// # Errors
    ///
    /// Returns the error raised while applying the response.
    pub fn pump_one(&mut self) -> Result<bool> {
        let Some(payload) = self.pending.pop_front() else {
            return Ok(false);
        };

        let Some(reply) = self.worker.on_message(&payload) else {
            return Err(BrowserError::Worker("worker returned no response".to_string()));
        };
        let response: WorkerResponse = serde_json::from_str(&reply)
            .map_err(|e| BrowserError::Worker(format!("failed to parse worker response: {e}")))?;

        self.dispatch(&Event::WorkerResponse(response))
    }

    /// Re-applies the persisted selection and panel width to the current tab.
    ///
    /// A stored book is re-selected through the catalog check, so it is only
    /// applied once [`Coordinator::pump`] runs. A stored tag selection with
    /// mismatched lists is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store cannot be read.
    pub fn restore_settings(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("restore_settings").entered();

        if let Some(width) = self
            .settings
            .get(TAG_LIST_WIDTH)?
            .and_then(|value| value.as_u64())
            .and_then(|width| u32::try_from(width).ok())
        {
            self.state.tag_list_width = Some(width);
        }

        if let Some(book) = self.read_setting::<SelectedBookSetting>(SELECTED_BOOK)? {
            tracing::debug!(book = %book.code, "restoring selected book");
            self.dispatch(&Event::BookSelected {
                code: book.code,
                title: book.name,
            })?;
            return Ok(());
        }

        if let Some(tags) = self.read_setting::<SelectedTagsSetting>(SELECTED_TAGS)? {
            if tags.is_empty() {
                return Ok(());
            }
            let restored = self.dispatch(&Event::TagSelectionRestored {
                id_list: tags.id_list,
                title_list: tags.title_list,
            });
            match restored {
                Err(e @ BrowserError::InconsistentSelection { .. }) => {
                    tracing::warn!(error = %e, "skipping stored tag selection");
                }
                other => {
                    other?;
                }
            }
        }

        Ok(())
    }

    fn read_setting<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let Some(value) = self.settings.get(path)? else {
            return Ok(None);
        };
        if value.is_null() {
            return Ok(None);
        }

        match serde_json::from_value(value) {
            Ok(setting) => Ok(Some(setting)),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "ignoring malformed setting");
                Ok(None)
            }
        }
    }

    fn post_worker_message(&mut self, message: &WorkerMessage) -> Result<()> {
        let payload = serde_json::to_string(message)
            .map_err(|e| BrowserError::Worker(format!("failed to serialize worker message: {e}")))?;
        tracing::debug!(payload_len = payload.len(), "queueing message for worker");
        self.pending.push_back(payload);
        Ok(())
    }

    fn execute_action(&mut self, action: Action) -> Result<()> {
        tracing::trace!(action = ?action, "executing action");

        match action {
            Action::PostToWorker(message) => self.post_worker_message(&message),
            Action::PersistSetting { path, value } => self.settings.set(&path, value),
            Action::ScrollTo { anchor } => {
                self.view.scroll_to(&anchor);
                Ok(())
            }
            Action::ScrollToTop { tab_id } => {
                self.view.scroll_to_top(&tab_id);
                Ok(())
            }
            Action::OpenTagReferenceBox { title, position } => {
                self.view.open_tag_reference_box(&title, position);
                Ok(())
            }
            Action::ShowTagReferenceVerses { markup } => {
                self.view.show_tag_reference_verses(&markup);
                Ok(())
            }
            Action::SetBookStatisticsButton { enabled } => {
                self.view.set_book_statistics_button(enabled);
                Ok(())
            }
            Action::WriteExport(document) => self.exporter.write(&document, self.export_sink.as_mut()),
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
