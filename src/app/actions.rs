//! Actions representing side effects to be executed by the host.
//!
//! The event handler returns a `Vec<Action>` after processing each event, so
//! several side effects can be queued atomically. The host executes them in
//! order: [`crate::runtime::Coordinator`] is the reference implementation.
//!
//! # Example
//!
//! ```rust
//! use versenav::app::Action;
//! use versenav::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::list_tags_for_menu())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::export::ExportDocument;
use crate::overlay::OverlayPosition;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hands an asynchronous collaborator request to the worker.
    PostToWorker(WorkerMessage),

    /// Stores a value in the settings store under a dotted path.
    ///
    /// A `null` value clears the setting.
    PersistSetting {
        path: String,
        value: serde_json::Value,
    },

    /// Scrolls the tab's verse list to an anchor such as `"tab-1 3:1"`.
    ScrollTo { anchor: String },

    /// Scrolls the tab's verse list back to the top.
    ScrollToTop { tab_id: String },

    /// Opens the tag reference box, empty until its verses arrive.
    OpenTagReferenceBox {
        title: String,
        position: OverlayPosition,
    },

    /// Fills the open tag reference box.
    ShowTagReferenceVerses { markup: String },

    /// Enables or disables the book tag statistics button.
    SetBookStatisticsButton { enabled: bool },

    /// Writes a rendered export through the host's document sink.
    WriteExport(ExportDocument),
}
