//! Asynchronous collaborator calls.
//!
//! The coordinator never awaits a collaborator. It emits a [`WorkerMessage`],
//! and the host later feeds the matching [`WorkerResponse`] back as an event.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with request origins
//! - `collaborators`: Traits of the external services the worker calls
//! - `handler`: Worker implementation and message processing logic

pub mod collaborators;
pub mod handler;
pub mod messages;

pub use collaborators::{
    BookCatalog, CommunicationController, RenderFormat, TagCatalog, TextLoader, VerseDataset,
};
pub use handler::BrowserWorker;
pub use messages::{RequestOrigin, WorkerMessage, WorkerResponse};
