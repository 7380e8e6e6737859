//! Export of tagged verses.
//!
//! # Modules
//!
//! - [`segment`]: Splits a book's verses into runs of consecutive verses
//! - [`document`]: Renders the runs into a document and writes it to a sink

pub mod document;
pub mod segment;

pub use document::{DocLine, DocumentExporter, DocumentSink, ExportDocument, FileSink, TextSink};
pub use segment::{segment, VerseBlock};
