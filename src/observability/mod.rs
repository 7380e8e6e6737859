//! Structured logging to a rotating JSON log file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt JSON layer → RotatingLogFile
//! ```
//!
//! - **Location**: `<data_dir>/versenav.log`
//! - **Rotation**: at 10 MB, keeping 3 numbered backups
//! - **Format**: one JSON object per event, with the current span
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingLogFile;
pub use init::{init_tracing, LOG_FILE_NAME};
