//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the host (the UI shell, or
//! [`crate::runtime::Coordinator`]) and the domain, navigation, tag and export
//! layers. Every UI event and every worker response passes through
//! [`handle_event`].
//!
//! # Architecture
//!
//! ```text
//! UI Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                          ↑                                  ↓
//!                          └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: View mode and popover slot types
//! - [`state`]: Tabs and the central application state container
//!
//! # Example
//!
//! ```rust
//! use versenav::app::{handle_event, AppState, Event};
//! use versenav::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! let (render, actions) = handle_event(
//!     &mut state,
//!     &Event::TabAdded { id: "tab-1".into(), translation_id: "KJV".into() },
//! )?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), versenav::BrowserError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{ActivePopover, PopoverKind, ViewMode};
pub use state::{AppState, Tab};
