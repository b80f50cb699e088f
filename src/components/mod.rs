//! UI Components for the Echoplay application.
//!
//! This module contains all Leptos components organized by function:
//!
//! # Primitives
//! - [`Button`] - generic button
//! - [`Modal`] - generic modal dialog shell
//!
//! # Feature Components
//! - [`UploadModal`] - song submission form and workflow wiring
//! - [`ToasterHost`] - toast notifications
//! - [`SongList`] - cached song listing

mod button;
mod modal;
mod song_list;
mod toaster;
mod upload_modal;

pub use button::*;
pub use modal::*;
pub use song_list::*;
pub use toaster::*;
pub use upload_modal::*;
