//! Backend services.
//!
//! This module provides everything that talks to (or stands in for)
//! the hosted backend:
//!
//! # Services
//!
//! - [`backend`] - storage/table/auth client and the [`backend::SongLibraryApi`] boundary
//! - [`session`] - current-identity lookup
//! - [`submit`] - the song submission workflow

pub mod backend;
pub mod session;
pub mod submit;

pub use backend::*;
pub use session::*;
pub use submit::*;
