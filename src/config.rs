//! Application configuration.
//!
//! Centralized configuration for the Echoplay frontend.
//! In development these are hardcoded. In production they could be
//! loaded from environment or a config file.

/// Backend API base URL.
///
/// The hosted backend project serving auth, storage and the
/// relational store.
pub const BACKEND_URL: &str = "http://localhost:54321";

/// Publishable API key sent with every request.
///
/// Grants anonymous access only; authenticated requests additionally
/// carry the session's bearer token.
pub const ANON_KEY: &str = "echoplay-dev-anon-key";

/// Web storage key holding the session access token.
pub const ACCESS_TOKEN_KEY: &str = "echoplay-access-token";

/// Storage bucket for audio blobs.
pub const SONGS_BUCKET: &str = "songs";

/// Storage bucket for cover images.
pub const IMAGES_BUCKET: &str = "images";

/// Table holding one row per submitted song.
pub const SONGS_TABLE: &str = "songs";

/// Cache hint attached to uploaded blobs (seconds).
pub const BLOB_CACHE_SECONDS: u32 = 3600;

/// How long a toast stays on screen (milliseconds).
pub const TOAST_DISMISS_MS: u32 = 4000;

/// Maximum toasts kept on screen at once.
pub const MAX_TOASTS: usize = 5;
