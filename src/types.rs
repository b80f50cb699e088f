//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Session Types** - Authenticated identity
//! - **Record Types** - Rows of the songs table
//! - **Toast Types** - User-facing notifications
//! - **Error Types** - Backend boundary errors

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Session Types
// =============================================================================

/// The authenticated user on whose behalf submissions are made.
///
/// Externally owned; this frontend only ever reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Stable user identifier
    pub id: String,
    /// Email, when the auth service exposes it
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Record Types
// =============================================================================

/// One row of the songs table, as returned by the listing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub author: String,
    pub image_path: String,
    pub song_path: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The row inserted on a successful submission.
///
/// Created exactly once per submission, never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSongRecord {
    /// Owning user (foreign key into the auth service's users)
    pub user_id: String,
    pub title: String,
    pub author: String,
    /// Storage path returned by the image upload
    pub image_path: String,
    /// Storage path returned by the song upload
    pub song_path: String,
}

// =============================================================================
// Toast Types
// =============================================================================

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastLevel {
    Success,
    Error,
}

impl ToastLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "toast-success",
            ToastLevel::Error => "toast-error",
        }
    }
}

/// A single on-screen notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    /// Monotonic id, used as the render key and for dismissal
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors crossing the backend-as-a-service boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendError {
    /// The service answered with a non-success status.
    Status { status: u16, message: String },
    /// The request never produced a response (fetch-layer failure).
    Network(String),
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Status { status, message } => {
                write!(f, "{} ({})", message, status)
            }
            BackendError::Network(msg) => write!(f, "Network error: {}", msg),
            BackendError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_song_record_serialization() {
        let record = NewSongRecord {
            user_id: "user-1".to_string(),
            title: "Song A".to_string(),
            author: "Artist B".to_string(),
            image_path: "images/image-Song A-abc".to_string(),
            song_path: "songs/song-Song A-abc".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["title"], "Song A");
        assert_eq!(json["author"], "Artist B");
        assert_eq!(json["image_path"], "images/image-Song A-abc");
        assert_eq!(json["song_path"], "songs/song-Song A-abc");
    }

    #[test]
    fn test_song_deserialization() {
        let json = r#"{
            "id": 7,
            "user_id": "user-1",
            "title": "Song A",
            "author": "Artist B",
            "image_path": "images/image-Song A-abc",
            "song_path": "songs/song-Song A-abc",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;

        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.id, 7);
        assert_eq!(song.title, "Song A");
        assert_eq!(song.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
    }

    #[test]
    fn test_song_deserialization_without_created_at() {
        let json = r#"{
            "id": 1,
            "user_id": "u",
            "title": "t",
            "author": "a",
            "image_path": "i",
            "song_path": "s"
        }"#;

        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.created_at, None);
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Status {
            status: 409,
            message: "The resource already exists".to_string(),
        };
        assert_eq!(err.to_string(), "The resource already exists (409)");
    }
}
