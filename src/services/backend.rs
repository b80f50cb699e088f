//! Client for the hosted backend service.
//!
//! Everything this frontend consumes goes through one boundary:
//! object storage (`/storage/v1`), the relational store (`/rest/v1`)
//! and auth (`/auth/v1`). The [`SongLibraryApi`] trait captures the
//! storage/table surface so the submission workflow can be exercised
//! against an in-memory double; [`HttpBackend`] is the production
//! implementation over `gloo-net`.

use gloo_net::http::Request;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::config::{ANON_KEY, BACKEND_URL, IMAGES_BUCKET, SONGS_BUCKET, SONGS_TABLE};
use crate::types::{BackendError, BackendResult, NewSongRecord, SessionUser, Song};

/// Logical bucket partitioning storage by content type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBucket {
    /// Audio blobs
    Songs,
    /// Cover images
    Images,
}

impl StorageBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBucket::Songs => SONGS_BUCKET,
            StorageBucket::Images => IMAGES_BUCKET,
        }
    }
}

/// Per-upload storage policy.
#[derive(Clone, Copy, Debug)]
pub struct UploadOptions {
    /// When false the service must reject a key that already exists
    /// instead of replacing the object.
    pub allow_overwrite: bool,
    /// Cache hint forwarded as `cache-control: max-age=<n>`.
    pub cache_seconds: u32,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            allow_overwrite: false,
            cache_seconds: crate::config::BLOB_CACHE_SECONDS,
        }
    }
}

/// The storage/table surface consumed by the submission workflow.
///
/// `Blob` is the opaque binary payload type: `web_sys::File` in the
/// browser, plain bytes in tests.
#[allow(async_fn_in_trait)]
pub trait SongLibraryApi {
    type Blob;

    /// Store one blob under `bucket/key`; returns the storage path.
    async fn upload_blob(
        &self,
        bucket: StorageBucket,
        key: &str,
        blob: &Self::Blob,
        options: UploadOptions,
    ) -> BackendResult<String>;

    /// Insert one row into the songs table.
    async fn insert_song(&self, record: &NewSongRecord) -> BackendResult<()>;

    /// Fetch all song rows, newest first.
    async fn list_songs(&self) -> BackendResult<Vec<Song>>;
}

/// Successful storage upload response body.
#[derive(Debug, Deserialize)]
struct UploadedObject {
    /// Full `bucket/key` path of the stored object
    #[serde(rename = "Key")]
    key: String,
}

/// Production client over the hosted REST surfaces.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    /// Build the client from compile-time config plus the access token
    /// persisted in web storage (if any).
    pub fn from_config() -> Self {
        Self::new(BACKEND_URL, ANON_KEY)
            .with_access_token(crate::services::session::stored_access_token())
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Bearer token for the `authorization` header: the session token
    /// when present, the anonymous key otherwise.
    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    /// Look up the authenticated identity, if a session exists.
    pub async fn current_user(&self) -> BackendResult<Option<SessionUser>> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = Request::get(&url)
            .header("apikey", &self.anon_key)
            .header("authorization", &format!("Bearer {}", self.bearer()))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        // 401 just means nobody is signed in
        if response.status() == 401 {
            return Ok(None);
        }
        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(response.status(), &body));
        }

        let user = response
            .json::<SessionUser>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Some(user))
    }
}

impl SongLibraryApi for HttpBackend {
    type Blob = web_sys::File;

    async fn upload_blob(
        &self,
        bucket: StorageBucket,
        key: &str,
        blob: &Self::Blob,
        options: UploadOptions,
    ) -> BackendResult<String> {
        let url = storage_object_url(&self.base_url, bucket, key);
        let request = Request::post(&url)
            .header("apikey", &self.anon_key)
            .header("authorization", &format!("Bearer {}", self.bearer()))
            .header("cache-control", &format!("max-age={}", options.cache_seconds))
            .header("x-upsert", if options.allow_overwrite { "true" } else { "false" })
            .body(JsValue::from(blob.clone()))
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(response.status(), &body));
        }

        let uploaded = response
            .json::<UploadedObject>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(uploaded.key)
    }

    async fn insert_song(&self, record: &NewSongRecord) -> BackendResult<()> {
        let url = rest_table_url(&self.base_url, SONGS_TABLE);
        let request = Request::post(&url)
            .header("apikey", &self.anon_key)
            .header("authorization", &format!("Bearer {}", self.bearer()))
            .header("prefer", "return=minimal")
            .json(record)
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(response.status(), &body));
        }
        Ok(())
    }

    async fn list_songs(&self) -> BackendResult<Vec<Song>> {
        let url = format!(
            "{}?select=*&order=created_at.desc",
            rest_table_url(&self.base_url, SONGS_TABLE)
        );
        let response = Request::get(&url)
            .header("apikey", &self.anon_key)
            .header("authorization", &format!("Bearer {}", self.bearer()))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(response.status(), &body));
        }

        response
            .json::<Vec<Song>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Characters that must be escaped when a key is used as a URL path
/// segment. Keys embed the user-supplied title verbatim, so `#`, `?`,
/// `%`, `/` and friends would otherwise truncate or corrupt the path.
const KEY_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn storage_object_url(base: &str, bucket: StorageBucket, key: &str) -> String {
    format!(
        "{}/storage/v1/object/{}/{}",
        base,
        bucket.as_str(),
        utf8_percent_encode(key, KEY_SEGMENT)
    )
}

fn rest_table_url(base: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base, table)
}

/// Convert a non-success response into a [`BackendError::Status`],
/// preferring the service's own `message` field over the raw body.
fn status_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    BackendError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_object_url() {
        let url = storage_object_url("http://localhost:54321", StorageBucket::Songs, "song-Song A-abc123");
        assert_eq!(
            url,
            "http://localhost:54321/storage/v1/object/songs/song-Song%20A-abc123"
        );
    }

    #[test]
    fn test_storage_object_url_escapes_hostile_titles() {
        // "#" would become a fragment and "/" a path separator
        let url = storage_object_url(
            "http://localhost:54321",
            StorageBucket::Songs,
            "song-Song #1/remix-abc123",
        );
        assert_eq!(
            url,
            "http://localhost:54321/storage/v1/object/songs/song-Song%20%231%2Fremix-abc123"
        );
        assert!(!url.contains('#'));
    }

    #[test]
    fn test_rest_table_url() {
        assert_eq!(
            rest_table_url("http://localhost:54321", "songs"),
            "http://localhost:54321/rest/v1/songs"
        );
    }

    #[test]
    fn test_uploaded_object_deserialization() {
        let json = r#"{"Key": "songs/song-Song A-abc123"}"#;
        let uploaded: UploadedObject = serde_json::from_str(json).unwrap();
        assert_eq!(uploaded.key, "songs/song-Song A-abc123");
    }

    #[test]
    fn test_status_error_extracts_service_message() {
        let err = status_error(409, r#"{"statusCode":"409","message":"The resource already exists"}"#);
        assert_eq!(
            err,
            BackendError::Status {
                status: 409,
                message: "The resource already exists".to_string()
            }
        );
    }

    #[test]
    fn test_status_error_falls_back_to_raw_body() {
        let err = status_error(500, "internal error");
        assert_eq!(
            err,
            BackendError::Status {
                status: 500,
                message: "internal error".to_string()
            }
        );
    }
}
