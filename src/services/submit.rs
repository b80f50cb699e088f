//! Song submission workflow.
//!
//! One submission is two strictly sequential blob uploads followed by
//! one row insert. The whole thing is modelled as a short-lived stage
//! machine (Idle → UploadingSong → UploadingImage → Inserting →
//! Done/Failed) with a failure kind per step, so partial outcomes are
//! explicit instead of buried in nested returns.
//!
//! A later-stage failure leaves the earlier blobs behind: there is no
//! compensating delete. The error variants carry the orphaned paths.

use rand::Rng;

use crate::services::backend::{SongLibraryApi, StorageBucket, UploadOptions};
use crate::types::{BackendError, NewSongRecord, SessionUser};

/// Where a running submission currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitStage {
    Idle,
    UploadingSong,
    UploadingImage,
    Inserting,
    Done,
    Failed,
}

impl SubmitStage {
    /// Label shown on the submit control while this stage is active.
    pub fn label(&self) -> &'static str {
        match self {
            SubmitStage::Idle => "Create",
            SubmitStage::UploadingSong => "Uploading song...",
            SubmitStage::UploadingImage => "Uploading image...",
            SubmitStage::Inserting => "Saving...",
            SubmitStage::Done => "Done",
            SubmitStage::Failed => "Create",
        }
    }
}

/// A validated submission, ready to run.
///
/// `B` is the blob payload type (`web_sys::File` in the browser,
/// plain bytes in tests).
#[derive(Clone, Debug)]
pub struct SongSubmission<B> {
    pub title: String,
    pub author: String,
    pub song: B,
    pub image: B,
}

/// Paths of the two stored blobs after a full success.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmittedSong {
    pub song_path: String,
    pub image_path: String,
}

/// Why a submission attempt did not produce a record.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitError {
    /// Song file, image file or identity missing; nothing was sent.
    MissingFields,
    /// The song upload was rejected; nothing was written.
    SongUpload,
    /// The image upload was rejected; the song object stays behind
    /// unreferenced.
    ImageUpload { orphaned_song: String },
    /// The insert was rejected; both objects stay behind. `message`
    /// is the backend's own error text.
    Insert {
        message: String,
        orphaned_song: String,
        orphaned_image: String,
    },
    /// Client-side failure outside the anticipated rejections.
    Unexpected(String),
}

impl SubmitError {
    /// The one notification shown for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::MissingFields => "Missing fields".to_string(),
            SubmitError::SongUpload => "Failed song upload".to_string(),
            SubmitError::ImageUpload { .. } => "Failed image upload".to_string(),
            SubmitError::Insert { message, .. } => message.clone(),
            SubmitError::Unexpected(_) => "Something went wrong".to_string(),
        }
    }
}

/// Validation gate: all three checks run before any network call, and
/// any combination of misses yields the single missing-fields error.
pub fn validate<B>(
    title: &str,
    author: &str,
    song: Option<B>,
    image: Option<B>,
    user: Option<&SessionUser>,
) -> Result<(SongSubmission<B>, SessionUser), SubmitError> {
    match (song, image, user) {
        (Some(song), Some(image), Some(user)) => Ok((
            SongSubmission {
                title: title.to_string(),
                author: author.to_string(),
                song,
                image,
            },
            user.clone(),
        )),
        _ => Err(SubmitError::MissingFields),
    }
}

/// Submission-scoped token keeping storage keys collision-free across
/// concurrent and historical uploads.
pub fn unique_token() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

fn object_key(kind: &str, title: &str, token: &str) -> String {
    format!("{}-{}-{}", kind, title, token)
}

/// Run one validated submission against the backend.
///
/// `token` is the submission-scoped key suffix, normally a fresh
/// [`unique_token`]; even a colliding token must not replace a prior
/// object, since every upload asks the service not to overwrite.
/// The three calls are strictly sequential; `on_stage` observes every
/// transition, ending in either `Done` or `Failed` exactly once.
pub async fn submit_song<A: SongLibraryApi>(
    api: &A,
    user: &SessionUser,
    submission: SongSubmission<A::Blob>,
    token: &str,
    mut on_stage: impl FnMut(SubmitStage),
) -> Result<SubmittedSong, SubmitError> {
    let SongSubmission {
        title,
        author,
        song,
        image,
    } = submission;

    on_stage(SubmitStage::UploadingSong);
    let song_key = object_key("song", &title, token);
    let song_path = match api
        .upload_blob(StorageBucket::Songs, &song_key, &song, UploadOptions::default())
        .await
    {
        Ok(path) => path,
        Err(err) => {
            log::error!("song upload failed: {}", err);
            on_stage(SubmitStage::Failed);
            return Err(match err {
                BackendError::Status { .. } => SubmitError::SongUpload,
                other => SubmitError::Unexpected(other.to_string()),
            });
        }
    };

    on_stage(SubmitStage::UploadingImage);
    let image_key = object_key("image", &title, token);
    let image_path = match api
        .upload_blob(StorageBucket::Images, &image_key, &image, UploadOptions::default())
        .await
    {
        Ok(path) => path,
        Err(err) => {
            log::error!("image upload failed: {}", err);
            on_stage(SubmitStage::Failed);
            // the song object written above is now unreferenced
            return Err(match err {
                BackendError::Status { .. } => SubmitError::ImageUpload {
                    orphaned_song: song_path,
                },
                other => SubmitError::Unexpected(other.to_string()),
            });
        }
    };

    on_stage(SubmitStage::Inserting);
    let record = NewSongRecord {
        user_id: user.id.clone(),
        title,
        author,
        image_path: image_path.clone(),
        song_path: song_path.clone(),
    };
    if let Err(err) = api.insert_song(&record).await {
        log::error!("song insert failed: {}", err);
        on_stage(SubmitStage::Failed);
        return Err(match err {
            BackendError::Status { message, .. } => SubmitError::Insert {
                message,
                orphaned_song: song_path,
                orphaned_image: image_path,
            },
            other => SubmitError::Unexpected(other.to_string()),
        });
    }

    on_stage(SubmitStage::Done);
    Ok(SubmittedSong {
        song_path,
        image_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BackendResult, Song};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// In-memory stand-in for the hosted service: honors the
    /// no-overwrite policy and records every call it receives.
    #[derive(Default)]
    struct MockApi {
        store: RefCell<HashMap<String, Vec<u8>>>,
        rows: RefCell<Vec<NewSongRecord>>,
        calls: RefCell<Vec<String>>,
        fail_song_upload: Cell<bool>,
        fail_image_upload: Cell<bool>,
        insert_error: RefCell<Option<String>>,
        network_down: Cell<bool>,
    }

    impl SongLibraryApi for MockApi {
        type Blob = Vec<u8>;

        async fn upload_blob(
            &self,
            bucket: StorageBucket,
            key: &str,
            blob: &Vec<u8>,
            options: UploadOptions,
        ) -> BackendResult<String> {
            self.calls.borrow_mut().push(format!(
                "upload {} upsert={}",
                bucket.as_str(),
                options.allow_overwrite
            ));
            if self.network_down.get() {
                return Err(BackendError::Network("Failed to fetch".to_string()));
            }
            let rejected = match bucket {
                StorageBucket::Songs => self.fail_song_upload.get(),
                StorageBucket::Images => self.fail_image_upload.get(),
            };
            if rejected {
                return Err(BackendError::Status {
                    status: 500,
                    message: "upload rejected".to_string(),
                });
            }
            let path = format!("{}/{}", bucket.as_str(), key);
            if !options.allow_overwrite && self.store.borrow().contains_key(&path) {
                return Err(BackendError::Status {
                    status: 409,
                    message: "The resource already exists".to_string(),
                });
            }
            self.store.borrow_mut().insert(path.clone(), blob.clone());
            Ok(path)
        }

        async fn insert_song(&self, record: &NewSongRecord) -> BackendResult<()> {
            self.calls.borrow_mut().push("insert".to_string());
            if let Some(message) = self.insert_error.borrow().clone() {
                return Err(BackendError::Status {
                    status: 400,
                    message,
                });
            }
            self.rows.borrow_mut().push(record.clone());
            Ok(())
        }

        async fn list_songs(&self) -> BackendResult<Vec<Song>> {
            Ok(Vec::new())
        }
    }

    fn user() -> SessionUser {
        SessionUser {
            id: "user-1".to_string(),
            email: None,
        }
    }

    fn submission() -> SongSubmission<Vec<u8>> {
        SongSubmission {
            title: "Song A".to_string(),
            author: "Artist B".to_string(),
            song: vec![0xFF, 0xFB, 0x90],
            image: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[test]
    fn test_validate_rejects_missing_song() {
        let result = validate("Song A", "Artist B", None::<Vec<u8>>, Some(vec![1]), Some(&user()));
        assert_eq!(result.unwrap_err(), SubmitError::MissingFields);
    }

    #[test]
    fn test_validate_rejects_missing_image() {
        let result = validate("Song A", "Artist B", Some(vec![1]), None::<Vec<u8>>, Some(&user()));
        assert_eq!(result.unwrap_err(), SubmitError::MissingFields);
    }

    #[test]
    fn test_validate_rejects_missing_identity() {
        let result = validate("Song A", "Artist B", Some(vec![1]), Some(vec![2]), None);
        assert_eq!(result.unwrap_err(), SubmitError::MissingFields);
    }

    #[test]
    fn test_validate_accepts_complete_submission() {
        let (submission, user) =
            validate("Song A", "Artist B", Some(vec![1]), Some(vec![2]), Some(&user())).unwrap();
        assert_eq!(submission.title, "Song A");
        assert_eq!(submission.author, "Artist B");
        assert_eq!(user.id, "user-1");
    }

    #[test]
    fn test_song_upload_failure_stops_before_image_and_insert() {
        let api = MockApi::default();
        api.fail_song_upload.set(true);

        let mut stages = Vec::new();
        let result = block_on(submit_song(&api, &user(), submission(), &unique_token(), |s| {
            stages.push(s)
        }));

        assert_eq!(result.unwrap_err(), SubmitError::SongUpload);
        assert_eq!(stages, vec![SubmitStage::UploadingSong, SubmitStage::Failed]);
        assert_eq!(*api.calls.borrow(), vec!["upload songs upsert=false"]);
        assert!(api.store.borrow().is_empty());
        assert!(api.rows.borrow().is_empty());
    }

    #[test]
    fn test_image_upload_failure_leaves_song_orphaned() {
        let api = MockApi::default();
        api.fail_image_upload.set(true);

        let mut stages = Vec::new();
        let result = block_on(submit_song(&api, &user(), submission(), &unique_token(), |s| {
            stages.push(s)
        }));

        let err = result.unwrap_err();
        match &err {
            SubmitError::ImageUpload { orphaned_song } => {
                // no compensating delete: the blob is still in storage
                assert!(api.store.borrow().contains_key(orphaned_song));
            }
            other => panic!("expected ImageUpload, got {:?}", other),
        }
        assert_eq!(err.user_message(), "Failed image upload");
        assert_eq!(
            stages,
            vec![
                SubmitStage::UploadingSong,
                SubmitStage::UploadingImage,
                SubmitStage::Failed
            ]
        );
        assert!(!api.calls.borrow().iter().any(|c| c == "insert"));
        assert!(api.rows.borrow().is_empty());
    }

    #[test]
    fn test_insert_failure_surfaces_backend_message_verbatim() {
        let api = MockApi::default();
        let backend_message = "duplicate key value violates unique constraint \"songs_pkey\"";
        *api.insert_error.borrow_mut() = Some(backend_message.to_string());

        let mut stages = Vec::new();
        let result = block_on(submit_song(&api, &user(), submission(), &unique_token(), |s| {
            stages.push(s)
        }));

        let err = result.unwrap_err();
        assert_eq!(err.user_message(), backend_message);
        match err {
            SubmitError::Insert {
                orphaned_song,
                orphaned_image,
                ..
            } => {
                assert!(api.store.borrow().contains_key(&orphaned_song));
                assert!(api.store.borrow().contains_key(&orphaned_image));
            }
            other => panic!("expected Insert, got {:?}", other),
        }
        assert!(api.rows.borrow().is_empty());
        assert_eq!(stages.last(), Some(&SubmitStage::Failed));
    }

    #[test]
    fn test_successful_submission_end_to_end() {
        let api = MockApi::default();

        let token = unique_token();
        let mut stages = Vec::new();
        let outcome = block_on(submit_song(&api, &user(), submission(), &token, |s| {
            stages.push(s)
        }))
        .unwrap();

        // both keys contain the title and share the freshly generated token
        assert_eq!(outcome.song_path, format!("songs/song-Song A-{}", token));
        assert_eq!(outcome.image_path, format!("images/image-Song A-{}", token));

        let rows = api.rows.borrow();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, "user-1");
        assert_eq!(rows[0].title, "Song A");
        assert_eq!(rows[0].author, "Artist B");
        assert_eq!(rows[0].song_path, outcome.song_path);
        assert_eq!(rows[0].image_path, outcome.image_path);

        assert_eq!(
            stages,
            vec![
                SubmitStage::UploadingSong,
                SubmitStage::UploadingImage,
                SubmitStage::Inserting,
                SubmitStage::Done
            ]
        );
    }

    #[test]
    fn test_identical_titles_get_distinct_keys() {
        let api = MockApi::default();

        let first = block_on(submit_song(&api, &user(), submission(), &unique_token(), |_| {})).unwrap();
        let second = block_on(submit_song(&api, &user(), submission(), &unique_token(), |_| {})).unwrap();

        assert_ne!(first.song_path, second.song_path);
        assert_ne!(first.image_path, second.image_path);
        assert_eq!(api.store.borrow().len(), 4);
        assert_eq!(api.rows.borrow().len(), 2);
        // every upload asked the service not to overwrite
        assert!(api
            .calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("upload"))
            .all(|c| c.ends_with("upsert=false")));
    }

    #[test]
    fn test_network_failure_maps_to_generic_message() {
        let api = MockApi::default();
        api.network_down.set(true);

        let result = block_on(submit_song(&api, &user(), submission(), &unique_token(), |_| {}));

        let err = result.unwrap_err();
        assert!(matches!(err, SubmitError::Unexpected(_)));
        assert_eq!(err.user_message(), "Something went wrong");
    }

    #[test]
    fn test_engineered_token_collision_does_not_overwrite() {
        let api = MockApi::default();
        let token = "deadbeefdeadbeef";
        let occupied = format!("songs/song-Song A-{}", token);
        api.store
            .borrow_mut()
            .insert(occupied.clone(), vec![1, 2, 3]);

        let result = block_on(submit_song(&api, &user(), submission(), token, |_| {}));

        // the upload is rejected instead of silently replacing the object
        assert_eq!(result.unwrap_err(), SubmitError::SongUpload);
        assert_eq!(*api.store.borrow().get(&occupied).unwrap(), vec![1, 2, 3]);
        assert!(api.rows.borrow().is_empty());
    }

    #[test]
    fn test_unique_token_is_fresh_hex() {
        let a = unique_token();
        let b = unique_token();
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_messages_are_fixed_per_failure_kind() {
        assert_eq!(SubmitError::MissingFields.user_message(), "Missing fields");
        assert_eq!(SubmitError::SongUpload.user_message(), "Failed song upload");
        assert_eq!(
            SubmitError::ImageUpload {
                orphaned_song: "songs/x".to_string()
            }
            .user_message(),
            "Failed image upload"
        );
    }
}
