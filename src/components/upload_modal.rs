//! Song upload modal.
//!
//! Holds the form state (title, author, song file, image file) and
//! wires the submit control to the submission workflow in
//! [`crate::services::submit`]. Exactly one toast is shown per
//! attempt; the submit button is disabled for the whole run so no
//! second submission can start mid-flight.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement, SubmitEvent};

use crate::components::{Button, Modal};
use crate::components::song_list::LibraryView;
use crate::components::toaster::Toasts;
use crate::services::backend::HttpBackend;
use crate::services::session::Session;
use crate::services::submit::{submit_song, unique_token, validate, SubmitStage};

/// Context handle tracking the upload dialog's visibility.
#[derive(Clone, Copy)]
pub struct UploadModalController {
    is_open: RwSignal<bool>,
}

impl UploadModalController {
    pub fn new() -> Self {
        Self {
            is_open: create_rw_signal(false),
        }
    }

    pub fn open(&self) {
        self.is_open.set(true);
    }

    pub fn close(&self) {
        self.is_open.set(false);
    }

    /// Reactive visibility read.
    pub fn is_open(&self) -> bool {
        self.is_open.get()
    }
}

impl Default for UploadModalController {
    fn default() -> Self {
        Self::new()
    }
}

/// Clear a file input element so a reset form shows no stale filename.
fn clear_file_input(id: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(input) = document.get_element_by_id(id) {
                if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                    html_input.set_value("");
                }
            }
        }
    }
}

#[component]
pub fn UploadModal() -> impl IntoView {
    let client = expect_context::<HttpBackend>();
    let session = expect_context::<Session>();
    let toasts = expect_context::<Toasts>();
    let modal = expect_context::<UploadModalController>();
    let library = expect_context::<LibraryView>();

    // Form state
    let title = create_rw_signal(String::new());
    let author = create_rw_signal(String::new());
    let song_file = create_rw_signal(None::<File>);
    let image_file = create_rw_signal(None::<File>);
    let is_submitting = create_rw_signal(false);
    let stage = create_rw_signal(SubmitStage::Idle);

    let reset_form = move || {
        title.set(String::new());
        author.set(String::new());
        song_file.set(None);
        image_file.set(None);
        stage.set(SubmitStage::Idle);
        clear_file_input("songFile");
        clear_file_input("imageFile");
    };

    // Closing the dialog always clears the fields
    let on_close = move |_: ()| {
        reset_form();
        modal.close();
    };

    let on_song_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        song_file.set(input.files().and_then(|files| files.get(0)));
    };

    let on_image_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        image_file.set(input.files().and_then(|files| files.get(0)));
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        // the button is disabled while submitting; never run two at once
        if is_submitting.get_untracked() {
            return;
        }

        let client = client.clone();
        spawn_local(async move {
            is_submitting.set(true);

            let result = match validate(
                &title.get_untracked(),
                &author.get_untracked(),
                song_file.get_untracked(),
                image_file.get_untracked(),
                session.current_untracked().as_ref(),
            ) {
                Ok((submission, user)) => {
                    submit_song(&client, &user, submission, &unique_token(), move |s| stage.set(s))
                        .await
                }
                Err(e) => Err(e),
            };

            is_submitting.set(false);

            match result {
                Ok(submitted) => {
                    log::info!("🎵 Song stored at {}", submitted.song_path);
                    library.refresh();
                    toasts.success("Song created!");
                    reset_form();
                    modal.close();
                }
                Err(e) => {
                    toasts.error(e.user_message());
                }
            }
        });
    };

    view! {
        <Modal
            title="Add a song"
            description="Upload an mp3 file"
            is_open=Signal::derive(move || modal.is_open())
            on_close=on_close
        >
            <form class="upload-form" on:submit=on_submit>
                <input
                    type="text"
                    id="songTitle"
                    placeholder="Song title"
                    required=true
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                    disabled=move || is_submitting.get()
                />
                <input
                    type="text"
                    id="songAuthor"
                    placeholder="Song author"
                    required=true
                    prop:value=move || author.get()
                    on:input=move |ev| author.set(event_target_value(&ev))
                    disabled=move || is_submitting.get()
                />
                <div>
                    <div class="field-label">"Select a song file"</div>
                    <input
                        type="file"
                        id="songFile"
                        accept=".mp3,audio/*"
                        on:change=on_song_change
                        disabled=move || is_submitting.get()
                    />
                </div>
                <div>
                    <div class="field-label">"Select an image"</div>
                    <input
                        type="file"
                        id="imageFile"
                        accept="image/*"
                        on:change=on_image_change
                        disabled=move || is_submitting.get()
                    />
                </div>
                <Button
                    button_type="submit"
                    class="btn-primary"
                    disabled=Signal::derive(move || is_submitting.get())
                >
                    {move || if is_submitting.get() { stage.get().label() } else { "Create" }}
                </Button>
            </form>
        </Modal>
    }
}
