//! Song listing with refresh-on-insert.
//!
//! The listing is a plain signal refilled whenever the library
//! version changes; the upload workflow bumps the version after a
//! successful insert so new rows appear without a reload.

use leptos::*;

use crate::services::backend::{HttpBackend, SongLibraryApi};
use crate::types::Song;

/// Context handle invalidating the cached song listing.
#[derive(Clone, Copy)]
pub struct LibraryView {
    version: RwSignal<u64>,
}

impl LibraryView {
    pub fn new() -> Self {
        Self {
            version: create_rw_signal(0),
        }
    }

    /// Reactive read; components fetching the listing watch this.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Invalidate the listing so watchers refetch.
    pub fn refresh(&self) {
        self.version.update(|v| *v += 1);
    }
}

impl Default for LibraryView {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn SongList() -> impl IntoView {
    let client = expect_context::<HttpBackend>();
    let library = expect_context::<LibraryView>();

    let (songs, set_songs) = create_signal(None::<Vec<Song>>);

    create_effect(move |_| {
        let _ = library.version();
        let client = client.clone();
        spawn_local(async move {
            match client.list_songs().await {
                Ok(rows) => {
                    log::debug!("Loaded {} songs", rows.len());
                    set_songs.set(Some(rows));
                }
                Err(e) => {
                    log::error!("Failed to load songs: {}", e);
                }
            }
        });
    });

    view! {
        <div class="song-list">
            <div class="song-list-title">"Newest songs"</div>
            {move || match songs.get() {
                None => view! { <div class="song-list-empty">"Loading..."</div> }.into_view(),
                Some(rows) if rows.is_empty() => {
                    view! { <div class="song-list-empty">"No songs yet"</div> }.into_view()
                }
                Some(rows) => view! {
                    <For
                        each=move || rows.clone()
                        key=|song| song.id
                        children=move |song| {
                            view! {
                                <div class="song-item">
                                    <div class="song-item-title">{song.title.clone()}</div>
                                    <div class="song-item-author">{song.author.clone()}</div>
                                </div>
                            }
                        }
                    />
                }
                .into_view(),
            }}
        </div>
    }
}
