//! Echoplay - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for a music-streaming library over a hosted
//! backend service (auth, relational store, object storage).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! │  providers: HttpBackend, Session, Toasts,                    │
//! │             UploadModalController, LibraryView               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HomePage                                                    │
//! │  ├── "Add a song" button (opens the upload modal)           │
//! │  └── SongList (refetches when the library version bumps)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UploadModal (form → validation gate → submit workflow)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ToasterHost (one notification per submission attempt)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (SessionUser, Song, Toast, etc.)
//! - [`components`] - UI components (Button, Modal, UploadModal, etc.)
//! - [`services`] - Backend communication (backend, session, submit)

use leptos::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Session
    SessionUser,
    // Records
    Song, NewSongRecord,
    // Toasts
    Toast, ToastLevel,
    // Errors
    BackendError, BackendResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🎧 Echoplay - Starting Leptos App");

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    // Global providers, mirrored by every page and the modal/toaster
    let client = HttpBackend::from_config();
    provide_context(client.clone());
    provide_context(Session::init(&client));
    provide_context(Toasts::new());
    provide_context(UploadModalController::new());
    provide_context(LibraryView::new());

    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=HomePage/>
                </Routes>
            </main>
        </Router>
        <UploadModal/>
        <ToasterHost/>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let session = expect_context::<Session>();
    let modal = expect_context::<UploadModalController>();

    view! {
        <div class="container">
            <div class="home-header">
                <h1>"Welcome back"</h1>
                <span class="session-status">
                    {move || match session.current() {
                        Some(user) => user.email.unwrap_or(user.id),
                        None => "Not signed in".to_string(),
                    }}
                </span>
                <Button
                    class="btn-primary"
                    on_click=Callback::from(move |_| modal.open())
                >
                    "Add a song"
                </Button>
            </div>
            <SongList/>
        </div>
    }
}
