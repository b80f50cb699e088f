//! Current-identity lookup.
//!
//! The auth service owns the user; this module only reads it. The
//! identity is fetched once at startup and exposed as a signal every
//! component can watch.

use leptos::*;

use crate::config::ACCESS_TOKEN_KEY;
use crate::services::backend::HttpBackend;
use crate::types::SessionUser;

/// Access token persisted by the sign-in flow, if any.
pub fn stored_access_token() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(ACCESS_TOKEN_KEY).ok()?
}

/// Session context handle: whoever is signed in right now.
#[derive(Clone, Copy)]
pub struct Session {
    user: ReadSignal<Option<SessionUser>>,
}

impl Session {
    /// Kick off the identity lookup and return the context handle.
    ///
    /// The signal stays `None` until the auth service answers, and
    /// permanently if nobody is signed in.
    pub fn init(client: &HttpBackend) -> Self {
        let (user, set_user) = create_signal(None::<SessionUser>);

        let client = client.clone();
        spawn_local(async move {
            match client.current_user().await {
                Ok(Some(identity)) => {
                    log::info!("🔑 Signed in as {}", identity.id);
                    set_user.set(Some(identity));
                }
                Ok(None) => {
                    log::info!("No signed-in user");
                }
                Err(e) => {
                    log::warn!("Identity lookup failed: {}", e);
                }
            }
        });

        Self { user }
    }

    /// Reactive read of the current identity.
    pub fn current(&self) -> Option<SessionUser> {
        self.user.get()
    }

    /// Non-reactive read, for use inside event handlers.
    pub fn current_untracked(&self) -> Option<SessionUser> {
        self.user.get_untracked()
    }
}
