//! Toast notification sink.
//!
//! [`Toasts`] is the context handle components push notifications
//! through; [`ToasterHost`] renders them in a fixed corner and each
//! toast dismisses itself after a few seconds.

use gloo_timers::future::TimeoutFuture;
use leptos::*;

use crate::config::{MAX_TOASTS, TOAST_DISMISS_MS};
use crate::types::{Toast, ToastLevel};

/// Context handle for surfacing notifications.
#[derive(Clone, Copy)]
pub struct Toasts {
    entries: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            entries: create_rw_signal(Vec::new()),
            next_id: create_rw_signal(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into());
    }

    pub fn dismiss(&self, id: u64) {
        self.entries.update(|list| list.retain(|t| t.id != id));
    }

    fn push(&self, level: ToastLevel, message: String) {
        match level {
            ToastLevel::Success => log::info!("{}", message),
            ToastLevel::Error => log::error!("{}", message),
        }

        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);

        self.entries.update(|list| {
            list.push(Toast { id, level, message });
            if list.len() > MAX_TOASTS {
                list.remove(0);
            }
        });

        // each toast removes itself after the dismiss delay
        let entries = self.entries;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_DISMISS_MS).await;
            entries.update(|list| list.retain(|t| t.id != id));
        });
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-position host rendering the active toasts.
#[component]
pub fn ToasterHost() -> impl IntoView {
    let toasts = expect_context::<Toasts>();

    view! {
        <div class="toaster">
            <For
                each=move || toasts.entries.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div
                            class=format!("toast {}", toast.level.css_class())
                            on:click=move |_| toasts.dismiss(id)
                        >
                            {toast.message.clone()}
                        </div>
                    }
                }
            />
        </div>
    }
}
