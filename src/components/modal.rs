//! Generic modal dialog shell.
//!
//! Renders an overlay with a titled card. Visibility is driven by a
//! signal so the dialog's own state stays with its controller; the
//! children are mounted once and simply hidden while closed.

use leptos::*;

#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] description: String,
    /// Visibility, owned by the caller's controller
    #[prop(into)] is_open: Signal<bool>,
    /// Invoked on overlay click and on the close button
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class="modal-overlay"
            style:display=move || if is_open.get() { "flex" } else { "none" }
            on:click=move |_| on_close.call(())
        >
            <div class="modal" on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <div class="modal-title">{title}</div>
                    <button class="modal-close" on:click=move |_| on_close.call(())>
                        "✕"
                    </button>
                </div>
                <div class="modal-description">{description}</div>
                {children()}
            </div>
        </div>
    }
}
