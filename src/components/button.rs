//! Generic button primitive.

use leptos::*;
use web_sys::MouseEvent;

#[component]
pub fn Button(
    /// HTML button type ("button" or "submit")
    #[prop(default = "button")]
    button_type: &'static str,
    /// Disabled state, reactive
    #[prop(into, optional)]
    disabled: MaybeSignal<bool>,
    /// Extra CSS classes appended to the base class
    #[prop(into, optional)]
    class: String,
    /// Click handler (ignored for submit buttons driven by the form)
    #[prop(into, optional)]
    on_click: Option<Callback<MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type=button_type
            class=format!("btn {}", class)
            disabled=move || disabled.get()
            on:click=move |ev| {
                if let Some(callback) = on_click {
                    callback.call(ev);
                }
            }
        >
            {children()}
        </button>
    }
}
