use leptos::prelude::*;

/// Styled checkbox with a text label
#[component]
pub fn Checkbox(
    #[prop(into)] checked: Signal<bool>,
    #[prop(into)] on_change: Callback<bool>,
    children: Children,
) -> impl IntoView {
    view! {
        <label class="checkbox">
            <input
                type="checkbox"
                class="checkbox__trigger"
                prop:checked=move || checked.get()
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
            <div class="checkbox__body">
                <div class="checkbox__mark" />
            </div>
            <span class="checkbox__text">{children()}</span>
        </label>
    }
}
