use chrono::Local;
use leptos::prelude::*;
use masterlist_core::PreferenceToggle;

use super::Checkbox;
use crate::app::ListController;

#[component]
pub fn Toolbar(controller: ListController) -> impl IntoView {
    let stats = Memo::new(move |_| controller.with(|c| c.stats()));
    let updated = move || {
        controller.with(|c| {
            c.snapshot()
                .map(|s| {
                    let local = s.fetched_at().with_timezone(&Local);
                    format!("updated {}", local.format("%H:%M:%S"))
                })
                .unwrap_or_default()
        })
    };

    let toggles = PreferenceToggle::ALL
        .into_iter()
        .map(|toggle| {
            let checked = Signal::derive(move || controller.with(|c| c.preferences().get(toggle)));
            let on_change = Callback::new(move |checked: bool| {
                controller.update(|c| c.set_toggle(toggle, checked))
            });
            view! {
                <Checkbox checked=checked on_change=on_change>
                    {toggle.label()}
                </Checkbox>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="body__toolbox">
            <div class="body__stats">
                <span>"servers: " <span class="accent">{move || stats.get().servers}</span></span>
                <span>"online: " <span class="accent">{move || stats.get().online}</span></span>
                <span class="body__updated">{updated}</span>
            </div>
            <div class="body__toggles">{toggles}</div>
            <div class="search-box">
                <input
                    class="body__search"
                    class:body__search_invalid=move || !controller.with(|c| c.filter().is_valid())
                    type="text"
                    placeholder="search"
                    prop:value=move || controller.with(|c| c.filter().text().to_string())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        controller.update(|c| c.set_filter_text(&text));
                    }
                />
                <Show when=move || controller.with(|c| !c.filter().text().is_empty())>
                    <button
                        class="search-clear"
                        on:click=move |_| controller.update(|c| c.set_filter_text(""))
                        title="Clear search"
                    >
                        "×"
                    </button>
                </Show>
            </div>
        </div>
    }
}
