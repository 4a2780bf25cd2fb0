use std::ops::ControlFlow;

use leptos::prelude::*;
use masterlist_core::{poll, Config, Controller};
use wasm_bindgen_futures::spawn_local;
use web_sys::console;

use crate::api;
use crate::components::{Header, Loading, ServerList, Toolbar};
use crate::storage::LocalStorageBackend;

pub type ListController = RwSignal<Controller<LocalStorageBackend>>;

#[component]
pub fn App() -> impl IntoView {
    let config = Config::default();
    let interval = config.refresh_interval;
    let endpoint = config.endpoint.clone();

    // Preferences are read from localStorage here, once
    let controller: ListController = RwSignal::new(Controller::new(config, LocalStorageBackend));

    // Refresh loop: the next fetch is only scheduled after this one settles
    spawn_local(async move {
        poll(
            interval,
            move || {
                let endpoint = endpoint.clone();
                async move { api::fetch_list(&endpoint).await }
            },
            gloo_timers::future::sleep,
            move |result| {
                if let Err(e) = &result {
                    console::warn_1(&format!("Keeping previous server list: {}", e).into());
                }
                controller.update(|c| c.apply_fetch(result));
                ControlFlow::Continue(())
            },
        )
        .await;
    });

    view! {
        <div class="app-container">
            <Header />
            <div class="body">
                <div class="container">
                    <Toolbar controller=controller />
                    <Show
                        when=move || !controller.with(|c| c.status().loading)
                        fallback=|| view! { <Loading /> }
                    >
                        <ServerList controller=controller />
                    </Show>
                </div>
            </div>
        </div>
    }
}
