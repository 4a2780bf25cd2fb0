use leptos::prelude::*;

const BUILD_HASH: &str = env!("BUILD_HASH");
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

#[component]
pub fn Header() -> impl IntoView {
    let letters = "masterlist"
        .chars()
        .map(|c| view! { <span>{c.to_string()}</span> })
        .collect::<Vec<_>>();

    view! {
        <header class="header">
            <div class="container">
                <div class="header__logo">
                    <a target="_blank" rel="noopener" href="https://mtasa.com/">
                        <div class="header__logo-image" />
                    </a>
                    <div class="header__logo-text">{letters}</div>
                </div>
                <span class="header__build" title=BUILD_TIMESTAMP>{BUILD_HASH}</span>
            </div>
        </header>
    }
}
