//! Server table with virtual scrolling
//!
//! The controller decides which rows intersect the viewport; this component
//! only reports scroll/resize geometry and paints the rows it is handed.

use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use masterlist_core::{ColumnLayout, HeaderCell, ListColumn, RowView, Viewport};
use wasm_bindgen::JsCast;

use crate::app::ListController;

fn px(value: impl std::fmt::Display) -> String {
    format!("{}px", value)
}

#[component]
pub fn ServerList(controller: ListController) -> impl IntoView {
    let (row_height, header_height) =
        controller.with_untracked(|c| (c.config().row_height, c.config().header_height));
    let (container_width, set_container_width) = signal(800.0_f64);

    // Container ref for scroll handling
    let container_ref = NodeRef::<html::Div>::new();

    let measure = move || {
        if let Some(container) = container_ref.get_untracked() {
            let width = f64::from(container.client_width());
            let height = u32::try_from(container.client_height()).unwrap_or_default();
            let body_height = height.saturating_sub(header_height);
            if width > 0.0 && container_width.get_untracked() != width {
                set_container_width.set(width);
            }
            if controller.with_untracked(|c| c.viewport().height) != body_height {
                controller.update(|c| c.resize(body_height));
            }
        }
    };

    // Measure once mounted, then on every window resize
    Effect::new(move || {
        if container_ref.get().is_some() {
            measure();
        }
    });
    let _resize = window_event_listener(ev::resize, move |_| measure());

    // Keep the DOM scroller in step when the controller jumps back to the top
    let scroll_resets = Memo::new(move |_| controller.with(|c| c.scroll_resets()));
    Effect::new(move |seen: Option<u64>| {
        let resets = scroll_resets.get();
        if seen.is_some_and(|seen| seen != resets) {
            if let Some(container) = container_ref.get_untracked() {
                container.set_scroll_top(0);
            }
        }
        resets
    });

    let on_scroll = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            let element: web_sys::HtmlElement = target.unchecked_into();
            let offset = u32::try_from(element.scroll_top()).unwrap_or_default();
            let height = u32::try_from(element.client_height())
                .unwrap_or_default()
                .saturating_sub(header_height);
            controller.update(|c| c.set_viewport(Viewport::new(offset, height)));
        }
    };

    let layout = move || ColumnLayout::compute(container_width.get());

    view! {
        <div class="list virtual-scroll" node_ref=container_ref on:scroll=on_scroll>
            <div
                class="list__header"
                style:position="sticky"
                style:top="0"
                style:z-index="10"
                style:height=px(header_height)
            >
                {move || {
                    let layout = layout();
                    controller
                        .with(|c| c.headers())
                        .into_iter()
                        .map(|header| {
                            view! {
                                <HeaderView header=header layout=layout controller=controller />
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
            <div
                class="list__body virtual-container"
                style:position="relative"
                style:height=move || px(controller.with(|c| c.content_height()))
            >
                {move || {
                    let layout = layout();
                    controller
                        .with(|c| c.rows())
                        .into_iter()
                        .map(|row| {
                            view! { <ServerRow row=row layout=layout row_height=row_height /> }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
            <Show when=move || controller.with(|c| c.visible_len() == 0)>
                <div class="empty-state">
                    <p>"No servers match the current filters."</p>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn HeaderView(
    header: HeaderCell,
    layout: ColumnLayout,
    controller: ListController,
) -> impl IntoView {
    let width = px(layout.width(header.column));

    match header.sort_column {
        Some(column) => {
            let accent = if header.active { "true" } else { "false" };
            let up = if header.ascending { "true" } else { "false" };
            view! {
                <span
                    class="list__header-cell list__header-sort-cell"
                    style:width=width
                    on:click=move |_| controller.update(|c| c.click_sort(column))
                >
                    {header.label}
                    " "
                    <span
                        class="list__header-sort-icon"
                        data-accent=accent
                        data-up=up
                    >
                        "▼"
                    </span>
                </span>
            }
            .into_any()
        }
        None => view! {
            <span class="list__header-cell" style:width=width>{header.label}</span>
        }
        .into_any(),
    }
}

#[component]
fn ServerRow(row: RowView, layout: ColumnLayout, row_height: u32) -> impl IntoView {
    let width = move |column: ListColumn| px(layout.width(column));
    let locked = if row.locked { "true" } else { "false" };

    view! {
        <div
            class="list__row virtual-item"
            style:position="absolute"
            style:top=px(row.top)
            style:left="0"
            style:right="0"
            style:height=px(row_height)
        >
            <span
                class="list__cell list__cell_name text-bold"
                style:width=width(ListColumn::Name)
            >
                {row.name}
            </span>
            <span class="list__cell list__cell_public" style:width=width(ListColumn::Public)>
                {match row.connect_url {
                    Some(url) => view! {
                        <a href=url class="list__server-icon" data-accent="true">"▶"</a>
                    }.into_any(),
                    None => view! {
                        <a
                            class="list__server-icon list__server-icon_disabled"
                            data-accent="false"
                        >
                            "▶"
                        </a>
                    }.into_any(),
                }}
            </span>
            <span class="list__cell" style:width=width(ListColumn::Password)>
                <span class="list__server-icon" data-accent=locked>
                    "🔒"
                </span>
            </span>
            <span class="list__cell text-bold text-accent" style:width=width(ListColumn::Online)>
                {row.players}
            </span>
            <span
                class="list__cell list__cell_version text-bold"
                style:width=width(ListColumn::Version)
            >
                {row.version}
            </span>
        </div>
    }
}
