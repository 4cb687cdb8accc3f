use std::time::Duration;

use leptos::prelude::*;
use scrollsy_core::infinite_scroll::InfiniteScroll;

const PAGE_SIZE: usize = 20;
const MAX_ITEM_COUNT: usize = 200;
const LOAD_DELAY: Duration = Duration::from_millis(400);

/// Demo list loading another page of items whenever it is scrolled close to its bottom
#[component]
pub fn App() -> impl IntoView {
    let item_vec = RwSignal::new((0..PAGE_SIZE).collect::<Vec<usize>>());
    let is_loading = RwSignal::new(false);
    let is_complete = Signal::derive(move || item_vec.with(|item_vec| item_vec.len() >= MAX_ITEM_COUNT));
    let skip = Signal::derive(move || is_loading.get() || is_complete.get());

    let load_more = Callback::new(move |_| {
        is_loading.set(true);
        log::info!("Loading page {}", item_vec.with_untracked(|item_vec| item_vec.len() / PAGE_SIZE));
        // stands in for a request to a backend
        set_timeout(
            move || {
                item_vec.update(|item_vec| {
                    let start = item_vec.len();
                    item_vec.extend(start..start + PAGE_SIZE);
                });
                is_loading.set(false);
            },
            LOAD_DELAY,
        );
    });

    view! {
        <InfiniteScroll handler=load_more skip class="h-screen" distance="300">
            <ul class="flex flex-col w-full divide-y">
                <For
                    each=move || item_vec.get()
                    key=|item| *item
                    let:item
                >
                    <li class="p-4">{format!("Item {item}")}</li>
                </For>
            </ul>
            <Show when=move || is_loading.get()>
                <div class="p-4">"Loading..."</div>
            </Show>
            <Show when=move || is_complete.get()>
                <div class="p-4">"Nothing more to load."</div>
            </Show>
        </InfiniteScroll>
    }
}
